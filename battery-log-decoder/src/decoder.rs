//! Main decoder API
//!
//! `LogDecoder` turns the text of an EEPROM dump into a voltage series and derives
//! current and consumed charge from it. It is a pure function over the supplied text:
//! no I/O, no shared state, so any number of dumps can be decoded in parallel.

use crate::config::DecoderConfig;
use crate::token::{millivolts, parse_byte, tokenize};
use crate::types::{DecodeEnd, DecodedDump, RawDump, Result, Sample, Series, Summary};

/// Minutes per hour, for turning a per-minute current into charge
const MINUTES_PER_HOUR: f64 = 60.0;

/// The decoder struct - entry point for all decoding operations
#[derive(Debug, Clone, Default)]
pub struct LogDecoder {
    config: DecoderConfig,
}

impl LogDecoder {
    /// Create a decoder with the logger's default constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with overridden constants
    ///
    /// # Example
    /// ```
    /// use battery_log_decoder::{DecoderConfig, LogDecoder};
    ///
    /// let decoder = LogDecoder::with_config(DecoderConfig::new().with_max_tokens(100)).unwrap();
    /// assert_eq!(decoder.config().max_tokens, 100);
    /// ```
    pub fn with_config(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a dump
    ///
    /// Tokens are consumed in pairs `(low, high)`. Decoding stops at the first pair equal
    /// to the sentinel, at the token cap, or when no complete pair is left; a trailing
    /// unpaired token is dropped. Tokens that are never reached are never parsed, so
    /// garbage after the sentinel does not fail the call.
    ///
    /// # Arguments
    /// * `raw_text` - Comma separated `0xNN` tokens
    /// * `name` - Logical name of the dump, carried into the summary
    ///
    /// # Returns
    /// * `Err(DecoderError::MalformedToken)` if a reached token is not a hex byte.
    ///   Nothing decoded up to that point is returned.
    ///
    /// # Example
    /// ```
    /// use battery_log_decoder::LogDecoder;
    ///
    /// let dump = LogDecoder::new().decode("0x10,0x27", "run1").unwrap();
    /// assert_eq!(dump.series.milli_volts(), vec![10_000]);
    /// ```
    pub fn decode(&self, raw_text: &str, name: &str) -> Result<DecodedDump> {
        let token_count = tokenize(raw_text).count();
        log::debug!("Decoding dump {:?} ({} tokens)", name, token_count);

        if token_count > self.config.max_tokens {
            log::debug!(
                "Dump {:?} exceeds token cap, ignoring {} trailing tokens",
                name,
                token_count - self.config.max_tokens
            );
        }

        let mut tokens = tokenize(raw_text).take(self.config.max_tokens).enumerate();
        let mut series = Series::new();
        let mut cumulative = 0.0;

        let end = loop {
            let Some((low_index, low)) = tokens.next() else {
                break DecodeEnd::Exhausted;
            };
            let Some((high_index, high)) = tokens.next() else {
                log::trace!("Dropping unpaired trailing token {:?}", low);
                break DecodeEnd::Exhausted;
            };

            let milli_volts = millivolts(parse_byte(low_index, low)?, parse_byte(high_index, high)?);
            if milli_volts == self.config.sentinel_millivolts {
                break DecodeEnd::Sentinel;
            }
            if milli_volts == 0 {
                log::warn!("Dump {:?} has a zero voltage reading at minute {}", name, series.len());
            }

            let milli_amps = self.config.power_milliwatts / f64::from(milli_volts);
            cumulative += milli_amps * 1000.0 / MINUTES_PER_HOUR;

            let sample = Sample {
                minute: series.len(),
                milli_volts,
                milli_amps,
                cumulative_milliamp_hours: cumulative,
            };
            log::trace!("{:?}", sample);
            series.push(sample);
        };

        let summary = Summary::from_series(name, &series);
        log::debug!(
            "Decoded {:?}: {} samples, stopped at {}",
            name,
            series.len(),
            end
        );

        Ok(DecodedDump {
            raw: RawDump::new(raw_text, token_count),
            series,
            summary,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecoderError;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_sample() {
        let dump = LogDecoder::new().decode("0x10,0x27", "a").unwrap();
        let sample = dump.series.samples()[0];
        assert_eq!(sample.minute, 0);
        assert_eq!(sample.milli_volts, 10_000);
        assert!(close(sample.milli_amps, 0.12));
        assert!(close(sample.cumulative_milliamp_hours, 2.0));
        assert_eq!(dump.end, DecodeEnd::Exhausted);
    }

    #[test]
    fn test_cumulative_accumulates() {
        // 10000 mV then 5000 mV: 2.0 + 4.0
        let dump = LogDecoder::new().decode("0x10,0x27,0x88,0x13", "a").unwrap();
        let totals: Vec<f64> = dump
            .series
            .iter()
            .map(|s| s.cumulative_milliamp_hours)
            .collect();
        assert_eq!(totals.len(), 2);
        assert!(close(totals[0], 2.0));
        assert!(close(totals[1], 6.0));
        assert_eq!(dump.series.samples()[1].minute, 1);
        assert!(close(dump.summary.total_milliamp_hours, 6.0));
    }

    #[test]
    fn test_sentinel_stops_decoding() {
        let dump = LogDecoder::new()
            .decode("0x10,0x27,0xFF,0xFF,0x10,0x27", "a")
            .unwrap();
        assert_eq!(dump.series.len(), 1);
        assert_eq!(dump.end, DecodeEnd::Sentinel);
    }

    #[test]
    fn test_garbage_after_sentinel_is_ignored() {
        let dump = LogDecoder::new().decode("0xff,0xff,zzz", "a").unwrap();
        assert!(dump.series.is_empty());
    }

    #[test]
    fn test_malformed_token_fails() {
        let err = LogDecoder::new()
            .decode("0x10,0x27,0x10,0xZZ", "a")
            .unwrap_err();
        match err {
            DecoderError::MalformedToken { index, token } => {
                assert_eq!(index, 3);
                assert_eq!(token, "0xZZ");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_token_cap() {
        let decoder = LogDecoder::with_config(DecoderConfig::new().with_max_tokens(3)).unwrap();
        let dump = decoder.decode("0x10,0x27,0x10,0x27,0x10,0x27", "a").unwrap();
        assert_eq!(dump.series.len(), 1);
        assert_eq!(dump.raw.token_count(), 6);
        assert!(dump.is_truncated(decoder.config().max_tokens));
    }

    #[test]
    fn test_malformed_token_past_cap_is_ignored() {
        let decoder = LogDecoder::with_config(DecoderConfig::new().with_max_tokens(2)).unwrap();
        let dump = decoder.decode("0x10,0x27,bogus", "a").unwrap();
        assert_eq!(dump.series.len(), 1);
    }

    #[test]
    fn test_custom_power_and_sentinel() {
        let config = DecoderConfig::new()
            .with_power_milliwatts(600.0)
            .with_sentinel(10_000);
        let decoder = LogDecoder::with_config(config).unwrap();

        let dump = decoder.decode("0x88,0x13,0x10,0x27", "a").unwrap();
        assert_eq!(dump.series.len(), 1);
        assert!(close(dump.series.samples()[0].milli_amps, 0.12));
        assert_eq!(dump.end, DecodeEnd::Sentinel);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = LogDecoder::with_config(DecoderConfig::new().with_max_tokens(0));
        assert!(matches!(result, Err(DecoderError::InvalidConfig(_))));
    }

    #[test]
    fn test_raw_text_preserved() {
        let text = "0x10,0x27,\n";
        let dump = LogDecoder::new().decode(text, "a").unwrap();
        assert_eq!(dump.raw.text(), text);
        assert_eq!(dump.name(), "a");
    }
}
