//! Core types for the battery log decoder library
//!
//! This module defines everything the decoder hands back to its caller: the raw dump
//! it was given, the derived series of samples and a summary over that series.
//! All of these are built once during a decode call and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors that can occur during decoding
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Malformed token #{index}: {token:?} is not a 0x-prefixed one or two digit hex byte")]
    MalformedToken { index: usize, token: String },

    #[error("Invalid plot data on line {line}: {reason}")]
    PlotDataParse { line: usize, reason: String },

    #[error("Invalid decoder configuration: {0}")]
    InvalidConfig(String),
}

/// One decoded minute of the discharge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Position in the series, also the elapsed minutes
    pub minute: usize,
    /// Supply voltage reconstructed from two byte tokens
    pub milli_volts: u16,
    /// Current derived from the constant power model
    pub milli_amps: f64,
    /// Running total of the per-minute contributions
    pub cumulative_milliamp_hours: f64,
}

/// Ordered samples, index = minute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Sample>);

impl Series {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.0.push(sample);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.0.last()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    /// Voltage column only, in minute order
    pub fn milli_volts(&self) -> Vec<u16> {
        self.0.iter().map(|s| s.milli_volts).collect()
    }
}

impl From<Vec<Sample>> for Series {
    fn from(samples: Vec<Sample>) -> Self {
        Self(samples)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The dump text exactly as the caller supplied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDump {
    text: String,
    token_count: usize,
}

impl RawDump {
    pub(crate) fn new(text: &str, token_count: usize) -> Self {
        Self {
            text: text.to_owned(),
            token_count,
        }
    }

    /// Original text, suitable for archiving verbatim
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of tokens in the whole text, before the token cap was applied
    pub fn token_count(&self) -> usize {
        self.token_count
    }
}

/// Read-only view over a decoded series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Logical name of the dump (file base name)
    pub name: String,
    /// One sample per minute, so this is the series length
    pub duration_minutes: usize,
    /// Last cumulative value, 0 for an empty series
    pub total_milliamp_hours: f64,
}

impl Summary {
    pub fn from_series(name: impl Into<String>, series: &Series) -> Self {
        Self {
            name: name.into(),
            duration_minutes: series.len(),
            total_milliamp_hours: series
                .last()
                .map(|s| s.cumulative_milliamp_hours)
                .unwrap_or(0.0),
        }
    }

    /// How long the robot ran on this charge
    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.duration_minutes as i64)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = self.duration();
        writeln!(f, "Name: {}", self.name)?;
        writeln!(
            f,
            "Total Minutes: {} ({}h {:02}m)",
            self.duration_minutes,
            duration.num_hours(),
            duration.num_minutes() % 60
        )?;
        write!(f, "milliAmpHours: {:.3}", self.total_milliamp_hours)
    }
}

/// Why decoding stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeEnd {
    /// Hit the erased-memory marker
    Sentinel,
    /// Ran out of complete token pairs
    Exhausted,
}

impl fmt::Display for DecodeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeEnd::Sentinel => write!(f, "sentinel"),
            DecodeEnd::Exhausted => write!(f, "end of tokens"),
        }
    }
}

/// Everything a single decode call produces
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedDump {
    pub raw: RawDump,
    pub series: Series,
    pub summary: Summary,
    pub end: DecodeEnd,
}

impl DecodedDump {
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    /// True if the dump had more tokens than the decoder was allowed to look at.
    ///
    /// The decoder itself never reports truncation; this is the comparison a caller
    /// would otherwise do by hand.
    pub fn is_truncated(&self, max_tokens: usize) -> bool {
        self.raw.token_count() > max_tokens
    }
}
