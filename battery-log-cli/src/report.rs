//! Report generation
//!
//! Human readable summaries go to stdout; the same summaries can be saved as JSON.

use anyhow::{Context, Result};
use battery_log_decoder::{DecodedDump, Summary};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// One dump's line in the JSON report
#[derive(Debug, Serialize)]
pub struct ReportEntry<'a> {
    #[serde(flatten)]
    pub summary: &'a Summary,
    pub token_count: usize,
    pub truncated: bool,
    pub ended_at_sentinel: bool,
}

impl<'a> ReportEntry<'a> {
    pub fn new(dump: &'a DecodedDump, max_tokens: usize) -> Self {
        Self {
            summary: &dump.summary,
            token_count: dump.raw.token_count(),
            truncated: dump.is_truncated(max_tokens),
            ended_at_sentinel: dump.end == battery_log_decoder::DecodeEnd::Sentinel,
        }
    }
}

/// Print the text report for one dump
pub fn write_text_report<W: Write>(out: &mut W, dump: &DecodedDump, max_tokens: usize) -> Result<()> {
    if dump.is_truncated(max_tokens) {
        log::warn!(
            "Dump {:?} has {} tokens, only the first {} were decoded",
            dump.name(),
            dump.raw.token_count(),
            max_tokens
        );
    }
    writeln!(out, "{}", dump.summary)?;
    Ok(())
}

/// Serialize all summaries as a JSON array
pub fn to_json(dumps: &[DecodedDump], max_tokens: usize) -> Result<String> {
    let entries: Vec<ReportEntry<'_>> = dumps
        .iter()
        .map(|d| ReportEntry::new(d, max_tokens))
        .collect();
    serde_json::to_string_pretty(&entries).context("Failed to serialize summaries")
}

pub fn write_json_report(path: &Path, dumps: &[DecodedDump], max_tokens: usize) -> Result<()> {
    let json = to_json(dumps, max_tokens)?;
    fs::write(path, json).with_context(|| format!("Failed to write JSON report: {:?}", path))?;
    log::info!("Wrote JSON summary for {} dump(s) to {:?}", dumps.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use battery_log_decoder::LogDecoder;

    #[test]
    fn test_text_report() {
        let dump = LogDecoder::new().decode("0x10,0x27,0xff,0xff", "run1").unwrap();
        let mut out = Vec::new();
        write_text_report(&mut out, &dump, 9999).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Name: run1\n"));
        assert!(text.contains("Total Minutes: 1"));
        assert!(text.contains("milliAmpHours: 2.000"));
    }

    #[test]
    fn test_json_report() {
        let decoder = LogDecoder::new();
        let dumps = vec![
            decoder.decode("0x10,0x27,0xff,0xff", "a").unwrap(),
            decoder.decode("0x10,0x27,0x10,0x27", "b").unwrap(),
        ];

        let json = to_json(&dumps, 3).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "a");
        assert_eq!(entries[0]["duration_minutes"], 1);
        assert_eq!(entries[0]["ended_at_sentinel"], true);
        assert_eq!(entries[1]["truncated"], true);
        assert_eq!(entries[1]["token_count"], 4);
    }
}
