//! Plot data text format
//!
//! One line per sample, four space separated columns, no header:
//!
//! ```text
//! minute milli_volts milli_amps cumulative_milliamp_hours
//! ```
//!
//! This is what gnuplot reads with `using 1:2`, `using 1:3` and `using 1:4`.

use crate::types::{DecoderError, Result, Sample, Series};
use std::fmt::Write;

/// Render a series in plot data format
pub fn to_plot_data(series: &Series) -> String {
    let mut out = String::with_capacity(series.len() * 48);
    for sample in series {
        // Debug formatting keeps a trailing ".0" and round-trips exactly
        let _ = writeln!(
            out,
            "{} {} {:?} {:?}",
            sample.minute, sample.milli_volts, sample.milli_amps, sample.cumulative_milliamp_hours
        );
    }
    out
}

/// Read plot data back into a series
pub fn parse_plot_data(text: &str) -> Result<Series> {
    let mut samples = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let err = |reason: String| DecoderError::PlotDataParse {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(err(format!("expected 4 columns, found {}", fields.len())));
        }

        let minute = fields[0]
            .parse::<usize>()
            .map_err(|e| err(format!("minute {:?}: {}", fields[0], e)))?;
        if minute != samples.len() {
            return Err(err(format!(
                "minute {} out of order, expected {}",
                minute,
                samples.len()
            )));
        }

        samples.push(Sample {
            minute,
            milli_volts: fields[1]
                .parse()
                .map_err(|e| err(format!("milli_volts {:?}: {}", fields[1], e)))?,
            milli_amps: fields[2]
                .parse()
                .map_err(|e| err(format!("milli_amps {:?}: {}", fields[2], e)))?,
            cumulative_milliamp_hours: fields[3]
                .parse()
                .map_err(|e| err(format!("milliamp hours {:?}: {}", fields[3], e)))?,
        });
    }

    Ok(Series::from(samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogDecoder;

    #[test]
    fn test_line_format() {
        let dump = LogDecoder::new().decode("0x10,0x27,0x88,0x13", "a").unwrap();
        let text = to_plot_data(&dump.series);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0 10000 0.12 "));
        assert!(lines[1].starts_with("1 5000 0.24 "));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_integral_floats_keep_decimal_point() {
        let series = Series::from(vec![Sample {
            minute: 0,
            milli_volts: 1200,
            milli_amps: 1.0,
            cumulative_milliamp_hours: 2.0,
        }]);
        assert_eq!(to_plot_data(&series), "0 1200 1.0 2.0\n");
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(to_plot_data(&Series::new()), "");
        assert!(parse_plot_data("").unwrap().is_empty());
    }

    #[test]
    fn test_reparse_reproduces_series() {
        let dump = LogDecoder::new()
            .decode("0x10,0x27,0x88,0x13,0x5,0x1,0x34,0x12", "a")
            .unwrap();
        let reparsed = parse_plot_data(&to_plot_data(&dump.series)).unwrap();
        assert_eq!(reparsed.milli_volts(), dump.series.milli_volts());
        assert_eq!(reparsed, dump.series);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_plot_data("0 1 2"),
            Err(DecoderError::PlotDataParse { line: 1, .. })
        ));
        assert!(matches!(
            parse_plot_data("0 5000 0.24 4.0\n2 5000 0.24 8.0\n"),
            Err(DecoderError::PlotDataParse { line: 2, .. })
        ));
        assert!(matches!(
            parse_plot_data("0 70000 0.24 4.0\n"),
            Err(DecoderError::PlotDataParse { line: 1, .. })
        ));
    }
}
