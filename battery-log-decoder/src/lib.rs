//! Battery Log Decoder Library
//!
//! Decodes the hex EEPROM dumps written by the robot's onboard battery logger into a
//! per-minute series of supply voltage, derived current and consumed charge.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on decoding:
//! - Parses the `0xNN,0xNN,...` token stream into 16-bit voltage readings
//! - Stops at the erased-memory sentinel or the token cap
//! - Derives current and milliamp-hours from a constant power model
//! - Renders and re-reads the plot data line format
//!
//! The library does NOT:
//! - Find dump files or write anything to disk
//! - Run gnuplot
//! - Print reports
//!
//! All of that is in the application layer (battery-log-cli).
//!
//! # Example Usage
//!
//! ```
//! use battery_log_decoder::{to_plot_data, LogDecoder};
//!
//! let decoder = LogDecoder::new();
//! let dump = decoder.decode("0x10,0x27,0x88,0x13,0xFF,0xFF", "run1").unwrap();
//!
//! assert_eq!(dump.summary.duration_minutes, 2);
//! println!("{}", dump.summary);
//! print!("{}", to_plot_data(&dump.series));
//! ```

// Public modules
pub mod config;
pub mod decoder;
pub mod plot_data;
pub mod types;

// Re-export main types for convenience
pub use config::{DecoderConfig, MAX_TOKENS, POWER_MILLIWATTS, SENTINEL_MILLIVOLTS};
pub use decoder::LogDecoder;
pub use plot_data::{parse_plot_data, to_plot_data};
pub use types::{
    DecodeEnd, DecodedDump, DecoderError, RawDump, Result, Sample, Series, Summary,
};

// Internal modules (not exposed in public API)
mod token;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
