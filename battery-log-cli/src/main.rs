//! Battery Log CLI Application
//!
//! Command-line front end for the battery-log-decoder library. It adds everything the
//! library leaves out:
//! - Finding `*.hex` dumps in a directory
//! - Archiving raw dumps and their plot data
//! - Printing summaries (text and JSON)
//! - Drawing voltage / current / charge charts with gnuplot

use anyhow::{bail, Context, Result};
use battery_log_decoder::{DecodedDump, LogDecoder};
use clap::Parser;
use rayon::prelude::*;
use std::io;
use std::path::PathBuf;

mod archive;
mod config;
mod discovery;
mod plot;
mod report;

use archive::ArchiveLayout;
use config::AppConfig;
use discovery::DumpSource;

/// Battery Log - Decode robot battery EEPROM dumps and plot the discharge
#[derive(Parser, Debug)]
#[command(name = "battery-log-cli")]
#[command(about = "Decode battery logger EEPROM dumps and plot the discharge", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the *.hex dumps (default: dumps)
    #[arg(long, value_name = "DIR")]
    dumps_dir: Option<PathBuf>,

    /// Directory for the *.data plot data (default: datas)
    #[arg(long, value_name = "DIR")]
    datas_dir: Option<PathBuf>,

    /// Directory for the PNG charts (default: plots)
    #[arg(long, value_name = "DIR")]
    plots_dir: Option<PathBuf>,

    /// Do not run gnuplot
    #[arg(long)]
    no_plot: bool,

    /// Also write all summaries as JSON to this file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Abort on the first dump that fails to decode
    #[arg(long)]
    fail_fast: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Battery Log CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", battery_log_decoder::VERSION);

    let config = resolve_config(&args)?;
    run(&config)
}

/// Load the config file (if any) and apply command line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(dir) = &args.dumps_dir {
        config.paths.dumps_dir = dir.clone();
    }
    if let Some(dir) = &args.datas_dir {
        config.paths.datas_dir = dir.clone();
    }
    if let Some(dir) = &args.plots_dir {
        config.paths.plots_dir = dir.clone();
    }
    if args.no_plot {
        config.plot.enabled = false;
    }
    if args.json.is_some() {
        config.output.json_summary = args.json.clone();
    }
    if args.fail_fast {
        config.output.fail_fast = true;
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Decode, archive, report and plot every dump
fn run(config: &AppConfig) -> Result<()> {
    let decoder = LogDecoder::with_config(config.decoder.clone())?;
    let max_tokens = decoder.config().max_tokens;
    let layout = ArchiveLayout {
        dumps_dir: config.paths.dumps_dir.clone(),
        datas_dir: config.paths.datas_dir.clone(),
    };

    let sources = discovery::discover_dumps(&config.paths.dumps_dir)?;

    // Dumps share nothing, so decode them all at once
    let results: Vec<(&DumpSource, Result<DecodedDump>)> = sources
        .par_iter()
        .map(|source| (source, decode_source(&decoder, source)))
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut decoded = Vec::with_capacity(results.len());
    let mut failures = 0usize;

    for (source, result) in results {
        match result.and_then(|dump| archive::file_away(&dump, &layout).map(|_| dump)) {
            Ok(dump) => {
                report::write_text_report(&mut out, &dump, max_tokens)?;
                decoded.push(dump);
            }
            Err(e) if config.output.fail_fast => {
                return Err(e.context(format!("Stopping at dump {:?}", source.name)));
            }
            Err(e) => {
                log::error!("Skipping dump {:?}: {:#}", source.name, e);
                failures += 1;
            }
        }
    }

    if let Some(path) = &config.output.json_summary {
        report::write_json_report(path, &decoded, max_tokens)?;
    }

    if config.plot.enabled {
        let data_files = discovery::discover_plot_data(&config.paths.datas_dir)?;
        let charts = plot::plot(&config.plot.gnuplot, &data_files, &config.paths.plots_dir)?;
        for chart in charts {
            log::info!("Wrote chart {:?}", chart);
        }
    }

    if failures > 0 {
        bail!("{} of {} dump(s) failed to decode", failures, sources.len());
    }
    Ok(())
}

fn decode_source(decoder: &LogDecoder, source: &DumpSource) -> Result<DecodedDump> {
    let text = source.read()?;
    decoder
        .decode(&text, &source.name)
        .with_context(|| format!("Failed to decode {:?}", source.path))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
