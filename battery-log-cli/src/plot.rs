//! gnuplot chart generation
//!
//! Every plot data file becomes one line in each of three charts that share the minute
//! axis: voltage, current and consumed charge.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One chart: output file, labels and the data column plotted against minutes
struct Chart {
    file: &'static str,
    title: &'static str,
    ylabel: &'static str,
    column: u8,
}

const CHARTS: [Chart; 3] = [
    Chart {
        file: "voltage-vs-time.png",
        title: "Voltage vs Time",
        ylabel: "Voltage (millivolts)",
        column: 2,
    },
    Chart {
        file: "current-vs-time.png",
        title: "Current vs Time",
        ylabel: "Current (amps)",
        column: 3,
    },
    Chart {
        file: "amphours-vs-time.png",
        title: "Amp Hours vs Time",
        ylabel: "milliAmp-hours",
        column: 4,
    },
];

/// Paths of the charts a script built for `plots_dir` will produce
pub fn chart_paths(plots_dir: &Path) -> Vec<PathBuf> {
    CHARTS.iter().map(|c| plots_dir.join(c.file)).collect()
}

/// Quote a path for a gnuplot single-quoted string
fn quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

/// `'a' using 1:N with lines, 'b' using 1:N with lines`
fn dataset_list(data_files: &[PathBuf], column: u8) -> String {
    data_files
        .iter()
        .map(|p| format!("{} using 1:{} with lines", quote(p), column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the gnuplot script for all data files
pub fn build_gnuplot_script(data_files: &[PathBuf], plots_dir: &Path) -> String {
    let mut script = String::from("set terminal png\n");
    for chart in &CHARTS {
        script.push_str(&format!(
            "\nset output {}\n\nset title '{}'\nset xlabel 'Time (minutes)'\nset ylabel '{}'\n\nplot {}\n",
            quote(&plots_dir.join(chart.file)),
            chart.title,
            chart.ylabel,
            dataset_list(data_files, chart.column)
        ));
    }
    script
}

/// Feed a script to gnuplot on stdin and wait for it
pub fn run_gnuplot(gnuplot: &Path, script: &str) -> Result<()> {
    log::debug!("Running {:?}", gnuplot);

    let mut child = Command::new(gnuplot)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start gnuplot: {:?}", gnuplot))?;

    child
        .stdin
        .take()
        .context("gnuplot stdin not available")?
        .write_all(script.as_bytes())
        .context("Failed to send script to gnuplot")?;

    let status = child.wait().context("Failed to wait for gnuplot")?;
    if !status.success() {
        bail!("gnuplot exited with {}", status);
    }
    Ok(())
}

/// Create `plots_dir`, then draw every data file into the three charts
pub fn plot(gnuplot: &Path, data_files: &[PathBuf], plots_dir: &Path) -> Result<Vec<PathBuf>> {
    if data_files.is_empty() {
        log::info!("No plot data, skipping charts");
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(plots_dir)
        .with_context(|| format!("Failed to create directory: {:?}", plots_dir))?;

    let script = build_gnuplot_script(data_files, plots_dir);
    log::trace!("gnuplot script:\n{}", script);
    run_gnuplot(gnuplot, &script)?;

    Ok(chart_paths(plots_dir))
}
