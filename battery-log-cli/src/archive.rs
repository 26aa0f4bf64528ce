//! Archiving decoded dumps
//!
//! Each dump is stored twice: the raw text verbatim as `<name>.hex`, and the derived
//! series as `<name>.data` for gnuplot.

use anyhow::{Context, Result};
use battery_log_decoder::{to_plot_data, DecodedDump};
use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::{DUMP_EXTENSION, PLOT_DATA_EXTENSION};

/// Target directories for archived files
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    pub dumps_dir: PathBuf,
    pub datas_dir: PathBuf,
}

/// Paths written by [`file_away`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedFiles {
    pub raw: PathBuf,
    pub plot_data: PathBuf,
}

impl ArchiveLayout {
    pub fn raw_path(&self, name: &str) -> PathBuf {
        self.dumps_dir.join(format!("{}.{}", name, DUMP_EXTENSION))
    }

    pub fn plot_data_path(&self, name: &str) -> PathBuf {
        self.datas_dir.join(format!("{}.{}", name, PLOT_DATA_EXTENSION))
    }
}

/// Write the raw dump and its plot data
pub fn file_away(dump: &DecodedDump, layout: &ArchiveLayout) -> Result<ArchivedFiles> {
    let files = ArchivedFiles {
        raw: layout.raw_path(dump.name()),
        plot_data: layout.plot_data_path(dump.name()),
    };

    write_file(&files.raw, dump.raw.text())?;
    write_file(&files.plot_data, &to_plot_data(&dump.series))?;

    log::debug!("Archived {:?} to {:?} and {:?}", dump.name(), files.raw, files.plot_data);
    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use battery_log_decoder::{parse_plot_data, LogDecoder};

    #[test]
    fn test_file_away_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout {
            dumps_dir: dir.path().join("dumps"),
            datas_dir: dir.path().join("datas"),
        };

        let text = "0x10,0x27,0x88,0x13,0xff,0xff\n";
        let dump = LogDecoder::new().decode(text, "run1").unwrap();
        let files = file_away(&dump, &layout).unwrap();

        assert_eq!(files.raw, dir.path().join("dumps/run1.hex"));
        assert_eq!(fs::read_to_string(&files.raw).unwrap(), text);

        let data = fs::read_to_string(&files.plot_data).unwrap();
        assert_eq!(data.lines().count(), 2);
        assert_eq!(parse_plot_data(&data).unwrap(), dump.series);
    }

    #[test]
    fn test_file_away_overwrites_source_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout {
            dumps_dir: dir.path().to_path_buf(),
            datas_dir: dir.path().join("datas"),
        };
        let source = dir.path().join("run1.hex");
        fs::write(&source, "0x10,0x27").unwrap();

        let dump = LogDecoder::new()
            .decode(&fs::read_to_string(&source).unwrap(), "run1")
            .unwrap();
        file_away(&dump, &layout).unwrap();

        assert_eq!(fs::read_to_string(&source).unwrap(), "0x10,0x27");
    }
}
