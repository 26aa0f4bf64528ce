//! Dump file discovery
//!
//! Dumps are `<name>.hex` files sitting directly in one directory; the file stem is the
//! dump's logical name. Plot data files are found the same way by their `.data` extension.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DUMP_EXTENSION: &str = "hex";
pub const PLOT_DATA_EXTENSION: &str = "data";

/// A dump file and the name it is known by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSource {
    pub name: String,
    pub path: PathBuf,
}

impl DumpSource {
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read dump file: {:?}", self.path))
    }
}

/// All `*.hex` dumps in `dir`, sorted by name
pub fn discover_dumps(dir: &Path) -> Result<Vec<DumpSource>> {
    let dumps = files_with_extension(dir, DUMP_EXTENSION)?
        .into_iter()
        .filter_map(|path| {
            let name = path.file_stem()?.to_str()?.to_string();
            Some(DumpSource { name, path })
        })
        .collect::<Vec<_>>();

    log::info!("Found {} dump(s) in {:?}", dumps.len(), dir);
    Ok(dumps)
}

/// All `*.data` plot data files in `dir`, sorted by path
pub fn discover_plot_data(dir: &Path) -> Result<Vec<PathBuf>> {
    files_with_extension(dir, PLOT_DATA_EXTENSION)
}

fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {:?}", dir))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list directory: {:?}", dir))?
            .path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
