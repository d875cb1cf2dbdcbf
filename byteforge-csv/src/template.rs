//! New CSV asset template
//!
//! Creates the starter `.csv` file the editor tooling offers when a new
//! data table is added to a project.

use crate::writer::CsvWriter;
use byteforge_core::{CSV_EXTENSION, LineEnding, Result, TEMPLATE_HEADER, TEMPLATE_ROW};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default file stem for new assets
pub const DEFAULT_ASSET_NAME: &str = "New CSV";

/// First free `<stem>.csv`, `<stem> 1.csv`, `<stem> 2.csv`, ... in `dir`
pub fn unique_asset_path<P: AsRef<Path>>(dir: P, stem: &str) -> PathBuf {
    let dir = dir.as_ref();
    let mut candidate = dir.join(format!("{}.{}", stem, CSV_EXTENSION));
    let mut suffix = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{} {}.{}", stem, suffix, CSV_EXTENSION));
        suffix += 1;
    }
    candidate
}

/// Write the template header and row to a new file at `path`
///
/// Fails if the file already exists.
pub fn write_template<P: AsRef<Path>>(path: P, line_ending: LineEnding) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;

    let mut writer = CsvWriter::new(file).with_line_ending(line_ending);
    writer.write_record(TEMPLATE_HEADER)?;
    writer.write_record(TEMPLATE_ROW)?;
    writer.flush()?;

    debug!(path = %path.display(), "created CSV asset");
    Ok(())
}

/// Create a template asset under `dir` with a non-conflicting name
pub fn create_asset<P: AsRef<Path>>(dir: P, stem: &str, line_ending: LineEnding) -> Result<PathBuf> {
    let path = unique_asset_path(dir, stem);
    write_template(&path, line_ending)?;
    Ok(path)
}
