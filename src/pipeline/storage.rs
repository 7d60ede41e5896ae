use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{LayerError, Result};
use crate::pipeline::table::Table;

/// Load a layer file from disk.
pub fn read_table(path: &Path) -> Result<Table> {
    debug!("Reading table from {}", path.display());
    let file = File::open(path)?;
    Table::from_csv_reader(BufReader::new(file))
}

/// Write a table to `path`, replacing any previous file.
///
/// The table is serialized into a temporary file in the destination directory
/// and only persisted over `path` once complete, so a failure leaves the old
/// file (or no file) in place. Returns the hex sha256 of the written bytes.
pub fn write_table(path: &Path, table: &Table) -> Result<String> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut bytes = Vec::new();
    table.to_csv_writer(&mut bytes)?;
    let digest = hex::encode(Sha256::digest(&bytes));

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        writer.write_all(&bytes)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| LayerError::Io(e.error))?;

    debug!(
        "Wrote {} rows x {} columns to {} (sha256 {})",
        table.row_count(),
        table.columns().len(),
        path.display(),
        digest
    );
    Ok(digest)
}
