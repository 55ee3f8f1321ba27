//! Plain CSV file primitives: read the first column, read every row, append
//! one row.
//!
//! None of these keep a handle open between calls; every operation opens the
//! file, does its work and closes it again.

use std::fs::OpenOptions;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Return the first field of every non-empty row, in file order.
///
/// A missing file yields an empty list.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_column(path: &Path) -> Result<Vec<String>> {
    let values: Vec<String> = read_rows(path)?
        .into_iter()
        .filter_map(|record| record.get(0).map(str::to_string))
        .collect();
    debug!("Read {} entries from {}", values.len(), path.display());
    Ok(values)
}

/// Read every row of a CSV file without header handling.
///
/// A missing file yields no rows. Rows may have differing field counts.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_rows(path: &Path) -> Result<Vec<StringRecord>> {
    if !path.exists() {
        trace!("{} does not exist; treating as empty", path.display());
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| read_error(path, source))?;

    reader
        .records()
        .filter(|record| !matches!(record, Ok(r) if r.is_empty()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|source| read_error(path, source))
}

/// Append one row, creating the file first if needed.
///
/// When the file is new (absent or zero length) the `header` is written
/// before the row. Existing content is never touched.
///
/// Returns `true` if the file was created by this call.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or written.
pub fn append_row<I, T>(path: &Path, header: Option<&[&str]>, row: I) -> Result<bool>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let is_new = std::fs::metadata(path).map_or(true, |meta| meta.len() == 0);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    if is_new {
        if let Some(header) = header {
            writer
                .write_record(header)
                .map_err(|source| write_error(path, source))?;
        }
    }
    writer
        .write_record(row)
        .map_err(|source| write_error(path, source))?;
    writer.flush()?;

    debug!(
        "Appended row to {}{}",
        path.display(),
        if is_new { " (created)" } else { "" }
    );
    Ok(is_new)
}

fn read_error(path: &Path, source: csv::Error) -> Error {
    Error::CsvRead {
        path: path.to_path_buf(),
        source,
    }
}

fn write_error(path: &Path, source: csv::Error) -> Error {
    Error::CsvWrite {
        path: path.to_path_buf(),
        source,
    }
}
