use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::ReportError;
use crate::model::item::RawItem;

/// `<prefix>_<YYYY-MM-DD>.<ext>`
pub fn default_output_path(prefix: &str, date: NaiveDate, ext: &str) -> PathBuf {
    PathBuf::from(format!("{}_{}.{}", prefix, date.format("%Y-%m-%d"), ext))
}

/// Write `contents` to `path` atomically: a temp file in the same
/// directory is renamed over the target.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ReportError> {
    let write_err = |e: std::io::Error| ReportError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

pub fn write_report(path: &Path, markdown: &str) -> Result<(), ReportError> {
    write_atomic(path, markdown)?;
    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}

/// Dump the fetched items verbatim as pretty JSON
pub fn dump_raw_items(path: &Path, items: &[Value]) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(items)?;
    write_atomic(path, &json)?;
    tracing::info!("Raw data dumped to: {}", path.display());
    Ok(())
}

/// Read a JSON array of raw items written by [`dump_raw_items`]
pub fn read_raw_items(path: &Path) -> Result<Vec<Value>, ReportError> {
    let text = fs::read_to_string(path).map_err(|e| ReportError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| ReportError::InvalidDump {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Decode raw nodes into typed items. A node that is not even an object is
/// dropped with a warning rather than failing the whole report.
pub fn decode_items(nodes: &[Value]) -> Vec<RawItem> {
    nodes
        .iter()
        .enumerate()
        .filter_map(|(i, node)| match serde_json::from_value::<RawItem>(node.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index = i, error = %e, "skipping undecodable board item");
                None
            }
        })
        .collect()
}
