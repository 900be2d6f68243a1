//! CSV reader for the data-quality result table plus the per-process cache.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dioxus::logger::tracing::{debug, info};
use once_cell::sync::Lazy;

use crate::settings::Settings;
use crate::SourceRow;

/// Columns that must be present in the table header.
pub const REQUIRED_COLUMNS: [&str; 3] = ["TEST_NAME", "TEST_PARAMETERS", "TEST_RESULT_VALUE"];

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("DQ_TABLE_ID is not set")]
    MissingTableId,
    #[error("couldn't open table file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("table is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("malformed table CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A result table materialised as a CSV file.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    path: PathBuf,
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_table(&self) -> Result<Vec<SourceRow>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        read_rows(file)
    }
}

/// Decode table rows from any CSV byte stream with a header row.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<SourceRow>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SourceError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<SourceRow>() {
        rows.push(record?);
    }
    debug!(rows = rows.len(), "decoded result table");
    Ok(rows)
}

static TABLE_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Vec<SourceRow>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Load the table named by the environment, reusing an earlier read of the same file.
pub fn load_configured_table() -> Result<Arc<Vec<SourceRow>>, SourceError> {
    let settings = Settings::from_env()?;
    load_cached(&CsvTableSource::new(settings.table_path))
}

pub fn load_cached(source: &CsvTableSource) -> Result<Arc<Vec<SourceRow>>, SourceError> {
    let mut cache = TABLE_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(rows) = cache.get(source.path()) {
        return Ok(rows.clone());
    }

    let rows = Arc::new(source.read_table()?);
    info!(
        rows = rows.len(),
        path = %source.path().display(),
        "loaded data-quality result table"
    );
    cache.insert(source.path().to_path_buf(), rows.clone());
    Ok(rows)
}
