//! Environment-driven configuration for locating the result table.
//!
//! Variables
//! ---------
//! - `DQ_TABLE_ID` (required): platform table identifier, e.g. `in.c-dq.results`.
//! - `DQLENS_DATA_DIR`: directory holding input-mapped tables
//!   (default `/data/in/tables`).
//! - `DQLENS_TABLE_PATH`: explicit CSV path; wins over the data dir.

use std::path::PathBuf;

use crate::source::SourceError;

pub const TABLE_ID_VAR: &str = "DQ_TABLE_ID";
pub const DATA_DIR_VAR: &str = "DQLENS_DATA_DIR";
pub const TABLE_PATH_VAR: &str = "DQLENS_TABLE_PATH";

const DEFAULT_DATA_DIR: &str = "/data/in/tables";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub table_id: String,
    pub table_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SourceError> {
        let table_id = lookup(TABLE_ID_VAR)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(SourceError::MissingTableId)?;

        let table_path = match lookup(TABLE_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                let dir = lookup(DATA_DIR_VAR)
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
                PathBuf::from(dir).join(table_file_name(&table_id))
            }
        };

        Ok(Self {
            table_id,
            table_path,
        })
    }
}

fn table_file_name(table_id: &str) -> String {
    if table_id.ends_with(".csv") {
        table_id.to_string()
    } else {
        format!("{table_id}.csv")
    }
}
