//! Error types for the load → clean → join pipeline.

use polars::prelude::PolarsError;
use std::path::Path;
use thiserror::Error;

/// Errors raised while building the joined snapshot.
///
/// Every variant is fatal to startup; there is no partial service.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Spreadsheet missing, unreadable, or not a workbook.
    #[error("failed to load {path}: {reason}")]
    DataLoad {
        /// File that failed to load.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// A column the join or filter depends on is absent.
    #[error("schema mismatch: {table} table has no column {column}")]
    SchemaMismatch {
        /// Logical table name.
        table: String,
        /// Missing column.
        column: String,
    },

    /// Frame engine failure.
    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),
}

impl EtlError {
    /// Creates a load error for `path`.
    pub fn data_load(path: &Path, reason: impl ToString) -> Self {
        Self::DataLoad {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a schema mismatch error.
    pub fn schema_mismatch(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            table: table.into(),
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
