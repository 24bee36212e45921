//! Spreadsheet ingestion for the sales KPI service.
//!
//! This crate provides:
//! - Loader for the opportunity and loss/won workbook extracts
//! - Cleaner for whitespace, null and case normalization
//! - Joiner for the opportunity ⟕ loss/won join and the sales allow-list filter
//! - Snapshot, the immutable joined table shared by every request

pub mod cleaner;
pub mod coerce;
pub mod error;
pub mod joiner;
pub mod loader;
pub mod schema;
pub mod snapshot;

pub use cleaner::Cleaner;
pub use coerce::{coerce_number, number_text, numeric_values, text_values};
pub use error::{EtlError, Result};
pub use joiner::Joiner;
pub use loader::{Loader, RawTables};
pub use schema::Capabilities;
pub use snapshot::{SalesView, Snapshot};
