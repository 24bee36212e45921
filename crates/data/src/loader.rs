//! Reads the CRM spreadsheet extracts into frames.
//!
//! The first worksheet of each workbook is used and its first row is the
//! header. Columns whose non-empty cells are all numbers become `Float64`;
//! everything else becomes `String`.

use crate::coerce::number_text;
use crate::error::{EtlError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;
use sales_kpi_core::DataConfig;
use std::collections::HashMap;
use std::path::Path;

pub struct Loader;

/// The two raw tables, exactly as read from disk.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub opportunities: DataFrame,
    pub loss_won: DataFrame,
}

impl Loader {
    /// Loads both extracts from the configured data directory.
    ///
    /// # Errors
    /// Returns [`EtlError::DataLoad`] if either file is missing or is not a valid workbook.
    pub fn load_all(config: &DataConfig) -> Result<RawTables> {
        tracing::info!(dir = %config.dir.display(), "Loading spreadsheet extracts");

        let opportunities = Self::load_workbook(&config.opportunity_path())?;
        let loss_won = Self::load_workbook(&config.loss_won_path())?;

        Ok(RawTables {
            opportunities,
            loss_won,
        })
    }

    /// Reads the first worksheet of a workbook into a frame.
    ///
    /// # Errors
    /// Returns [`EtlError::DataLoad`] if the file is missing, unreadable or has no worksheet.
    pub fn load_workbook(path: &Path) -> Result<DataFrame> {
        if !path.is_file() {
            return Err(EtlError::data_load(path, "file not found"));
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| EtlError::data_load(path, e))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| EtlError::data_load(path, "workbook has no worksheets"))?
            .map_err(|e| EtlError::data_load(path, e))?;

        let frame = Self::range_to_frame(&range)?;
        tracing::info!(
            path = %path.display(),
            rows = frame.height(),
            columns = frame.width(),
            "Spreadsheet loaded"
        );

        Ok(frame)
    }

    /// Converts a worksheet range into a frame, header row first.
    ///
    /// # Errors
    /// Returns an error if the frame cannot be assembled.
    pub fn range_to_frame(range: &Range<Data>) -> Result<DataFrame> {
        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(DataFrame::default());
        };
        let body: Vec<&[Data]> = rows.collect();

        let columns = header_names(header)
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<&Data> = body
                    .iter()
                    .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                    .collect();
                build_series(name, &cells)
            })
            .collect::<Vec<_>>();

        Ok(DataFrame::new(columns)?)
    }
}

/// Blank headers become `Unnamed: <idx>`; repeats get a `.<n>` suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell_text(cell)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| format!("Unnamed: {idx}"));
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

fn is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty | Data::Error(_))
}

#[allow(clippy::cast_precision_loss)]
fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(number_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map_or_else(|| dt.as_f64().to_string(), |d| {
                    d.format("%Y-%m-%dT%H:%M:%S").to_string()
                }),
        ),
        Data::Error(_) | Data::Empty => None,
    }
}

fn build_series(name: &str, cells: &[&Data]) -> Series {
    let numeric = cells
        .iter()
        .all(|cell| is_blank(cell) || cell_number(cell).is_some());

    if numeric {
        let values: Vec<Option<f64>> = cells.iter().map(|cell| cell_number(cell)).collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells.iter().map(|cell| cell_text(cell)).collect();
        Series::new(name.into(), values)
    }
}
