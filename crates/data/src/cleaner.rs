use crate::error::Result;
use crate::schema::{CATEGORICAL_COLUMNS, KEY_COLUMNS};
use polars::prelude::*;

/// Whitespace, null and case normalization for the raw extracts.
///
/// Every operation returns a new frame and leaves its input untouched.
/// Applying the cleaner twice yields the same frame as applying it once.
pub struct Cleaner;

impl Cleaner {
    /// Trims text columns (null → `""`) and zero-fills numeric columns (null → `0`).
    /// Numeric key columns keep their nulls; columns of any other type pass
    /// through unchanged.
    ///
    /// # Errors
    /// Returns an error if a column cannot be rebuilt.
    pub fn clean(frame: &DataFrame) -> Result<DataFrame> {
        let columns = frame
            .get_columns()
            .iter()
            .map(clean_series)
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(DataFrame::new(columns)?)
    }

    /// Cleans the opportunity table and upper-cases its categorical columns
    /// (record type, stage, product type).
    ///
    /// # Errors
    /// Returns an error if a column cannot be rebuilt.
    pub fn clean_opportunities(frame: &DataFrame) -> Result<DataFrame> {
        let cleaned = Self::clean(frame)?;
        Self::normalize_categories(&cleaned, &CATEGORICAL_COLUMNS)
    }

    /// Casts the named columns to text, trims and upper-cases them.
    /// Names absent from the frame are skipped.
    ///
    /// # Errors
    /// Returns an error if a column cannot be cast to text.
    pub fn normalize_categories(frame: &DataFrame, names: &[&str]) -> Result<DataFrame> {
        let columns = frame
            .get_columns()
            .iter()
            .map(|series| {
                if names.contains(&series.name().as_str()) {
                    upper_series(series)
                } else {
                    Ok(series.clone())
                }
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(DataFrame::new(columns)?)
    }
}

fn clean_series(series: &Series) -> PolarsResult<Series> {
    match series.dtype() {
        DataType::String => {
            let cleaned: StringChunked = series
                .str()?
                .into_iter()
                .map(|value| Some(value.map_or("", str::trim).to_string()))
                .collect();
            Ok(cleaned.with_name(series.name().clone()).into_series())
        }
        dtype if dtype.is_numeric() && !KEY_COLUMNS.contains(&series.name().as_str()) => {
            series.fill_null(FillNullStrategy::Zero)
        }
        _ => Ok(series.clone()),
    }
}

fn upper_series(series: &Series) -> PolarsResult<Series> {
    let text = series.cast(&DataType::String)?;
    let upper: StringChunked = text
        .str()?
        .into_iter()
        .map(|value| Some(value.map_or_else(String::new, |v| v.trim().to_uppercase())))
        .collect();
    Ok(upper.with_name(series.name().clone()).into_series())
}
