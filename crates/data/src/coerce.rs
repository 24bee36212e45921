//! Column extraction with the numeric coercion rule the KPIs depend on:
//! anything that is not a finite number (nulls, `"N/A"`, blanks, absent
//! columns) counts as `0`.

use crate::error::Result;
use polars::prelude::*;

/// Parses trimmed text as a number, falling back to `0`.
#[must_use]
pub fn coerce_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Text form of a spreadsheet number. Integral values print without a
/// fraction, so `1001.0` reads as `"1001"`.
#[must_use]
pub fn number_text(value: f64) -> String {
    value.to_string()
}

/// Values of `name` as numbers, one per row. An absent column yields zeros.
///
/// # Errors
/// Returns an error if a numeric column cannot be cast to `Float64`.
pub fn numeric_values(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let Ok(series) = frame.column(name) else {
        return Ok(vec![0.0; frame.height()]);
    };

    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|value| value.map_or(0.0, coerce_number))
            .collect()),
        dtype if dtype.is_numeric() => {
            let cast = series.cast(&DataType::Float64)?;
            Ok(cast
                .f64()?
                .into_iter()
                .map(|value| value.filter(|v| v.is_finite()).unwrap_or(0.0))
                .collect())
        }
        _ => Ok(vec![0.0; series.len()]),
    }
}

/// Values of `name` as text, one per row; nulls become `""`.
/// An absent column yields empty strings.
///
/// # Errors
/// Returns an error if the column cannot be cast to text.
pub fn text_values(frame: &DataFrame, name: &str) -> Result<Vec<String>> {
    let Ok(series) = frame.column(name) else {
        return Ok(vec![String::new(); frame.height()]);
    };

    let text = series.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect())
}
