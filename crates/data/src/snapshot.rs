//! The immutable, point-in-time view every request reads from.

use crate::cleaner::Cleaner;
use crate::coerce::{numeric_values, text_values};
use crate::error::Result;
use crate::joiner::Joiner;
use crate::loader::{Loader, RawTables};
use crate::schema::{
    Capabilities, ACCOUNT_NAME, ADVANCE_RECEIVED, BILLING_REGION, EXPECTED_REVENUE, LOSS_REASON,
    ORDER_VALUE, PRODUCT_TYPE, STAGE, WON_AMOUNT,
};
use polars::prelude::*;
use sales_kpi_core::DataConfig;
use serde_json::{Map, Number, Value};

/// Typed, row-aligned projection of the joined table used by the KPI functions.
///
/// Monetary columns are already coerced (absent → zeros). Text columns whose
/// capability flag is false hold empty strings and must not be grouped on.
#[derive(Debug, Clone, Default)]
pub struct SalesView {
    pub stages: Vec<String>,
    pub order_value: Vec<f64>,
    pub won_amount: Vec<f64>,
    pub expected_revenue: Vec<f64>,
    pub advance_received: Vec<f64>,
    pub accounts: Vec<String>,
    pub regions: Vec<String>,
    pub products: Vec<String>,
    pub loss_reasons: Vec<String>,
}

impl SalesView {
    /// Extracts the projection from a joined frame.
    ///
    /// # Errors
    /// Returns an error if a column cannot be cast.
    pub fn from_frame(frame: &DataFrame) -> Result<Self> {
        Ok(Self {
            stages: text_values(frame, STAGE)?,
            order_value: numeric_values(frame, ORDER_VALUE)?,
            won_amount: numeric_values(frame, WON_AMOUNT)?,
            expected_revenue: numeric_values(frame, EXPECTED_REVENUE)?,
            advance_received: numeric_values(frame, ADVANCE_RECEIVED)?,
            accounts: text_values(frame, ACCOUNT_NAME)?,
            regions: text_values(frame, BILLING_REGION)?,
            products: text_values(frame, PRODUCT_TYPE)?,
            loss_reasons: text_values(frame, LOSS_REASON)?,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Joined table plus everything derived from it once at startup.
///
/// Never mutated after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    frame: DataFrame,
    capabilities: Capabilities,
    view: SalesView,
    records: Vec<Value>,
}

impl Snapshot {
    /// Loads, cleans and joins the configured extracts.
    ///
    /// # Errors
    /// Returns an error if a file fails to load or a required column is missing.
    pub fn load(config: &DataConfig) -> Result<Self> {
        let RawTables {
            opportunities,
            loss_won,
        } = Loader::load_all(config)?;
        Self::build(&opportunities, &loss_won)
    }

    /// Cleans and joins two raw tables.
    ///
    /// # Errors
    /// Returns an error if a required join or filter column is missing.
    pub fn build(opportunities: &DataFrame, loss_won: &DataFrame) -> Result<Self> {
        tracing::info!("Cleaning extracts");
        let opportunities = Cleaner::clean_opportunities(opportunities)?;
        let loss_won = Cleaner::clean(loss_won)?;

        let joined = Joiner::join_and_filter(&opportunities, &loss_won)?;
        Self::from_joined(joined)
    }

    /// Wraps an already joined table.
    ///
    /// # Errors
    /// Returns an error if the projection or row records cannot be derived.
    pub fn from_joined(frame: DataFrame) -> Result<Self> {
        let capabilities = Capabilities::detect(&frame);
        let view = SalesView::from_frame(&frame)?;
        let records = render_records(&frame)?;

        tracing::info!(rows = frame.height(), ?capabilities, "Snapshot ready");

        Ok(Self {
            frame,
            capabilities,
            view,
            records,
        })
    }

    #[must_use]
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[must_use]
    pub const fn view(&self) -> &SalesView {
        &self.view
    }

    /// Row objects of the joined table, column order preserved.
    #[must_use]
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

fn render_records(frame: &DataFrame) -> Result<Vec<Value>> {
    let names: Vec<String> = frame
        .get_columns()
        .iter()
        .map(|series| series.name().to_string())
        .collect();
    let columns = frame
        .get_columns()
        .iter()
        .map(column_values)
        .collect::<PolarsResult<Vec<_>>>()?;

    let records = (0..frame.height())
        .map(|row| {
            let mut record = Map::with_capacity(names.len());
            for (name, values) in names.iter().zip(&columns) {
                record.insert(name.clone(), values[row].clone());
            }
            Value::Object(record)
        })
        .collect();

    Ok(records)
}

fn column_values(series: &Series) -> PolarsResult<Vec<Value>> {
    let values = match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .map(|value| value.map_or(Value::Null, |v| Value::String(v.to_string())))
            .collect(),
        DataType::Boolean => series
            .bool()?
            .into_iter()
            .map(|value| value.map_or(Value::Null, Value::Bool))
            .collect(),
        dtype if dtype.is_numeric() => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|value| {
                value
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            })
            .collect(),
        _ => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|value| value.map_or(Value::Null, |v| Value::String(v.to_string())))
            .collect(),
    };

    Ok(values)
}
