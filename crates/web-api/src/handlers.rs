use crate::state::AppState;
use axum::{extract::State, Json};
use sales_kpi_analytics::{
    all_kpis, headline_kpis, insight_kpis, sales_by_product, sales_by_region, AllKpis,
    HeadlineKpis, ProductRevenue, RegionRevenue,
};
use sales_kpi_insights::InsightReport;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const STATUS_MESSAGE: &str = "Backend running successfully";

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Liveness check.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: STATUS_MESSAGE,
    })
}

/// Every row of the joined table as an object keyed by column name.
pub async fn raw_data(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    Json(state.snapshot.records().to_vec())
}

pub async fn kpi(State(state): State<Arc<AppState>>) -> Json<HeadlineKpis> {
    Json(headline_kpis(&state.snapshot))
}

pub async fn region_sales(State(state): State<Arc<AppState>>) -> Json<Vec<RegionRevenue>> {
    Json(sales_by_region(&state.snapshot))
}

pub async fn product_sales(State(state): State<Arc<AppState>>) -> Json<Vec<ProductRevenue>> {
    Json(sales_by_product(&state.snapshot))
}

/// KPI subset plus generated insights. Generation failures still answer
/// `200` with an `error` field in place of `insights`.
pub async fn ai_insights(State(state): State<Arc<AppState>>) -> Json<InsightReport> {
    let kpis = insight_kpis(&state.snapshot);
    Json(state.summarizer.summarize(&kpis).await)
}

pub async fn kpi_all(State(state): State<Arc<AppState>>) -> Json<AllKpis> {
    Json(all_kpis(&state.snapshot))
}
