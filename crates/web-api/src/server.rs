use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handlers::status))
            .route("/api/data", get(handlers::raw_data))
            .route("/kpi", get(handlers::kpi))
            .route("/sales-by-region", get(handlers::region_sales))
            .route("/sales-by-product", get(handlers::product_sales))
            .route("/ai-insights", get(handlers::ai_insights))
            .route("/kpi-all", get(handlers::kpi_all))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(rows = self.state.snapshot.len(), "Web API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use polars::df;
    use sales_kpi_data::Snapshot;
    use sales_kpi_insights::{InsightGenerator, SummarizationError, Summarizer};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FixedGenerator(Option<&'static str>);

    #[async_trait]
    impl InsightGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> sales_kpi_insights::Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| SummarizationError::Timeout("deadline elapsed".to_string()))
        }
    }

    fn server_with(snapshot: Snapshot, reply: Option<&'static str>) -> ApiServer {
        let summarizer = Summarizer::new(Arc::new(FixedGenerator(reply)));
        ApiServer::new(AppState::new(snapshot, summarizer))
    }

    fn sample_snapshot() -> Snapshot {
        Snapshot::from_joined(
            df!(
                "Opportunity_ID__c" => ["OPP-1", "OPP-2", "OPP-3"],
                "StageName" => ["ORDER WON", "ORDER LOST", "ORDER LOST"],
                "Product_Type__c" => ["API", "IPG", "API"],
                "AmountINR__c" => [100.0, 50.0, 0.0],
                "Account_Name__c" => ["Acme", "Globex", "Acme"]
            )
            .unwrap(),
        )
        .unwrap()
    }

    fn empty_snapshot() -> Snapshot {
        Snapshot::from_joined(
            df!(
                "StageName" => Vec::<String>::new(),
                "AmountINR__c" => Vec::<f64>::new(),
                "Billing_State__c" => Vec::<String>::new()
            )
            .unwrap(),
        )
        .unwrap()
    }

    async fn get_json(server: &ApiServer, uri: &str) -> (StatusCode, Value) {
        let response = server
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_status_route() {
        let server = server_with(sample_snapshot(), None);
        let (status, body) = get_json(&server, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "Backend running successfully"}));
    }

    #[tokio::test]
    async fn test_raw_data_route() {
        let server = server_with(sample_snapshot(), None);
        let (status, body) = get_json(&server, "/api/data").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["Opportunity_ID__c"], json!("OPP-1"));
        assert_eq!(rows[1]["AmountINR__c"], json!(50.0));
    }

    #[tokio::test]
    async fn test_kpi_route() {
        let server = server_with(sample_snapshot(), None);
        let (_, body) = get_json(&server, "/kpi").await;
        assert_eq!(
            body,
            json!({"total_revenue": 150.0, "won": 1, "lost": 2, "win_rate": 33.33})
        );
    }

    #[tokio::test]
    async fn test_sales_by_region_without_column() {
        let server = server_with(sample_snapshot(), None);
        let (status, body) = get_json(&server, "/sales-by-region").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_sales_by_product_route() {
        let server = server_with(sample_snapshot(), None);
        let (_, body) = get_json(&server, "/sales-by-product").await;
        assert_eq!(
            body,
            json!([
                {"product": "API", "revenue": 100.0},
                {"product": "IPG", "revenue": 50.0}
            ])
        );
    }

    #[tokio::test]
    async fn test_kpi_all_route() {
        let server = server_with(sample_snapshot(), None);
        let (_, body) = get_json(&server, "/kpi-all").await;
        assert_eq!(body["volume"]["total_won"], json!(1));
        assert_eq!(body["volume"]["unique_customers"], json!(2));
        assert_eq!(body["time"], json!({}));
        assert_eq!(body["customer"]["top_customers"], json!({"Acme": 100.0, "Globex": 50.0}));
        assert_eq!(body["product_region"]["region"], json!({}));
        assert_eq!(body["loss_analysis"]["lost_value"], json!(50.0));
        assert_eq!(body["payment"]["total_advance_received"], json!(0.0));
    }

    #[tokio::test]
    async fn test_ai_insights_success() {
        let server = server_with(sample_snapshot(), Some("- Acme drives two thirds of revenue"));
        let (status, body) = get_json(&server, "/ai-insights").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["insights"], json!("- Acme drives two thirds of revenue"));
        assert_eq!(body["kpis"]["volume"]["total_lost"], json!(2));
        assert!(body.get("error").is_none());
        assert!(body["kpis"].get("region_summary").is_none());
        assert_eq!(body["kpis"]["product_summary"]["API"], json!(100.0));
    }

    #[tokio::test]
    async fn test_ai_insights_degraded() {
        let server = server_with(sample_snapshot(), None);
        let (status, body) = get_json(&server, "/ai-insights").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].as_str().unwrap().contains("timeout"));
        assert!(body.get("insights").is_none());
        assert_eq!(body["kpis"]["volume"]["total_won"], json!(1));
    }

    #[tokio::test]
    async fn test_empty_snapshot_routes() {
        let server = server_with(empty_snapshot(), None);

        let (_, body) = get_json(&server, "/kpi").await;
        assert_eq!(body, json!({"total_revenue": 0.0, "won": 0, "lost": 0, "win_rate": 0.0}));

        let (_, body) = get_json(&server, "/sales-by-region").await;
        assert_eq!(body, json!([]));

        let (_, body) = get_json(&server, "/api/data").await;
        assert_eq!(body, json!([]));

        let (_, body) = get_json(&server, "/kpi-all").await;
        assert_eq!(body["volume"]["total_opportunities"], json!(0));
        assert_eq!(body["financials"]["avg_deal_size"], json!(0.0));
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let server = server_with(sample_snapshot(), None);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/kpi")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let server = server_with(sample_snapshot(), None);
        let response = server
            .router()
            .oneshot(Request::builder().uri("/kpi-advanced").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
