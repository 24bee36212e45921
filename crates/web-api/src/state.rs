use sales_kpi_data::Snapshot;
use sales_kpi_insights::Summarizer;
use std::sync::Arc;

/// Read-only state shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub snapshot: Arc<Snapshot>,
    pub summarizer: Summarizer,
}

impl AppState {
    #[must_use]
    pub fn new(snapshot: Snapshot, summarizer: Summarizer) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            summarizer,
        }
    }
}
