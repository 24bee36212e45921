use crate::error::Result;
use crate::prompt::build_prompt;
use async_trait::async_trait;
use sales_kpi_analytics::InsightKpis;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Turns a prompt into narrative text.
///
/// [`OpenAiClient`](crate::OpenAiClient) is the production implementation;
/// tests substitute a stub.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// The `/ai-insights` document.
///
/// Exactly one of `insights` and `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub kpis: InsightKpis,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub insights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl InsightReport {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn InsightGenerator>,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer").finish_non_exhaustive()
    }
}

impl Summarizer {
    #[must_use]
    pub fn new(generator: Arc<dyn InsightGenerator>) -> Self {
        Self { generator }
    }

    /// Asks the generator for insights on `kpis`.
    ///
    /// Never fails: a generation error is logged and reported in the
    /// document's `error` field alongside the KPIs.
    pub async fn summarize(&self, kpis: &InsightKpis) -> InsightReport {
        let outcome = match build_prompt(kpis) {
            Ok(prompt) => self.generator.generate(&prompt).await.map_err(|e| e.to_string()),
            Err(e) => Err(format!("failed to build prompt: {e}")),
        };

        match outcome {
            Ok(insights) => {
                tracing::info!(chars = insights.len(), "Insights generated");
                InsightReport {
                    kpis: kpis.clone(),
                    insights: Some(insights),
                    error: None,
                }
            }
            Err(error) => {
                tracing::warn!(%error, "Insight generation failed, returning KPIs only");
                InsightReport {
                    kpis: kpis.clone(),
                    insights: None,
                    error: Some(error),
                }
            }
        }
    }
}
