use sales_kpi_analytics::InsightKpis;

const PREAMBLE: &str = "You are a CXO Dashboard Insight Generator.\n\n\
Based ONLY on the KPIs below, generate CEO-level insights:\n";

const RULES: &str = "Rules:\n\
- Business insights only.\n\
- No definitions.\n\
- No generic lines.\n\
- Give 6–10 sharp bullet points.\n\
- Focus on revenue, sales cycle, region, and customer trends.\n";

/// Builds the single user message sent to the text-generation service.
///
/// # Errors
/// Returns an error if the KPI document cannot be serialized.
pub fn build_prompt(kpis: &InsightKpis) -> serde_json::Result<String> {
    let body = serde_json::to_string_pretty(kpis)?;
    Ok(format!("{PREAMBLE}{body}\n\n{RULES}"))
}
