//! KPI documents returned by the aggregator and served as JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeKpis {
    pub total_opportunities: usize,
    pub total_won: usize,
    pub total_lost: usize,
    pub win_rate: f64,
    pub lost_rate: f64,
    pub open_opportunities: usize,
    /// `None` when the account column is absent.
    pub unique_customers: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialKpis {
    pub total_order_value: f64,
    pub won_order_value: f64,
    pub lost_order_value: f64,
    pub avg_deal_size: f64,
    pub avg_won_deal_size: f64,
    pub expected_revenue: f64,
    pub expected_vs_actual: f64,
    pub revenue_realization_rate: f64,
}

/// Reserved; always serialized as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeKpis {}

/// Serialized as `{}` when the account column is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerKpis {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub top_customers: Option<IndexMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub customer_revenue_share: Option<IndexMap<String, f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductKpis {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub product_revenue_share: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub product_wise_orders: Option<BTreeMap<String, usize>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionKpis {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub region_revenue_share: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRegionKpis {
    pub product: ProductKpis,
    pub region: RegionKpis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LossAnalysis {
    pub lost_value: f64,
    pub loss_value_percent: f64,
    /// Lost-row count per loss reason, most frequent first.
    pub top_loss_reasons: IndexMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentKpis {
    pub total_advance_received: f64,
}

/// The full `/kpi-all` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllKpis {
    pub volume: VolumeKpis,
    pub financials: FinancialKpis,
    pub time: TimeKpis,
    pub customer: CustomerKpis,
    pub product_region: ProductRegionKpis,
    pub loss_analysis: LossAnalysis,
    pub payment: PaymentKpis,
}

/// The `/kpi` summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadlineKpis {
    pub total_revenue: f64,
    pub won: usize,
    pub lost: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRevenue {
    pub region: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product: String,
    pub revenue: f64,
}

/// The KPI subset handed to the insight summarizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightKpis {
    pub volume: VolumeKpis,
    pub financials: FinancialKpis,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub region_summary: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub product_summary: Option<BTreeMap<String, f64>>,
}
