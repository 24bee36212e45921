//! KPI aggregation for the sales snapshot.
//!
//! Every KPI family is a pure function over a [`Snapshot`]; handlers and the
//! CLI call the ones they need and serialize the returned documents.
//!
//! [`Snapshot`]: sales_kpi_data::Snapshot

pub mod aggregator;
pub mod grouping;
pub mod kpi;
pub mod report;

pub use aggregator::{
    all_kpis, customer_kpis, financial_kpis, headline_kpis, insight_kpis, loss_analysis,
    payment_kpis, product_region_kpis, sales_by_product, sales_by_region, volume_kpis,
    TOP_CUSTOMER_LIMIT,
};
pub use kpi::{
    AllKpis, CustomerKpis, FinancialKpis, HeadlineKpis, InsightKpis, LossAnalysis, PaymentKpis,
    ProductKpis, ProductRegionKpis, ProductRevenue, RegionKpis, RegionRevenue, TimeKpis,
    VolumeKpis,
};
pub use report::KpiReportFormatter;
