//! Pure KPI functions over the joined snapshot.
//!
//! Every function is independently callable and read-only. Absent optional
//! columns are skipped through the snapshot's [`Capabilities`] rather than
//! raising, and every ratio is `0` when its denominator is zero.
//!
//! [`Capabilities`]: sales_kpi_data::Capabilities

use crate::grouping::{as_f64, average, count_by_sorted, percent, rank_desc, sum_by, sum_by_sorted};
use crate::kpi::{
    AllKpis, CustomerKpis, FinancialKpis, HeadlineKpis, InsightKpis, LossAnalysis, PaymentKpis,
    ProductKpis, ProductRegionKpis, ProductRevenue, RegionKpis, RegionRevenue, TimeKpis,
    VolumeKpis,
};
use indexmap::IndexMap;
use sales_kpi_data::schema::{STAGE_LOST, STAGE_WON};
use sales_kpi_data::{SalesView, Snapshot};
use std::collections::HashSet;

/// Number of accounts listed under `top_customers`.
pub const TOP_CUSTOMER_LIMIT: usize = 10;

fn stage_count(view: &SalesView, stage: &str) -> usize {
    view.stages.iter().filter(|s| *s == stage).count()
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Order value of rows in `stage`.
fn stage_order_value(view: &SalesView, stage: &str) -> f64 {
    view.stages
        .iter()
        .zip(&view.order_value)
        .filter(|(s, _)| *s == stage)
        .map(|(_, value)| value)
        .sum()
}

// =============================================================================
// Volume
// =============================================================================

#[must_use]
pub fn volume_kpis(snapshot: &Snapshot) -> VolumeKpis {
    let view = snapshot.view();
    let total = view.len();
    let won = stage_count(view, STAGE_WON);
    let lost = stage_count(view, STAGE_LOST);

    let unique_customers = snapshot
        .capabilities()
        .has_account_name
        .then(|| {
            view.accounts
                .iter()
                .filter(|account| !account.is_empty())
                .collect::<HashSet<_>>()
                .len()
        });

    VolumeKpis {
        total_opportunities: total,
        total_won: won,
        total_lost: lost,
        win_rate: percent(as_f64(won), as_f64(won + lost)),
        lost_rate: percent(as_f64(lost), as_f64(total)),
        open_opportunities: total - won - lost,
        unique_customers,
    }
}

// =============================================================================
// Financials
// =============================================================================

#[must_use]
pub fn financial_kpis(snapshot: &Snapshot) -> FinancialKpis {
    let view = snapshot.view();
    let total_order_value = sum(&view.order_value);
    let won_order_value = sum(&view.won_amount);
    let lost_order_value = stage_order_value(view, STAGE_LOST);
    let expected_revenue = sum(&view.expected_revenue);

    FinancialKpis {
        total_order_value,
        won_order_value,
        lost_order_value,
        avg_deal_size: average(total_order_value, view.len()),
        avg_won_deal_size: average(won_order_value, stage_count(view, STAGE_WON)),
        expected_revenue,
        expected_vs_actual: won_order_value - expected_revenue,
        revenue_realization_rate: percent(won_order_value, expected_revenue),
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Top accounts by order value. Ties keep the order in which the account
/// first appears in the joined table.
#[must_use]
pub fn customer_kpis(snapshot: &Snapshot) -> CustomerKpis {
    if !snapshot.capabilities().has_account_name {
        return CustomerKpis::default();
    }

    let view = snapshot.view();
    let total_order_value = sum(&view.order_value);
    // Blank account names are not customers; their value still counts in the total.
    let (accounts, values): (Vec<String>, Vec<f64>) = view
        .accounts
        .iter()
        .zip(&view.order_value)
        .filter(|(account, _)| !account.is_empty())
        .map(|(account, value)| (account.clone(), *value))
        .unzip();
    let top = rank_desc(sum_by(&accounts, &values), TOP_CUSTOMER_LIMIT);

    let share = if total_order_value == 0.0 {
        IndexMap::new()
    } else {
        top.iter()
            .map(|(account, value)| (account.clone(), percent(*value, total_order_value)))
            .collect()
    };

    CustomerKpis {
        top_customers: Some(top),
        customer_revenue_share: Some(share),
    }
}

// =============================================================================
// Products & regions
// =============================================================================

#[must_use]
pub fn product_region_kpis(snapshot: &Snapshot) -> ProductRegionKpis {
    let view = snapshot.view();
    let caps = snapshot.capabilities();

    let product = if caps.has_product {
        ProductKpis {
            product_revenue_share: Some(sum_by_sorted(&view.products, &view.order_value)),
            product_wise_orders: Some(count_by_sorted(&view.products)),
        }
    } else {
        ProductKpis::default()
    };

    let region = if caps.has_region {
        RegionKpis {
            region_revenue_share: Some(sum_by_sorted(&view.regions, &view.order_value)),
        }
    } else {
        RegionKpis::default()
    };

    ProductRegionKpis { product, region }
}

/// Order value per billing region; empty when the region column is absent.
#[must_use]
pub fn sales_by_region(snapshot: &Snapshot) -> Vec<RegionRevenue> {
    if !snapshot.capabilities().has_region {
        return Vec::new();
    }
    let view = snapshot.view();
    sum_by_sorted(&view.regions, &view.order_value)
        .into_iter()
        .map(|(region, revenue)| RegionRevenue { region, revenue })
        .collect()
}

/// Order value per product type; empty when the product column is absent.
#[must_use]
pub fn sales_by_product(snapshot: &Snapshot) -> Vec<ProductRevenue> {
    if !snapshot.capabilities().has_product {
        return Vec::new();
    }
    let view = snapshot.view();
    sum_by_sorted(&view.products, &view.order_value)
        .into_iter()
        .map(|(product, revenue)| ProductRevenue { product, revenue })
        .collect()
}

// =============================================================================
// Losses & payments
// =============================================================================

#[must_use]
pub fn loss_analysis(snapshot: &Snapshot) -> LossAnalysis {
    let view = snapshot.view();
    let lost_value = stage_order_value(view, STAGE_LOST);
    let total_order_value = sum(&view.order_value);

    let top_loss_reasons = if snapshot.capabilities().has_loss_reason {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for (stage, reason) in view.stages.iter().zip(&view.loss_reasons) {
            if stage == STAGE_LOST {
                *counts.entry(reason.clone()).or_insert(0) += 1;
            }
        }
        let limit = counts.len();
        rank_desc(counts, limit)
    } else {
        IndexMap::new()
    };

    LossAnalysis {
        lost_value,
        loss_value_percent: percent(lost_value, total_order_value),
        top_loss_reasons,
    }
}

#[must_use]
pub fn payment_kpis(snapshot: &Snapshot) -> PaymentKpis {
    let total_advance_received = if snapshot.capabilities().has_advance_received {
        sum(&snapshot.view().advance_received)
    } else {
        0.0
    };
    PaymentKpis {
        total_advance_received,
    }
}

// =============================================================================
// Composite documents
// =============================================================================

#[must_use]
pub fn headline_kpis(snapshot: &Snapshot) -> HeadlineKpis {
    let volume = volume_kpis(snapshot);
    HeadlineKpis {
        total_revenue: sum(&snapshot.view().order_value),
        won: volume.total_won,
        lost: volume.total_lost,
        win_rate: volume.win_rate,
    }
}

#[must_use]
pub fn all_kpis(snapshot: &Snapshot) -> AllKpis {
    AllKpis {
        volume: volume_kpis(snapshot),
        financials: financial_kpis(snapshot),
        time: TimeKpis::default(),
        customer: customer_kpis(snapshot),
        product_region: product_region_kpis(snapshot),
        loss_analysis: loss_analysis(snapshot),
        payment: payment_kpis(snapshot),
    }
}

#[must_use]
pub fn insight_kpis(snapshot: &Snapshot) -> InsightKpis {
    let view = snapshot.view();
    let caps = snapshot.capabilities();
    InsightKpis {
        volume: volume_kpis(snapshot),
        financials: financial_kpis(snapshot),
        region_summary: caps
            .has_region
            .then(|| sum_by_sorted(&view.regions, &view.order_value)),
        product_summary: caps
            .has_product
            .then(|| sum_by_sorted(&view.products, &view.order_value)),
    }
}
