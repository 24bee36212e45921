#![allow(clippy::format_push_string)]

use crate::kpi::AllKpis;

const RULE_HEAVY: &str = "═══════════════════════════════════════════════════════════════\n";
const RULE_LIGHT: &str = "───────────────────────────────────────────────────────────────\n";

pub struct KpiReportFormatter;

impl KpiReportFormatter {
    /// Renders the full KPI document as a plain-text report.
    #[must_use]
    pub fn format(kpis: &AllKpis) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE_HEAVY);
        output.push_str("                    SALES KPI REPORT                           \n");
        output.push_str(RULE_HEAVY);
        output.push('\n');

        // Volume
        let volume = &kpis.volume;
        section(&mut output, "Volume");
        output.push_str(&format!("Opportunities:         {}\n", volume.total_opportunities));
        output.push_str(&format!("Won:                   {}\n", volume.total_won));
        output.push_str(&format!("Lost:                  {}\n", volume.total_lost));
        output.push_str(&format!("Open:                  {}\n", volume.open_opportunities));
        output.push_str(&format!("Win Rate:              {:.2}%\n", volume.win_rate));
        output.push_str(&format!("Lost Rate:             {:.2}%\n", volume.lost_rate));
        if let Some(customers) = volume.unique_customers {
            output.push_str(&format!("Unique Customers:      {customers}\n"));
        }
        output.push('\n');

        // Financials
        let financials = &kpis.financials;
        section(&mut output, "Financials");
        output.push_str(&format!("Total Order Value:     {:.2}\n", financials.total_order_value));
        output.push_str(&format!("Won Order Value:       {:.2}\n", financials.won_order_value));
        output.push_str(&format!("Lost Order Value:      {:.2}\n", financials.lost_order_value));
        output.push_str(&format!("Avg Deal Size:         {:.2}\n", financials.avg_deal_size));
        output.push_str(&format!("Avg Won Deal Size:     {:.2}\n", financials.avg_won_deal_size));
        output.push_str(&format!("Expected Revenue:      {:.2}\n", financials.expected_revenue));
        output.push_str(&format!("Expected vs Actual:    {:.2}\n", financials.expected_vs_actual));
        output.push_str(&format!(
            "Realization Rate:      {:.2}%\n",
            financials.revenue_realization_rate
        ));
        output.push_str(&format!(
            "Advance Received:      {:.2}\n",
            kpis.payment.total_advance_received
        ));
        output.push('\n');

        // Customers
        if let Some(top) = &kpis.customer.top_customers {
            section(&mut output, "Top Customers");
            if top.is_empty() {
                output.push_str("N/A (no customers)\n");
            }
            let share = kpis.customer.customer_revenue_share.as_ref();
            for (account, value) in top {
                match share.and_then(|s| s.get(account)) {
                    Some(pct) => output.push_str(&format!("{:<22} {:>14.2}  ({:.2}%)\n", label(account), value, pct)),
                    None => output.push_str(&format!("{:<22} {:>14.2}\n", label(account), value)),
                }
            }
            output.push('\n');
        }

        // Products & regions
        if let Some(products) = &kpis.product_region.product.product_revenue_share {
            section(&mut output, "Revenue by Product");
            let orders = kpis.product_region.product.product_wise_orders.as_ref();
            for (product, revenue) in products {
                let count = orders.and_then(|o| o.get(product)).copied().unwrap_or(0);
                output.push_str(&format!("{:<22} {:>14.2}  {} orders\n", label(product), revenue, count));
            }
            output.push('\n');
        }

        if let Some(regions) = &kpis.product_region.region.region_revenue_share {
            section(&mut output, "Revenue by Region");
            for (region, revenue) in regions {
                output.push_str(&format!("{:<22} {:>14.2}\n", label(region), revenue));
            }
            output.push('\n');
        }

        // Losses
        let loss = &kpis.loss_analysis;
        section(&mut output, "Loss Analysis");
        output.push_str(&format!("Lost Value:            {:.2}\n", loss.lost_value));
        output.push_str(&format!("Lost Value Share:      {:.2}%\n", loss.loss_value_percent));
        for (reason, count) in &loss.top_loss_reasons {
            output.push_str(&format!("  {:<20} {count}\n", label(reason)));
        }

        output.push('\n');
        output.push_str(RULE_HEAVY);

        if volume.total_opportunities == 0 {
            output.push_str("\n⚠️  No won or lost sales opportunities matched the filters.\n");
            output.push_str("    Check the extracts in the configured data directory.\n\n");
        }

        output
    }
}

fn section(output: &mut String, title: &str) {
    output.push_str(title);
    output.push('\n');
    output.push_str(RULE_LIGHT);
}

fn label(key: &str) -> &str {
    if key.is_empty() {
        "(blank)"
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::{CustomerKpis, VolumeKpis};
    use indexmap::IndexMap;

    #[test]
    fn test_report_lists_sections() {
        let mut top = IndexMap::new();
        top.insert("Acme".to_string(), 100.0);
        top.insert(String::new(), 20.0);
        let kpis = AllKpis {
            volume: VolumeKpis {
                total_opportunities: 3,
                total_won: 1,
                total_lost: 2,
                win_rate: 33.33,
                lost_rate: 66.67,
                open_opportunities: 0,
                unique_customers: Some(2),
            },
            customer: CustomerKpis {
                top_customers: Some(top),
                customer_revenue_share: Some(IndexMap::new()),
            },
            ..AllKpis::default()
        };

        let report = KpiReportFormatter::format(&kpis);
        assert!(report.contains("SALES KPI REPORT"));
        assert!(report.contains("Win Rate:              33.33%"));
        assert!(report.contains("Unique Customers:      2"));
        assert!(report.contains("Top Customers"));
        assert!(report.contains("(blank)"));
        assert!(!report.contains("Revenue by Region"));
        assert!(!report.contains("No won or lost"));
    }

    #[test]
    fn test_empty_report_warns() {
        let report = KpiReportFormatter::format(&AllKpis::default());
        assert!(report.contains("No won or lost sales opportunities"));
        assert!(!report.contains("Top Customers"));
    }
}
