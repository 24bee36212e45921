//! Column vocabulary of the two CRM extracts and the capability record
//! derived from the joined table.

use polars::prelude::DataFrame;
use serde::Serialize;

pub const OPPORTUNITY_ID: &str = "Opportunity_ID__c";
pub const RECORD_TYPE: &str = "Record_type__c";
pub const STAGE: &str = "StageName";
pub const PRODUCT_TYPE: &str = "Product_Type__c";
pub const ORDER_VALUE: &str = "AmountINR__c";
pub const WON_AMOUNT: &str = "Won_Amount__c";
pub const EXPECTED_REVENUE: &str = "ExpectedRevenue";
pub const ACCOUNT_NAME: &str = "Account_Name__c";
pub const BILLING_REGION: &str = "Billing_State__c";
pub const LOSS_REASON: &str = "Reason_for_Loss__c";

/// Foreign key on the loss/won table pointing at [`OPPORTUNITY_ID`].
pub const LOSS_WON_OPPORTUNITY: &str = "Opportunity__c";
pub const ADVANCE_RECEIVED: &str = "Advance_Received__c";
pub const ADVANCE_RECEIVED_DATE: &str = "Advance_received_Date__c";

/// Identifier columns the join matches on. The cleaner leaves their nulls
/// in place so a blank key can never collide with a real one.
pub const KEY_COLUMNS: [&str; 2] = [OPPORTUNITY_ID, LOSS_WON_OPPORTUNITY];

/// Temporary normalized-key column used during the join and dropped after it.
pub const JOIN_KEY: &str = "__join_key";

/// Payment columns carried over from the loss/won table by the join.
pub const PAYMENT_COLUMNS: [&str; 2] = [ADVANCE_RECEIVED, ADVANCE_RECEIVED_DATE];

pub const STAGE_WON: &str = "ORDER WON";
pub const STAGE_LOST: &str = "ORDER LOST";

pub const ALLOWED_RECORD_TYPES: [&str; 2] = ["SALES PROCESS", "SALES CLOSED/LOST/DROPPED"];
pub const ALLOWED_STAGES: [&str; 2] = [STAGE_WON, STAGE_LOST];
pub const ALLOWED_PRODUCTS: [&str; 2] = ["API", "IPG"];

/// Opportunity columns upper-cased by the cleaner so the filter matches
/// case-insensitively.
pub const CATEGORICAL_COLUMNS: [&str; 3] = [RECORD_TYPE, STAGE, PRODUCT_TYPE];

/// Which optional columns the joined table carries.
///
/// Detected once when the snapshot is built; the aggregator skips a KPI
/// family instead of failing when its column is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub has_account_name: bool,
    pub has_region: bool,
    pub has_product: bool,
    pub has_loss_reason: bool,
    pub has_advance_received: bool,
    pub has_order_value: bool,
    pub has_won_amount: bool,
    pub has_expected_revenue: bool,
}

impl Capabilities {
    #[must_use]
    pub fn detect(frame: &DataFrame) -> Self {
        let has = |name: &str| has_column(frame, name);
        Self {
            has_account_name: has(ACCOUNT_NAME),
            has_region: has(BILLING_REGION),
            has_product: has(PRODUCT_TYPE),
            has_loss_reason: has(LOSS_REASON),
            has_advance_received: has(ADVANCE_RECEIVED),
            has_order_value: has(ORDER_VALUE),
            has_won_amount: has(WON_AMOUNT),
            has_expected_revenue: has(EXPECTED_REVENUE),
        }
    }
}

#[must_use]
pub fn has_column(frame: &DataFrame, name: &str) -> bool {
    frame.column(name).is_ok()
}
