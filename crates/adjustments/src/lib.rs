//! Period-end adjusting entries.
//!
//! Scenario calculators (depreciation, supplies consumption, prepaid
//! amortization, deferred-revenue recognition) plus the adjustment
//! collection they append to. Pure domain logic, no IO.

pub mod adjustment;
pub mod scenarios;

pub use adjustment::{Adjustment, AdjustmentLog, AdjustmentRecord, Scenario};
pub use scenarios::{
    asset_profile, deferred_revenue, depreciation, prepaid_amortization, supplies_consumption,
    supplies_purchases, AssetProfile,
};
