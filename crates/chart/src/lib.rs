//! Chart of accounts (single classification authority).
//!
//! Maps account names to categories and normal balance sides. This is the
//! only place classification logic lives; every other crate consults it.

pub mod chart;

pub use chart::{
    names, AssetClass, Category, ChartOfAccounts, ChartRecord, Classification, Side,
};
