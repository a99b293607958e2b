//! Balance engine: pure functions from postings to balances, trial
//! balances and ledger views.
//!
//! Nothing here caches; every call recomputes from the full journal state
//! under the chart's sign convention.

pub mod balance;
pub mod ledger;
pub mod trial;

pub use balance::{account_balances, apply_postings, merge_adjustments};
pub use ledger::{ledger, LedgerLine};
pub use trial::{trial_balance, TrialBalance, TrialBalanceRow};
