//! Trial balance: every account's balance split into debit/credit columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tallybook_chart::{ChartOfAccounts, Side};
use tallybook_core::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account: String,
    pub debit: i64,
    pub credit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: i64,
    pub total_credit: i64,
    pub balanced: bool,
    /// `total_debit − total_credit`; zero when balanced. Never silently
    /// corrected.
    pub discrepancy: i64,
}

impl TrialBalance {
    pub fn ensure_balanced(&self) -> DomainResult<()> {
        if self.balanced {
            Ok(())
        } else {
            Err(DomainError::consistency("trial balance", self.discrepancy))
        }
    }
}

/// Split signed balances into columns: a positive balance sits on the
/// account's normal side, a negative balance flips to the other column as
/// an absolute value.
pub fn trial_balance(
    chart: &ChartOfAccounts,
    balances: &BTreeMap<String, i64>,
) -> TrialBalance {
    let mut rows = Vec::with_capacity(balances.len());
    let mut total_debit: i128 = 0;
    let mut total_credit: i128 = 0;

    for (account, balance) in balances {
        let column = if *balance >= 0 {
            chart.normal_side(account)
        } else {
            chart.normal_side(account).opposite()
        };
        let magnitude = balance.unsigned_abs() as i64;

        let row = match column {
            Side::Debit => {
                total_debit += magnitude as i128;
                TrialBalanceRow {
                    account: account.clone(),
                    debit: magnitude,
                    credit: 0,
                }
            }
            Side::Credit => {
                total_credit += magnitude as i128;
                TrialBalanceRow {
                    account: account.clone(),
                    debit: 0,
                    credit: magnitude,
                }
            }
        };
        rows.push(row);
    }

    let discrepancy = (total_debit - total_credit) as i64;
    TrialBalance {
        rows,
        total_debit: total_debit as i64,
        total_credit: total_credit as i64,
        balanced: discrepancy == 0,
        discrepancy,
    }
}
