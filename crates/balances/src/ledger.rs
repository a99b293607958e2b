//! Per-account ledger view with running balances.

use serde::{Deserialize, Serialize};

use tallybook_chart::{ChartOfAccounts, Side};
use tallybook_core::{DomainError, DomainResult};
use tallybook_journal::Posting;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub posting: Posting,
    /// Signed balance after this posting, under the account's normal side.
    pub balance: i64,
}

/// Postings touching one account, in journal order, with a running balance.
pub fn ledger(
    chart: &ChartOfAccounts,
    postings: &[Posting],
    account: &str,
) -> DomainResult<Vec<LedgerLine>> {
    let normal_side = chart.normal_side(account);
    let mut running: i64 = 0;
    let mut lines = Vec::new();

    for posting in postings.iter().filter(|p| p.account == account) {
        running += match normal_side {
            Side::Debit => posting.debit - posting.credit,
            Side::Credit => posting.credit - posting.debit,
        };
        lines.push(LedgerLine {
            posting: posting.clone(),
            balance: running,
        });
    }

    if lines.is_empty() {
        return Err(DomainError::not_found(account));
    }
    Ok(lines)
}
