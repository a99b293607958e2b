use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tallybook_balances::apply_postings;
use tallybook_chart::{names, Category, ChartOfAccounts, Side};
use tallybook_core::TransactionId;
use tallybook_journal::Posting;

const CLOSING_REFERENCE: &str = "CLOSE";

/// Computed closing entries plus the balances they leave behind.
///
/// Pure output: nothing is posted until the caller explicitly appends
/// `postings` to its closing journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingRun {
    pub postings: Vec<Posting>,
    pub total_revenue: i64,
    pub total_expense: i64,
    pub net_income: i64,
    pub drawings: i64,
    /// Real accounts unchanged; nominal accounts zeroed by construction
    /// (and therefore absent, since zero balances are dropped).
    pub post_closing: BTreeMap<String, i64>,
}

fn posting(
    date: NaiveDate,
    account: &str,
    side: Side,
    amount: i64,
    memo: &str,
    txn_id: TransactionId,
) -> Posting {
    Posting {
        date,
        account: account.to_string(),
        debit: if side == Side::Debit { amount } else { 0 },
        credit: if side == Side::Credit { amount } else { 0 },
        memo: memo.to_string(),
        reference: CLOSING_REFERENCE.to_string(),
        txn_id,
    }
}

/// Emit the leg that zeroes `balance` on a normal-side `normal` account:
/// positive balances are closed from the opposite side, negative balances
/// from the normal side.
fn closing_leg(
    date: NaiveDate,
    account: &str,
    normal: Side,
    balance: i64,
    memo: &str,
    txn_id: TransactionId,
) -> Posting {
    if balance >= 0 {
        posting(date, account, normal.opposite(), balance, memo, txn_id)
    } else {
        posting(date, account, normal, -balance, memo, txn_id)
    }
}

/// Compute closing entries from adjusted balances, partitioning nominal and
/// real accounts through the chart.
///
/// Fixed entry order: close revenues to Income Summary, close expenses from
/// Income Summary, roll net income (or loss) into Owner's Capital, close
/// Drawings against capital.
pub fn compute_closing(
    chart: &ChartOfAccounts,
    adjusted: &BTreeMap<String, i64>,
    date: NaiveDate,
) -> ClosingRun {
    let mut revenues: Vec<(&String, i64)> = Vec::new();
    let mut expenses: Vec<(&String, i64)> = Vec::new();

    for (account, balance) in adjusted {
        match chart.category(account) {
            Category::Revenue => revenues.push((account, *balance)),
            Category::Expense => expenses.push((account, *balance)),
            _ => {}
        }
    }

    let total_revenue: i64 = revenues.iter().map(|(_, b)| b).sum();
    let total_expense: i64 = expenses.iter().map(|(_, b)| b).sum();
    let net_income = total_revenue - total_expense;
    let drawings = adjusted.get(names::DRAWINGS).copied().unwrap_or(0);

    let mut postings = Vec::new();

    // 1. Close revenue accounts into Income Summary.
    if !revenues.is_empty() {
        let txn_id = TransactionId::new();
        let memo = "Close revenue";
        for (account, balance) in &revenues {
            postings.push(closing_leg(date, account, Side::Credit, *balance, memo, txn_id));
        }
        if total_revenue != 0 {
            let side = if total_revenue > 0 { Side::Credit } else { Side::Debit };
            postings.push(posting(
                date,
                names::INCOME_SUMMARY,
                side,
                total_revenue.abs(),
                memo,
                txn_id,
            ));
        }
    }

    // 2. Close expense accounts out of Income Summary.
    if !expenses.is_empty() {
        let txn_id = TransactionId::new();
        let memo = "Close expenses";
        if total_expense != 0 {
            let side = if total_expense > 0 { Side::Debit } else { Side::Credit };
            postings.push(posting(
                date,
                names::INCOME_SUMMARY,
                side,
                total_expense.abs(),
                memo,
                txn_id,
            ));
        }
        for (account, balance) in &expenses {
            postings.push(closing_leg(date, account, Side::Debit, *balance, memo, txn_id));
        }
    }

    // 3. Roll net income (or loss) into capital.
    if net_income != 0 {
        let txn_id = TransactionId::new();
        let amount = net_income.abs();
        if net_income > 0 {
            let memo = "Close net income";
            postings.push(posting(date, names::INCOME_SUMMARY, Side::Debit, amount, memo, txn_id));
            postings.push(posting(date, names::OWNERS_CAPITAL, Side::Credit, amount, memo, txn_id));
        } else {
            let memo = "Close net loss";
            postings.push(posting(date, names::OWNERS_CAPITAL, Side::Debit, amount, memo, txn_id));
            postings.push(posting(date, names::INCOME_SUMMARY, Side::Credit, amount, memo, txn_id));
        }
    }

    // 4. Close drawings against capital.
    if drawings != 0 {
        let txn_id = TransactionId::new();
        let memo = "Close drawings";
        let amount = drawings.abs();
        if drawings > 0 {
            postings.push(posting(date, names::OWNERS_CAPITAL, Side::Debit, amount, memo, txn_id));
            postings.push(posting(date, names::DRAWINGS, Side::Credit, amount, memo, txn_id));
        } else {
            postings.push(posting(date, names::DRAWINGS, Side::Debit, amount, memo, txn_id));
            postings.push(posting(date, names::OWNERS_CAPITAL, Side::Credit, amount, memo, txn_id));
        }
    }

    let post_closing = apply_postings(chart, adjusted, &postings);

    ClosingRun {
        postings,
        total_revenue,
        total_expense,
        net_income,
        drawings,
        post_closing,
    }
}
