use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tallybook_chart::Side;
use tallybook_core::{DomainError, DomainResult, TransactionId};

/// One ledger posting (immutable once appended).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub date: NaiveDate,
    pub account: String,
    /// Amounts in smallest currency unit; exactly one of debit/credit is
    /// nonzero.
    pub debit: i64,
    pub credit: i64,
    pub memo: String,
    pub reference: String,
    pub txn_id: TransactionId,
}

impl Posting {
    pub fn amount(&self) -> i64 {
        if self.debit > 0 { self.debit } else { self.credit }
    }

    pub fn side(&self) -> Side {
        if self.debit > 0 { Side::Debit } else { Side::Credit }
    }
}

/// One side of a transaction before it is posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub account: String,
    /// Positive amount in smallest currency unit.
    pub amount: i64,
    pub side: Side,
}

impl Leg {
    pub fn debit(account: impl Into<String>, amount: i64) -> Self {
        Self {
            account: account.into(),
            amount,
            side: Side::Debit,
        }
    }

    pub fn credit(account: impl Into<String>, amount: i64) -> Self {
        Self {
            account: account.into(),
            amount,
            side: Side::Credit,
        }
    }
}

/// Ordering of a journal listing. Computation consumes `Insertion`;
/// display typically consumes `DateDescending`. Order never affects
/// computed balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    Insertion,
    DateDescending,
}

/// Validate a set of legs and turn them into postings sharing one
/// transaction id.
///
/// Rejected outright: fewer than two legs, non-positive amounts, legs that
/// all reference a single account, and debit/credit totals that differ.
pub fn build_transaction(
    date: NaiveDate,
    legs: Vec<Leg>,
    memo: impl Into<String>,
    reference: impl Into<String>,
) -> DomainResult<Vec<Posting>> {
    if legs.len() < 2 {
        return Err(DomainError::validation(
            "transaction must have at least two legs",
        ));
    }

    let mut debit_total: i128 = 0;
    let mut credit_total: i128 = 0;

    for leg in &legs {
        if leg.amount <= 0 {
            return Err(DomainError::validation("leg amount must be positive"));
        }
        match leg.side {
            Side::Debit => debit_total += leg.amount as i128,
            Side::Credit => credit_total += leg.amount as i128,
        }
    }

    if debit_total != credit_total {
        return Err(DomainError::validation("debits must equal credits"));
    }

    let first_account = &legs[0].account;
    if legs.iter().all(|l| &l.account == first_account) {
        return Err(DomainError::validation(
            "transaction legs must reference more than one account",
        ));
    }

    let txn_id = TransactionId::new();
    let memo = memo.into();
    let reference = reference.into();

    Ok(legs
        .into_iter()
        .map(|leg| Posting {
            date,
            account: leg.account,
            debit: if leg.side == Side::Debit { leg.amount } else { 0 },
            credit: if leg.side == Side::Credit { leg.amount } else { 0 },
            memo: memo.clone(),
            reference: reference.clone(),
            txn_id,
        })
        .collect())
}
