//! Journal record ingestion and export.
//!
//! The record format is owned by the surrounding application's storage;
//! this module only converts between records and postings. Loading is the
//! single partial-failure-tolerant path in the core: malformed records are
//! skipped with a per-record warning instead of aborting the load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tallybook_core::TransactionId;

use crate::journal::Posting;

/// Persisted journal record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub date: NaiveDate,
    pub account: String,
    #[serde(default)]
    pub debit: i64,
    #[serde(default)]
    pub credit: i64,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub reference: String,
}

impl From<&Posting> for JournalRecord {
    fn from(posting: &Posting) -> Self {
        Self {
            date: posting.date,
            account: posting.account.clone(),
            debit: posting.debit,
            credit: posting.credit,
            memo: posting.memo.clone(),
            reference: posting.reference.clone(),
        }
    }
}

fn malformed(record: &JournalRecord) -> Option<&'static str> {
    if record.debit < 0 || record.credit < 0 {
        return Some("negative amount");
    }
    if record.debit > 0 && record.credit > 0 {
        return Some("both debit and credit set");
    }
    if record.debit == 0 && record.credit == 0 {
        return Some("no amount");
    }
    None
}

/// Convert records into postings, skipping malformed records with a
/// warning. Consecutive records sharing a date and a non-empty reference
/// are grouped under one transaction id.
pub fn load_records(records: impl IntoIterator<Item = JournalRecord>) -> Vec<Posting> {
    let mut postings = Vec::new();
    let mut current: Option<(NaiveDate, String, TransactionId)> = None;

    for record in records {
        if let Some(reason) = malformed(&record) {
            tracing::warn!(
                account = %record.account,
                date = %record.date,
                debit = record.debit,
                credit = record.credit,
                "skipping malformed journal record: {reason}"
            );
            continue;
        }

        let txn_id = match &current {
            Some((date, reference, id))
                if *date == record.date
                    && !record.reference.is_empty()
                    && *reference == record.reference =>
            {
                *id
            }
            _ => {
                let id = TransactionId::new();
                current = Some((record.date, record.reference.clone(), id));
                id
            }
        };

        postings.push(Posting {
            date: record.date,
            account: record.account,
            debit: record.debit,
            credit: record.credit,
            memo: record.memo,
            reference: record.reference,
            txn_id,
        });
    }

    postings
}

/// Export postings in the persisted record shape.
pub fn to_records(postings: &[Posting]) -> Vec<JournalRecord> {
    postings.iter().map(JournalRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, account: &str, debit: i64, credit: i64, reference: &str) -> JournalRecord {
        JournalRecord {
            date: date.parse().unwrap(),
            account: account.to_string(),
            debit,
            credit,
            memo: String::new(),
            reference: reference.to_string(),
        }
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let loaded = load_records(vec![
            record("2023-01-05", "Cash", 100, 0, "GJ-1"),
            record("2023-01-05", "Service Revenue", 0, 100, "GJ-1"),
            record("2023-01-06", "Cash", -5, 0, "GJ-2"),
            record("2023-01-06", "Cash", 10, 10, "GJ-3"),
            record("2023-01-06", "Cash", 0, 0, "GJ-4"),
        ]);

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].account, "Cash");
        assert_eq!(loaded[1].credit, 100);
    }

    #[test]
    fn records_sharing_date_and_reference_become_one_transaction() {
        let loaded = load_records(vec![
            record("2023-01-05", "Cash", 100, 0, "GJ-1"),
            record("2023-01-05", "Service Revenue", 0, 100, "GJ-1"),
            record("2023-01-05", "Supplies", 40, 0, "GJ-2"),
            record("2023-01-05", "Cash", 0, 40, "GJ-2"),
        ]);

        assert_eq!(loaded[0].txn_id, loaded[1].txn_id);
        assert_eq!(loaded[2].txn_id, loaded[3].txn_id);
        assert_ne!(loaded[0].txn_id, loaded[2].txn_id);
    }

    #[test]
    fn records_without_references_stay_separate() {
        let loaded = load_records(vec![
            record("2023-01-05", "Cash", 100, 0, ""),
            record("2023-01-05", "Service Revenue", 0, 100, ""),
        ]);
        assert_ne!(loaded[0].txn_id, loaded[1].txn_id);
    }

    #[test]
    fn round_trips_through_json() {
        let records = vec![
            record("2023-01-05", "Cash", 5_000_000, 0, "GJ-1"),
            record("2023-01-05", "Service Revenue", 0, 5_000_000, "GJ-1"),
        ];
        let json = serde_json::to_string(&records).unwrap();
        let parsed: Vec<JournalRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);

        let postings = load_records(parsed);
        assert_eq!(to_records(&postings), records);
    }
}
