use chrono::NaiveDate;

use tallybook_core::TransactionId;

use crate::journal::{ListOrder, Posting};

/// Injected journal storage abstraction.
///
/// The journal is the only mutable state in the core: append-only plus
/// whole-transaction deletion. Callers pass the store explicitly; there is
/// no ambient shared state and no internal locking (the surrounding
/// application serializes writers).
pub trait JournalStore {
    /// Append validated postings (one balanced transaction or a tolerant
    /// record load).
    fn append(&mut self, postings: Vec<Posting>);

    /// Snapshot of every posting in insertion order.
    fn postings(&self) -> Vec<Posting>;

    /// Remove every posting of one transaction. Returns the number removed.
    fn delete_transaction(&mut self, id: TransactionId) -> usize;

    /// Remove every posting dated `date`. Returns the number removed.
    ///
    /// This removes unrelated same-day transactions in one sweep; prefer
    /// [`JournalStore::delete_transaction`] where the caller knows the id.
    fn delete_by_date(&mut self, date: NaiveDate) -> usize;

    /// Snapshot in the requested order. Date ordering is display-only; sums
    /// are order-independent.
    fn list(&self, order: ListOrder) -> Vec<Posting> {
        let mut postings = self.postings();
        if order == ListOrder::DateDescending {
            // Stable sort keeps insertion order within a date.
            postings.sort_by(|a, b| b.date.cmp(&a.date));
        }
        postings
    }
}

/// In-memory journal for tests and single-process embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJournal {
    postings: Vec<Posting>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

impl JournalStore for InMemoryJournal {
    fn append(&mut self, postings: Vec<Posting>) {
        self.postings.extend(postings);
    }

    fn postings(&self) -> Vec<Posting> {
        self.postings.clone()
    }

    fn delete_transaction(&mut self, id: TransactionId) -> usize {
        let before = self.postings.len();
        self.postings.retain(|p| p.txn_id != id);
        before - self.postings.len()
    }

    fn delete_by_date(&mut self, date: NaiveDate) -> usize {
        let before = self.postings.len();
        self.postings.retain(|p| p.date != date);
        before - self.postings.len()
    }
}
