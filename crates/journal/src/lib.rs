//! Journal domain module (double-entry postings).
//!
//! Append-only ordered collection of postings with balanced-transaction
//! validation at write time. Pure domain logic: no IO, no persistence
//! concerns (record shapes are converted, never stored here).

pub mod journal;
pub mod records;
pub mod store;

pub use journal::{build_transaction, Leg, ListOrder, Posting};
pub use records::{load_records, to_records, JournalRecord};
pub use store::{InMemoryJournal, JournalStore};
