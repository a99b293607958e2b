//! `tallybook-core` — shared bookkeeping primitives.
//!
//! This crate contains **pure domain** building blocks (no IO, no
//! infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::TransactionId;
