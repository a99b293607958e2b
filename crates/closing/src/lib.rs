//! Closing engine: computes the period-end entries that zero nominal
//! accounts and roll net income and drawings into capital.

pub mod closing;

pub use closing::{compute_closing, ClosingRun};
