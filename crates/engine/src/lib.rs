//! Bookkeeping facade over the chart, journal, adjustment and closing
//! engines: one entry point for the full accounting cycle.

pub mod books;

pub use books::{AdjustmentParams, Books, Stage};
