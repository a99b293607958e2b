//! Financial statements generated from balance snapshots: income statement,
//! statement of equity, cash flow (journal approximation) and balance sheet.

pub mod statement;

pub use statement::{
    generate, BalanceSheet, CashFlowStatement, EquityStatement, IncomeStatement,
    StatementInputs, Statements,
};
