use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tallybook_chart::{names, AssetClass, Category, ChartOfAccounts};
use tallybook_closing::ClosingRun;
use tallybook_core::{DomainError, DomainResult};
use tallybook_journal::Posting;

/// Caller-supplied figures the journal cannot provide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementInputs {
    /// Opening inventory for the COGS computation. Defaults to zero for a
    /// first period.
    #[serde(default)]
    pub opening_inventory: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub revenue: BTreeMap<String, i64>,
    pub total_revenue: i64,
    pub cost_of_goods_sold: i64,
    pub gross_profit: i64,
    /// Expense accounts except depreciation, purchases and miscellaneous.
    pub operating_expenses: BTreeMap<String, i64>,
    pub total_operating_expenses: i64,
    pub depreciation_expense: i64,
    pub other_expenses: i64,
    pub net_income: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityStatement {
    pub opening_equity: i64,
    pub net_income: i64,
    pub drawings: i64,
    pub closing_equity: i64,
}

impl EquityStatement {
    /// The rollforward must land exactly on the capital balance the closing
    /// entries produced.
    pub fn cross_check(&self, closing: &ClosingRun) -> DomainResult<()> {
        let posted = closing
            .post_closing
            .get(names::OWNERS_CAPITAL)
            .copied()
            .unwrap_or(0);
        let discrepancy = self.closing_equity - posted;
        if discrepancy != 0 {
            return Err(DomainError::consistency(
                "equity statement disagrees with post-closing capital",
                discrepancy,
            ));
        }
        Ok(())
    }
}

/// Direct-method cash flow approximated from journal postings rather than a
/// true cash ledger. Opening cash is fixed at zero for the period, so
/// `ending_cash` generally diverges from the Cash account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub operating_receipts: i64,
    pub operating_payments: i64,
    pub net_operating: i64,
    pub investing: i64,
    pub financing: i64,
    pub opening_cash: i64,
    pub ending_cash: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub current_assets: BTreeMap<String, i64>,
    pub total_current_assets: i64,
    pub fixed_assets: BTreeMap<String, i64>,
    pub gross_fixed_assets: i64,
    pub accumulated_depreciation: i64,
    pub net_fixed_assets: i64,
    pub total_assets: i64,
    pub liabilities: BTreeMap<String, i64>,
    pub total_liabilities: i64,
    pub closing_equity: i64,
    pub total_liabilities_and_equity: i64,
    /// `total_assets − total_liabilities_and_equity`. Reported, never
    /// corrected.
    pub discrepancy: i64,
}

impl BalanceSheet {
    /// Integer minor units leave no room for rounding: any nonzero
    /// discrepancy is an error.
    pub fn validate(&self) -> DomainResult<()> {
        if self.discrepancy != 0 {
            return Err(DomainError::consistency(
                "balance sheet out of balance",
                self.discrepancy,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statements {
    pub income: IncomeStatement,
    pub equity: EquityStatement,
    pub cash_flow: CashFlowStatement,
    pub balance_sheet: BalanceSheet,
}

fn income_statement(
    chart: &ChartOfAccounts,
    adjusted: &BTreeMap<String, i64>,
    inputs: StatementInputs,
) -> IncomeStatement {
    let mut revenue = BTreeMap::new();
    let mut operating_expenses = BTreeMap::new();
    let mut purchases: i64 = 0;
    let mut depreciation_expense: i64 = 0;
    let mut other_expenses: i64 = 0;

    for (account, balance) in adjusted {
        match chart.category(account) {
            Category::Revenue => {
                revenue.insert(account.clone(), *balance);
            }
            Category::Expense => {
                if chart.is_purchases(account) {
                    purchases += *balance;
                } else if chart.is_depreciation_expense(account) {
                    depreciation_expense += *balance;
                } else if account == names::MISCELLANEOUS_EXPENSE {
                    other_expenses += *balance;
                } else {
                    operating_expenses.insert(account.clone(), *balance);
                }
            }
            _ => {}
        }
    }

    let total_revenue: i64 = revenue.values().sum();
    let ending_inventory = adjusted.get(names::INVENTORY).copied().unwrap_or(0);
    let cost_of_goods_sold =
        (purchases + inputs.opening_inventory - ending_inventory).max(0);
    let gross_profit = total_revenue - cost_of_goods_sold;
    let total_operating_expenses: i64 = operating_expenses.values().sum();
    let net_income =
        gross_profit - (total_operating_expenses + depreciation_expense + other_expenses);

    IncomeStatement {
        revenue,
        total_revenue,
        cost_of_goods_sold,
        gross_profit,
        operating_expenses,
        total_operating_expenses,
        depreciation_expense,
        other_expenses,
        net_income,
    }
}

fn equity_statement(
    adjusted: &BTreeMap<String, i64>,
    closing: &ClosingRun,
) -> EquityStatement {
    let opening_equity = adjusted.get(names::OWNERS_CAPITAL).copied().unwrap_or(0);
    EquityStatement {
        opening_equity,
        net_income: closing.net_income,
        drawings: closing.drawings,
        closing_equity: opening_equity + closing.net_income - closing.drawings,
    }
}

fn cash_flow_statement(
    chart: &ChartOfAccounts,
    unadjusted: &BTreeMap<String, i64>,
    postings: &[Posting],
) -> CashFlowStatement {
    let mut operating_receipts: i64 = 0;
    let mut operating_payments: i64 = 0;
    let mut liabilities: i64 = 0;
    let mut drawings: i64 = 0;

    for (account, balance) in unadjusted {
        match chart.category(account) {
            Category::Revenue => operating_receipts += *balance,
            Category::Expense if !chart.is_depreciation_expense(account) => {
                operating_payments += *balance
            }
            Category::Liability => liabilities += *balance,
            _ => {}
        }
        if account == names::DRAWINGS {
            drawings = *balance;
        }
    }

    let mut investing: i64 = 0;
    let mut contributions: i64 = 0;
    for posting in postings {
        if posting.debit > 0 && chart.asset_class(&posting.account) == Some(AssetClass::Fixed) {
            investing -= posting.debit;
        }
        if posting.credit > 0 && posting.account == names::OWNERS_CAPITAL {
            contributions += posting.credit;
        }
    }

    let net_operating = operating_receipts - operating_payments;
    let financing = contributions + liabilities - drawings;

    CashFlowStatement {
        operating_receipts,
        operating_payments,
        net_operating,
        investing,
        financing,
        opening_cash: 0,
        ending_cash: net_operating + investing + financing,
    }
}

fn balance_sheet(
    chart: &ChartOfAccounts,
    adjusted: &BTreeMap<String, i64>,
    closing_equity: i64,
) -> BalanceSheet {
    let mut current_assets = BTreeMap::new();
    let mut fixed_assets = BTreeMap::new();
    let mut accumulated_depreciation: i64 = 0;
    let mut liabilities = BTreeMap::new();

    for (account, balance) in adjusted {
        if chart.is_contra_asset(account) {
            accumulated_depreciation += *balance;
            continue;
        }
        match chart.category(account) {
            Category::Asset => match chart.asset_class(account) {
                Some(AssetClass::Fixed) => {
                    fixed_assets.insert(account.clone(), *balance);
                }
                _ => {
                    current_assets.insert(account.clone(), *balance);
                }
            },
            Category::Liability => {
                liabilities.insert(account.clone(), *balance);
            }
            _ => {}
        }
    }

    let total_current_assets: i64 = current_assets.values().sum();
    let gross_fixed_assets: i64 = fixed_assets.values().sum();
    let net_fixed_assets = gross_fixed_assets - accumulated_depreciation;
    let total_assets = total_current_assets + net_fixed_assets;
    let total_liabilities: i64 = liabilities.values().sum();
    let total_liabilities_and_equity = total_liabilities + closing_equity;

    BalanceSheet {
        current_assets,
        total_current_assets,
        fixed_assets,
        gross_fixed_assets,
        accumulated_depreciation,
        net_fixed_assets,
        total_assets,
        liabilities,
        total_liabilities,
        closing_equity,
        total_liabilities_and_equity,
        discrepancy: total_assets - total_liabilities_and_equity,
    }
}

/// Build all four statements from the two balance snapshots, the raw journal
/// and the computed closing run. Pure: no statement mutates its inputs.
pub fn generate(
    chart: &ChartOfAccounts,
    unadjusted: &BTreeMap<String, i64>,
    adjusted: &BTreeMap<String, i64>,
    postings: &[Posting],
    closing: &ClosingRun,
    inputs: StatementInputs,
) -> Statements {
    let income = income_statement(chart, adjusted, inputs);
    let equity = equity_statement(adjusted, closing);
    let cash_flow = cash_flow_statement(chart, unadjusted, postings);
    let balance_sheet = balance_sheet(chart, adjusted, equity.closing_equity);

    Statements {
        income,
        equity,
        cash_flow,
        balance_sheet,
    }
}
