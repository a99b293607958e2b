use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use tallybook_adjustments::{
    deferred_revenue, depreciation, prepaid_amortization, supplies_consumption,
    supplies_purchases, Adjustment, AdjustmentLog, AdjustmentRecord,
};
use tallybook_balances::{
    account_balances, apply_postings, ledger, merge_adjustments, trial_balance, LedgerLine,
    TrialBalance,
};
use tallybook_chart::{names, ChartOfAccounts};
use tallybook_closing::{compute_closing, ClosingRun};
use tallybook_core::{DomainError, DomainResult, TransactionId};
use tallybook_journal::{
    build_transaction, load_records, to_records, InMemoryJournal, JournalRecord, JournalStore,
    Leg, ListOrder, Posting,
};
use tallybook_statements::{generate, StatementInputs, Statements};

/// Which balance snapshot a trial balance reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Unadjusted,
    Adjusted,
    PostClosing,
}

/// Caller inputs for one adjusting scenario. Everything else (acquisition
/// cost, supplies purchased, deferred balance, the period-end date) is
/// derived from the books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentParams {
    Depreciation {
        asset: String,
    },
    Supplies {
        opening: i64,
        ending: i64,
    },
    Prepaid {
        /// Prepaid total; defaults to the current Prepaid Rent balance.
        total: Option<i64>,
        term_months: u32,
        elapsed_months: u32,
    },
    DeferredRevenue {
        completion_pct: u8,
    },
}

/// The bookkeeping facade: chart + injected journal + adjustment log +
/// closing journal.
///
/// Single-threaded by design; there is no internal locking and every read
/// recomputes from the full journal state. The only side-effecting
/// operations are the journal mutations, the adjustment log mutations and
/// [`Books::post_closing`].
#[derive(Debug, Clone, Default)]
pub struct Books<S: JournalStore = InMemoryJournal> {
    chart: ChartOfAccounts,
    journal: S,
    adjustments: AdjustmentLog,
    closing_journal: Vec<Posting>,
}

impl Books<InMemoryJournal> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: JournalStore> Books<S> {
    pub fn with_store(journal: S) -> Self {
        Self {
            chart: ChartOfAccounts::new(),
            journal,
            adjustments: AdjustmentLog::new(),
            closing_journal: Vec::new(),
        }
    }

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartOfAccounts {
        &mut self.chart
    }

    /// Validate and append one balanced transaction. Returns its id.
    pub fn append_transaction(
        &mut self,
        date: NaiveDate,
        legs: Vec<Leg>,
        memo: &str,
        reference: &str,
    ) -> DomainResult<TransactionId> {
        let postings = build_transaction(date, legs, memo, reference)?;
        let txn_id = postings[0].txn_id;
        tracing::debug!(%txn_id, %date, legs = postings.len(), "appending transaction");
        self.journal.append(postings);
        Ok(txn_id)
    }

    /// Remove one transaction by id. Returns the number of postings removed.
    pub fn delete_transaction(&mut self, id: TransactionId) -> usize {
        let removed = self.journal.delete_transaction(id);
        tracing::debug!(txn_id = %id, removed, "deleted transaction");
        removed
    }

    /// Remove every posting dated `date`, unrelated transactions included.
    pub fn delete_transactions_on_date(&mut self, date: NaiveDate) -> usize {
        let removed = self.journal.delete_by_date(date);
        tracing::debug!(%date, removed, "deleted postings by date");
        removed
    }

    pub fn postings(&self) -> Vec<Posting> {
        self.journal.postings()
    }

    pub fn list(&self, order: ListOrder) -> Vec<Posting> {
        self.journal.list(order)
    }

    pub fn adjustments(&self) -> &[Adjustment] {
        self.adjustments.as_slice()
    }

    pub fn closing_postings(&self) -> &[Posting] {
        &self.closing_journal
    }

    /// December 31 of the journal's last posting year; `None` on an empty
    /// journal.
    pub fn period_end(&self) -> Option<NaiveDate> {
        let year = self
            .journal
            .postings()
            .iter()
            .map(|p| p.date)
            .max()?
            .year();
        NaiveDate::from_ymd_opt(year, 12, 31)
    }

    fn period_end_required(&self) -> DomainResult<NaiveDate> {
        self.period_end()
            .ok_or_else(|| DomainError::validation("the journal is empty"))
    }

    pub fn unadjusted_balances(&self) -> BTreeMap<String, i64> {
        account_balances(&self.chart, &self.journal.postings())
    }

    pub fn adjusted_balances(&self) -> BTreeMap<String, i64> {
        merge_adjustments(
            &self.chart,
            &self.unadjusted_balances(),
            self.adjustments.as_slice(),
        )
    }

    fn balances_at(&self, stage: Stage) -> BTreeMap<String, i64> {
        match stage {
            Stage::Unadjusted => self.unadjusted_balances(),
            Stage::Adjusted => self.adjusted_balances(),
            Stage::PostClosing => apply_postings(
                &self.chart,
                &self.adjusted_balances(),
                &self.closing_journal,
            ),
        }
    }

    pub fn trial_balance(&self, stage: Stage) -> TrialBalance {
        trial_balance(&self.chart, &self.balances_at(stage))
    }

    pub fn ledger(&self, account: &str) -> DomainResult<Vec<LedgerLine>> {
        ledger(&self.chart, &self.journal.postings(), account)
    }

    /// Compute one adjusting entry and append it to the log.
    pub fn apply_adjustment(&mut self, params: AdjustmentParams) -> DomainResult<Adjustment> {
        let date = self.period_end_required()?;
        let balances = self.unadjusted_balances();

        let adjustment = match params {
            AdjustmentParams::Depreciation { asset } => depreciation(&balances, &asset, date)?,
            AdjustmentParams::Supplies { opening, ending } => {
                let purchased = supplies_purchases(&self.journal.postings());
                supplies_consumption(opening, purchased, ending, date)?
            }
            AdjustmentParams::Prepaid {
                total,
                term_months,
                elapsed_months,
            } => {
                let total = total
                    .unwrap_or_else(|| balances.get(names::PREPAID_RENT).copied().unwrap_or(0));
                prepaid_amortization(total, term_months, elapsed_months, date)?
            }
            AdjustmentParams::DeferredRevenue { completion_pct } => {
                let total = balances.get(names::UNEARNED_REVENUE).copied().unwrap_or(0);
                deferred_revenue(total, completion_pct, date)?
            }
        };

        tracing::debug!(
            scenario = ?adjustment.scenario,
            amount = adjustment.amount,
            trace = %adjustment.trace,
            "recorded adjusting entry"
        );
        self.adjustments.push(adjustment.clone());
        Ok(adjustment)
    }

    pub fn remove_adjustment(&mut self, index: usize) -> DomainResult<Adjustment> {
        self.adjustments.remove(index)
    }

    /// Pure closing computation from the adjusted snapshot. Posts nothing.
    pub fn compute_closing(&self) -> DomainResult<ClosingRun> {
        let date = self.period_end_required()?;
        Ok(compute_closing(&self.chart, &self.adjusted_balances(), date))
    }

    /// Compute closing entries and append them to the closing journal. The
    /// one side effect of the closing workflow; calling it again
    /// double-closes, which is the caller's guard to hold.
    pub fn post_closing(&mut self) -> DomainResult<ClosingRun> {
        if !self.closing_journal.is_empty() {
            tracing::warn!(
                existing = self.closing_journal.len(),
                "closing journal is not empty; posting again double-closes"
            );
        }
        let run = self.compute_closing()?;
        self.closing_journal.extend(run.postings.iter().cloned());
        Ok(run)
    }

    /// All four statements from the current books. Pure: closing entries are
    /// computed, not posted.
    pub fn statements(&self, inputs: StatementInputs) -> DomainResult<Statements> {
        let unadjusted = self.unadjusted_balances();
        let adjusted = self.adjusted_balances();
        let closing = self.compute_closing()?;
        Ok(generate(
            &self.chart,
            &unadjusted,
            &adjusted,
            &self.journal.postings(),
            &closing,
            inputs,
        ))
    }

    /// Tolerant journal import: malformed records are skipped with a
    /// warning, never aborting the load.
    pub fn load_journal_records(&mut self, records: impl IntoIterator<Item = JournalRecord>) {
        let postings = load_records(records);
        tracing::debug!(loaded = postings.len(), "loaded journal records");
        self.journal.append(postings);
    }

    pub fn journal_records(&self) -> Vec<JournalRecord> {
        to_records(&self.journal.postings())
    }

    /// Strict adjustment import: any malformed record fails the whole load
    /// and leaves the current log untouched.
    pub fn load_adjustment_records(
        &mut self,
        records: impl IntoIterator<Item = AdjustmentRecord>,
    ) -> DomainResult<()> {
        self.adjustments = AdjustmentLog::load_records(records)?;
        Ok(())
    }

    pub fn adjustment_records(&self) -> Vec<AdjustmentRecord> {
        self.adjustments.records()
    }

    pub fn closing_records(&self) -> Vec<JournalRecord> {
        to_records(&self.closing_journal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> Books {
        let mut books = Books::new();
        books
            .append_transaction(
                ymd(2023, 1, 5),
                vec![
                    Leg::debit(names::CASH, 5_000_000),
                    Leg::credit(names::SERVICE_REVENUE, 5_000_000),
                ],
                "cash service income",
                "GJ-1",
            )
            .unwrap();
        books
    }

    #[test]
    fn append_rejects_unbalanced_transactions() {
        let mut books = Books::new();
        let err = books
            .append_transaction(
                ymd(2023, 1, 5),
                vec![
                    Leg::debit(names::CASH, 100),
                    Leg::credit(names::SERVICE_REVENUE, 90),
                ],
                "",
                "",
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(books.postings().is_empty());
    }

    #[test]
    fn delete_by_id_and_by_date() {
        let mut books = seeded();
        let id = books
            .append_transaction(
                ymd(2023, 1, 6),
                vec![
                    Leg::debit(names::SUPPLIES, 40),
                    Leg::credit(names::CASH, 40),
                ],
                "",
                "GJ-2",
            )
            .unwrap();

        assert_eq!(books.delete_transaction(id), 2);
        assert_eq!(books.delete_transaction(id), 0);
        assert_eq!(books.delete_transactions_on_date(ymd(2023, 1, 5)), 2);
        assert!(books.postings().is_empty());
    }

    #[test]
    fn period_end_is_december_of_the_last_posting_year() {
        let books = seeded();
        assert_eq!(books.period_end(), Some(ymd(2023, 12, 31)));
        assert_eq!(Books::new().period_end(), None);
    }

    #[test]
    fn adjustments_need_a_non_empty_journal() {
        let mut books = Books::new();
        let err = books
            .apply_adjustment(AdjustmentParams::Supplies {
                opening: 0,
                ending: 0,
            })
            .unwrap_err();
        assert_eq!(err, DomainError::validation("the journal is empty"));
    }

    #[test]
    fn deferred_revenue_reads_the_unearned_balance() {
        let mut books = Books::new();
        books
            .append_transaction(
                ymd(2023, 3, 1),
                vec![
                    Leg::debit(names::CASH, 8_000_000),
                    Leg::credit(names::UNEARNED_REVENUE, 8_000_000),
                ],
                "advance payment",
                "GJ-1",
            )
            .unwrap();

        let adjustment = books
            .apply_adjustment(AdjustmentParams::DeferredRevenue { completion_pct: 50 })
            .unwrap();
        assert_eq!(adjustment.amount, 4_000_000);
        assert_eq!(books.adjustments().len(), 1);

        let adjusted = books.adjusted_balances();
        assert_eq!(adjusted[names::UNEARNED_REVENUE], 4_000_000);
        assert_eq!(adjusted[names::SERVICE_REVENUE], 4_000_000);
    }

    #[test]
    fn prepaid_defaults_to_the_prepaid_rent_balance() {
        let mut books = Books::new();
        books
            .append_transaction(
                ymd(2023, 1, 1),
                vec![
                    Leg::debit(names::PREPAID_RENT, 12_000_000),
                    Leg::credit(names::CASH, 12_000_000),
                ],
                "one year of rent",
                "GJ-1",
            )
            .unwrap();

        let adjustment = books
            .apply_adjustment(AdjustmentParams::Prepaid {
                total: None,
                term_months: 12,
                elapsed_months: 3,
            })
            .unwrap();
        assert_eq!(adjustment.amount, 3_000_000);
    }

    #[test]
    fn removing_an_adjustment_restores_the_adjusted_snapshot() {
        let mut books = seeded();
        books
            .append_transaction(
                ymd(2023, 1, 6),
                vec![
                    Leg::debit(names::SUPPLIES, 2_000_000),
                    Leg::credit(names::CASH, 2_000_000),
                ],
                "",
                "GJ-2",
            )
            .unwrap();
        books
            .apply_adjustment(AdjustmentParams::Supplies {
                opening: 0,
                ending: 500_000,
            })
            .unwrap();
        assert_eq!(books.adjusted_balances()[names::SUPPLIES], 500_000);

        books.remove_adjustment(0).unwrap();
        assert!(books.adjustments().is_empty());
        assert_eq!(books.adjusted_balances()[names::SUPPLIES], 2_000_000);
        assert!(books.remove_adjustment(0).is_err());
    }

    #[test]
    fn post_closing_appends_to_the_closing_journal() {
        let mut books = seeded();
        assert!(books.closing_postings().is_empty());

        let run = books.post_closing().unwrap();
        assert_eq!(run.net_income, 5_000_000);
        assert_eq!(books.closing_postings().len(), run.postings.len());

        let tb = books.trial_balance(Stage::PostClosing);
        tb.ensure_balanced().unwrap();
        assert!(tb.rows.iter().all(|r| r.account != names::SERVICE_REVENUE));
    }

    #[test]
    fn strict_adjustment_load_fails_whole() {
        let mut books = seeded();
        let mut records = books.adjustment_records();
        records.push(AdjustmentRecord {
            date: ymd(2023, 12, 31),
            scenario_type: tallybook_adjustments::Scenario::Depreciation,
            debit_account: "Depreciation Expense - Equipment".to_string(),
            credit_account: "Accumulated Depreciation - Equipment".to_string(),
            debit: 100,
            credit: 90,
            trace: String::new(),
        });
        assert!(books.load_adjustment_records(records).is_err());
    }
}
