use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tallybook_core::{DomainError, DomainResult};

/// Period-end scenario that produced an adjusting entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Depreciation,
    SuppliesConsumption,
    PrepaidAmortization,
    DeferredRevenueRecognition,
}

/// One adjusting entry: a debit/credit pair plus the computation trace that
/// produced it. Adjustments live in their own collection and are never
/// merged into the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub date: NaiveDate,
    pub scenario: Scenario,
    pub debit_account: String,
    pub credit_account: String,
    /// Amount posted to both sides, in smallest currency unit.
    pub amount: i64,
    /// Human-readable derivation, e.g. `(10000000 - 1000000) / 5 = 1800000`.
    pub trace: String,
}

/// Persisted adjustment record shape (storage format owned by the
/// surrounding application).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    pub date: NaiveDate,
    pub scenario_type: Scenario,
    pub debit_account: String,
    pub credit_account: String,
    pub debit: i64,
    pub credit: i64,
    #[serde(default)]
    pub trace: String,
}

impl From<&Adjustment> for AdjustmentRecord {
    fn from(adjustment: &Adjustment) -> Self {
        Self {
            date: adjustment.date,
            scenario_type: adjustment.scenario,
            debit_account: adjustment.debit_account.clone(),
            credit_account: adjustment.credit_account.clone(),
            debit: adjustment.amount,
            credit: adjustment.amount,
            trace: adjustment.trace.clone(),
        }
    }
}

impl TryFrom<AdjustmentRecord> for Adjustment {
    type Error = DomainError;

    fn try_from(record: AdjustmentRecord) -> Result<Self, Self::Error> {
        if record.debit != record.credit {
            return Err(DomainError::validation(
                "adjustment record debit and credit must be equal",
            ));
        }
        if record.debit <= 0 {
            return Err(DomainError::validation(
                "adjustment amount must be positive",
            ));
        }
        Ok(Self {
            date: record.date,
            scenario: record.scenario_type,
            debit_account: record.debit_account,
            credit_account: record.credit_account,
            amount: record.debit,
            trace: record.trace,
        })
    }
}

/// Append-only collection of adjusting entries with deletion by index.
/// Consumers always recompute from the full collection, so removal needs no
/// cascading recomputation.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentLog {
    entries: Vec<Adjustment>,
}

impl AdjustmentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, adjustment: Adjustment) {
        self.entries.push(adjustment);
    }

    pub fn remove(&mut self, index: usize) -> DomainResult<Adjustment> {
        if index >= self.entries.len() {
            return Err(DomainError::validation(format!(
                "no adjustment at index {index}"
            )));
        }
        Ok(self.entries.remove(index))
    }

    pub fn as_slice(&self) -> &[Adjustment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> Vec<AdjustmentRecord> {
        self.entries.iter().map(AdjustmentRecord::from).collect()
    }

    /// Strict record import: unlike journal ingestion, a malformed
    /// adjustment record fails the whole load.
    pub fn load_records(
        records: impl IntoIterator<Item = AdjustmentRecord>,
    ) -> DomainResult<Self> {
        let entries = records
            .into_iter()
            .map(Adjustment::try_from)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self { entries })
    }
}
