//! Period-end scenario calculators.
//!
//! Four independent, stateless calculators. Each validates its inputs,
//! computes the adjusting amount from current balances and caller inputs,
//! and returns an [`Adjustment`]; appending to the log is the caller's only
//! side effect.

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::NaiveDate;

use tallybook_chart::names;
use tallybook_core::{DomainError, DomainResult, TransactionId};
use tallybook_journal::Posting;

use crate::adjustment::{Adjustment, Scenario};

/// Straight-line depreciation standard per depreciable asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetProfile {
    /// Residual value as a percentage of acquisition cost.
    pub residual_pct: u32,
    pub useful_life_years: u32,
}

/// Static per-asset-type standards.
pub fn asset_profile(asset: &str) -> Option<AssetProfile> {
    let (residual_pct, useful_life_years) = match asset {
        names::EQUIPMENT => (10, 5),
        names::VEHICLES => (20, 8),
        names::BUILDING => (5, 20),
        names::MACHINERY => (15, 10),
        names::FURNITURE => (5, 3),
        _ => return None,
    };
    Some(AssetProfile {
        residual_pct,
        useful_life_years,
    })
}

/// Accounts a supplies purchase is settled against.
const PAYMENT_ACCOUNTS: [&str; 3] = [names::CASH, names::BANK, names::ACCOUNTS_PAYABLE];

/// Annual straight-line depreciation for a fixed asset.
///
/// Acquisition cost is read from the unadjusted balances; residual
/// percentage and useful life come from the static profile table.
pub fn depreciation(
    balances: &BTreeMap<String, i64>,
    asset: &str,
    date: NaiveDate,
) -> DomainResult<Adjustment> {
    let profile = asset_profile(asset).ok_or_else(|| {
        DomainError::validation(format!("no depreciation profile for asset type {asset}"))
    })?;

    let cost = balances.get(asset).copied().unwrap_or(0);
    if cost <= 0 {
        return Err(DomainError::validation(format!(
            "{asset} has no acquisition cost to depreciate"
        )));
    }

    let cost_wide = cost as i128;
    let residual = cost_wide * profile.residual_pct as i128 / 100;
    let annual = (cost_wide - residual) / profile.useful_life_years as i128;
    let amount = annual as i64;
    if amount <= 0 {
        return Err(DomainError::validation(format!(
            "depreciation for {asset} rounds to zero"
        )));
    }

    Ok(Adjustment {
        date,
        scenario: Scenario::Depreciation,
        debit_account: format!("{} - {asset}", names::DEPRECIATION_EXPENSE_PREFIX),
        credit_account: format!("{} - {asset}", names::ACCUMULATED_DEPRECIATION_PREFIX),
        amount,
        trace: format!(
            "cost {cost} | residual {}% = {residual} | life {}y | ({cost} - {residual}) / {} = {amount}",
            profile.residual_pct, profile.useful_life_years, profile.useful_life_years
        ),
    })
}

/// Supplies purchased during the period, derived from the journal:
/// transactions with a Supplies debit leg matched by an equal-amount credit
/// leg on a payment account.
pub fn supplies_purchases(postings: &[Posting]) -> i64 {
    let mut by_txn: HashMap<TransactionId, Vec<&Posting>> = HashMap::new();
    let mut order: Vec<TransactionId> = Vec::new();
    for posting in postings {
        let legs = by_txn.entry(posting.txn_id).or_default();
        if legs.is_empty() {
            order.push(posting.txn_id);
        }
        legs.push(posting);
    }

    let mut total: i64 = 0;
    for txn_id in order {
        let legs = &by_txn[&txn_id];
        for leg in legs {
            if leg.account != names::SUPPLIES || leg.debit <= 0 {
                continue;
            }
            let paid = legs.iter().any(|other| {
                PAYMENT_ACCOUNTS.contains(&other.account.as_str()) && other.credit == leg.debit
            });
            if paid {
                total += leg.debit;
            }
        }
    }
    total
}

/// Supplies consumed: opening + purchased − ending.
pub fn supplies_consumption(
    opening: i64,
    purchased: i64,
    ending: i64,
    date: NaiveDate,
) -> DomainResult<Adjustment> {
    let consumption = opening + purchased - ending;
    if consumption <= 0 {
        return Err(DomainError::validation(
            "no supplies consumption to recognize",
        ));
    }

    Ok(Adjustment {
        date,
        scenario: Scenario::SuppliesConsumption,
        debit_account: names::SUPPLIES_EXPENSE.to_string(),
        credit_account: names::SUPPLIES.to_string(),
        amount: consumption,
        trace: format!("{opening} + {purchased} - {ending} = {consumption}"),
    })
}

/// Proportional recognition of prepaid rent: total × elapsed / term.
pub fn prepaid_amortization(
    total: i64,
    term_months: u32,
    elapsed_months: u32,
    date: NaiveDate,
) -> DomainResult<Adjustment> {
    if total <= 0 {
        return Err(DomainError::validation(
            "prepaid balance must be positive",
        ));
    }
    if term_months == 0 {
        return Err(DomainError::validation("term must be at least one month"));
    }
    if elapsed_months > term_months {
        return Err(DomainError::validation(
            "elapsed months cannot exceed the term",
        ));
    }

    let recognized = (total as i128 * elapsed_months as i128 / term_months as i128) as i64;
    if recognized <= 0 {
        return Err(DomainError::validation("no rent expense to recognize"));
    }

    Ok(Adjustment {
        date,
        scenario: Scenario::PrepaidAmortization,
        debit_account: names::RENT_EXPENSE.to_string(),
        credit_account: names::PREPAID_RENT.to_string(),
        amount: recognized,
        trace: format!("({total} / {term_months} months) x {elapsed_months} months = {recognized}"),
    })
}

/// Recognition of deferred revenue by completion percentage.
pub fn deferred_revenue(
    total: i64,
    completion_pct: u8,
    date: NaiveDate,
) -> DomainResult<Adjustment> {
    if completion_pct > 100 {
        return Err(DomainError::validation(
            "completion percentage must be between 0 and 100",
        ));
    }

    let recognized = (total as i128 * completion_pct as i128 / 100) as i64;
    if recognized <= 0 {
        return Err(DomainError::validation("no revenue to recognize"));
    }

    Ok(Adjustment {
        date,
        scenario: Scenario::DeferredRevenueRecognition,
        debit_account: names::UNEARNED_REVENUE.to_string(),
        credit_account: names::SERVICE_REVENUE.to_string(),
        amount: recognized,
        trace: format!("{total} x {completion_pct}% = {recognized}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallybook_journal::{build_transaction, Leg};

    fn period_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
    }

    fn balances(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries
            .iter()
            .map(|(name, amount)| (name.to_string(), *amount))
            .collect()
    }

    #[test]
    fn depreciation_follows_the_profile_table() {
        // cost=10,000,000, residual=10%, life=5 -> (10,000,000 - 1,000,000) / 5
        let balances = balances(&[(names::EQUIPMENT, 10_000_000)]);
        let adjustment = depreciation(&balances, names::EQUIPMENT, period_end()).unwrap();

        assert_eq!(adjustment.amount, 1_800_000);
        assert_eq!(adjustment.debit_account, "Depreciation Expense - Equipment");
        assert_eq!(
            adjustment.credit_account,
            "Accumulated Depreciation - Equipment"
        );
        assert_eq!(adjustment.scenario, Scenario::Depreciation);
    }

    #[test]
    fn depreciation_needs_positive_cost_and_known_type() {
        let empty = BTreeMap::new();
        assert!(depreciation(&empty, names::EQUIPMENT, period_end()).is_err());

        let negative = balances(&[(names::VEHICLES, -5_000)]);
        assert!(depreciation(&negative, names::VEHICLES, period_end()).is_err());

        let cash = balances(&[(names::CASH, 1_000_000)]);
        assert!(depreciation(&cash, names::CASH, period_end()).is_err());
    }

    #[test]
    fn supplies_consumption_examples() {
        // opening=0, purchased=2,000,000, ending=500,000 -> 1,500,000
        let adjustment = supplies_consumption(0, 2_000_000, 500_000, period_end()).unwrap();
        assert_eq!(adjustment.amount, 1_500_000);
        assert_eq!(adjustment.debit_account, names::SUPPLIES_EXPENSE);
        assert_eq!(adjustment.credit_account, names::SUPPLIES);

        // opening=0, purchased=500,000, ending=700,000 -> rejected
        let err = supplies_consumption(0, 500_000, 700_000, period_end()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn supplies_purchases_scans_transaction_pairs() {
        let date = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        let mut postings = build_transaction(
            date,
            vec![
                Leg::debit(names::SUPPLIES, 2_000_000),
                Leg::credit(names::CASH, 2_000_000),
            ],
            "supplies for cash",
            "GJ-1",
        )
        .unwrap();
        // Credit purchase also counts.
        postings.extend(
            build_transaction(
                date,
                vec![
                    Leg::debit(names::SUPPLIES, 500_000),
                    Leg::credit(names::ACCOUNTS_PAYABLE, 500_000),
                ],
                "supplies on account",
                "GJ-2",
            )
            .unwrap(),
        );
        // A supplies debit settled against revenue is not a purchase.
        postings.extend(
            build_transaction(
                date,
                vec![
                    Leg::debit(names::SUPPLIES, 300_000),
                    Leg::credit(names::SERVICE_REVENUE, 300_000),
                ],
                "",
                "GJ-3",
            )
            .unwrap(),
        );

        assert_eq!(supplies_purchases(&postings), 2_500_000);
    }

    #[test]
    fn prepaid_amortization_is_proportional() {
        let adjustment = prepaid_amortization(12_000_000, 12, 6, period_end()).unwrap();
        assert_eq!(adjustment.amount, 6_000_000);
        assert_eq!(adjustment.debit_account, names::RENT_EXPENSE);
        assert_eq!(adjustment.credit_account, names::PREPAID_RENT);

        assert!(prepaid_amortization(0, 12, 6, period_end()).is_err());
        assert!(prepaid_amortization(12_000_000, 0, 0, period_end()).is_err());
        assert!(prepaid_amortization(12_000_000, 12, 13, period_end()).is_err());
    }

    #[test]
    fn deferred_revenue_is_recognized_by_completion() {
        let adjustment = deferred_revenue(8_000_000, 50, period_end()).unwrap();
        assert_eq!(adjustment.amount, 4_000_000);
        assert_eq!(adjustment.debit_account, names::UNEARNED_REVENUE);
        assert_eq!(adjustment.credit_account, names::SERVICE_REVENUE);

        assert!(deferred_revenue(8_000_000, 0, period_end()).is_err());
        assert!(deferred_revenue(8_000_000, 101, period_end()).is_err());
        assert!(deferred_revenue(0, 50, period_end()).is_err());
    }
}
