//! Signed account balances derived from postings.
//!
//! Balances are never cached: every view recomputes from the full journal
//! (plus adjustments) on demand.

use std::collections::BTreeMap;

use tallybook_adjustments::Adjustment;
use tallybook_chart::{ChartOfAccounts, Side};
use tallybook_journal::Posting;

/// Compute signed balances under the chart's sign convention:
/// `debit − credit` for debit-normal accounts, `credit − debit` otherwise.
/// Accounts netting to zero are dropped.
pub fn account_balances(
    chart: &ChartOfAccounts,
    postings: &[Posting],
) -> BTreeMap<String, i64> {
    let mut balances: BTreeMap<String, i64> = BTreeMap::new();

    for posting in postings {
        let signed = match chart.normal_side(&posting.account) {
            Side::Debit => posting.debit - posting.credit,
            Side::Credit => posting.credit - posting.debit,
        };
        *balances.entry(posting.account.clone()).or_insert(0) += signed;
    }

    balances.retain(|_, balance| *balance != 0);
    balances
}

/// The single merge rule for applying one leg to a balance map: a leg whose
/// side matches the account's normal side adds, otherwise it subtracts.
fn apply_leg(
    chart: &ChartOfAccounts,
    balances: &mut BTreeMap<String, i64>,
    account: &str,
    side: Side,
    amount: i64,
) {
    let entry = balances.entry(account.to_string()).or_insert(0);
    if chart.normal_side(account) == side {
        *entry += amount;
    } else {
        *entry -= amount;
    }
}

/// Merge adjusting entries into a balance snapshot. This four-branch rule
/// is the single source of truth; reports never re-derive it.
pub fn merge_adjustments(
    chart: &ChartOfAccounts,
    balances: &BTreeMap<String, i64>,
    adjustments: &[Adjustment],
) -> BTreeMap<String, i64> {
    let mut merged = balances.clone();
    for adjustment in adjustments {
        apply_leg(
            chart,
            &mut merged,
            &adjustment.debit_account,
            Side::Debit,
            adjustment.amount,
        );
        apply_leg(
            chart,
            &mut merged,
            &adjustment.credit_account,
            Side::Credit,
            adjustment.amount,
        );
    }
    merged.retain(|_, balance| *balance != 0);
    merged
}

/// Apply loose postings (closing entries) through the same merge rule.
pub fn apply_postings(
    chart: &ChartOfAccounts,
    balances: &BTreeMap<String, i64>,
    postings: &[Posting],
) -> BTreeMap<String, i64> {
    let mut merged = balances.clone();
    for posting in postings {
        apply_leg(
            chart,
            &mut merged,
            &posting.account,
            posting.side(),
            posting.amount(),
        );
    }
    merged.retain(|_, balance| *balance != 0);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tallybook_adjustments::Scenario;
    use tallybook_chart::names;
    use tallybook_journal::{build_transaction, Leg};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()
    }

    fn postings() -> Vec<Posting> {
        let mut postings = build_transaction(
            date(),
            vec![
                Leg::debit(names::CASH, 5_000_000),
                Leg::credit(names::SERVICE_REVENUE, 5_000_000),
            ],
            "",
            "GJ-1",
        )
        .unwrap();
        postings.extend(
            build_transaction(
                date(),
                vec![
                    Leg::debit(names::SUPPLIES, 2_000_000),
                    Leg::credit(names::CASH, 2_000_000),
                ],
                "",
                "GJ-2",
            )
            .unwrap(),
        );
        postings
    }

    #[test]
    fn balances_are_signed_by_normal_side() {
        let chart = ChartOfAccounts::new();
        let balances = account_balances(&chart, &postings());

        assert_eq!(balances[names::CASH], 3_000_000);
        assert_eq!(balances[names::SUPPLIES], 2_000_000);
        assert_eq!(balances[names::SERVICE_REVENUE], 5_000_000);
    }

    #[test]
    fn zero_balances_are_dropped() {
        let chart = ChartOfAccounts::new();
        let mut all = postings();
        all.extend(
            build_transaction(
                date(),
                vec![
                    Leg::debit(names::SERVICE_REVENUE, 5_000_000),
                    Leg::credit(names::CASH, 5_000_000),
                ],
                "reversal",
                "GJ-3",
            )
            .unwrap(),
        );

        let balances = account_balances(&chart, &all);
        assert!(!balances.contains_key(names::SERVICE_REVENUE));
    }

    #[test]
    fn merge_covers_all_four_branches() {
        let chart = ChartOfAccounts::new();
        let balances = account_balances(&chart, &postings());

        let adjustments = vec![
            // Debit leg on a debit-normal account adds; credit leg on a
            // debit-normal account subtracts.
            Adjustment {
                date: date(),
                scenario: Scenario::SuppliesConsumption,
                debit_account: names::SUPPLIES_EXPENSE.to_string(),
                credit_account: names::SUPPLIES.to_string(),
                amount: 1_500_000,
                trace: String::new(),
            },
            // Debit leg on a credit-normal account subtracts; credit leg on
            // a credit-normal account adds.
            Adjustment {
                date: date(),
                scenario: Scenario::DeferredRevenueRecognition,
                debit_account: names::SERVICE_REVENUE.to_string(),
                credit_account: names::UNEARNED_REVENUE.to_string(),
                amount: 400_000,
                trace: String::new(),
            },
        ];

        let merged = merge_adjustments(&chart, &balances, &adjustments);
        assert_eq!(merged[names::SUPPLIES_EXPENSE], 1_500_000);
        assert_eq!(merged[names::SUPPLIES], 500_000);
        assert_eq!(merged[names::SERVICE_REVENUE], 4_600_000);
        assert_eq!(merged[names::UNEARNED_REVENUE], 400_000);
        // Source map untouched.
        assert_eq!(balances[names::SUPPLIES], 2_000_000);
    }

    #[test]
    fn applying_postings_uses_the_same_rule() {
        let chart = ChartOfAccounts::new();
        let balances = account_balances(&chart, &postings());

        let closing = build_transaction(
            date(),
            vec![
                Leg::debit(names::SERVICE_REVENUE, 5_000_000),
                Leg::credit(names::INCOME_SUMMARY, 5_000_000),
            ],
            "close revenue",
            "CLOSE",
        )
        .unwrap();

        let merged = apply_postings(&chart, &balances, &closing);
        assert!(!merged.contains_key(names::SERVICE_REVENUE));
        assert_eq!(merged[names::INCOME_SUMMARY], 5_000_000);
    }
}
