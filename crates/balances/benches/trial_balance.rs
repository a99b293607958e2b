use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use tallybook_balances::{account_balances, trial_balance};
use tallybook_chart::{names, ChartOfAccounts};
use tallybook_journal::{build_transaction, Leg, Posting};

fn synth_journal(transactions: usize) -> Vec<Posting> {
    let debit_pool = [
        names::CASH,
        names::SUPPLIES,
        names::EQUIPMENT,
        names::SALARIES_EXPENSE,
        names::RENT_EXPENSE,
        names::PURCHASES,
    ];
    let credit_pool = [
        names::SERVICE_REVENUE,
        names::SALES,
        names::ACCOUNTS_PAYABLE,
        names::OWNERS_CAPITAL,
        names::UNEARNED_REVENUE,
        names::BANK_LOAN,
    ];

    let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
    let mut postings = Vec::with_capacity(transactions * 2);
    for i in 0..transactions {
        let amount = 1_000 + (i as i64 % 997) * 13;
        postings.extend(
            build_transaction(
                date,
                vec![
                    Leg::debit(debit_pool[i % debit_pool.len()], amount),
                    Leg::credit(credit_pool[i % credit_pool.len()], amount),
                ],
                "",
                "",
            )
            .expect("synthetic transaction is balanced"),
        );
    }
    postings
}

fn bench_trial_balance(c: &mut Criterion) {
    let chart = ChartOfAccounts::new();
    let mut group = c.benchmark_group("trial_balance");

    for &transactions in &[100usize, 1_000, 10_000] {
        let postings = synth_journal(transactions);
        group.throughput(Throughput::Elements(postings.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(transactions),
            &postings,
            |b, postings| {
                b.iter(|| {
                    let balances = account_balances(&chart, black_box(postings));
                    trial_balance(&chart, &balances)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_trial_balance);
criterion_main!(benches);
