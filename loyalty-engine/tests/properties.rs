//! Ledger invariants under randomised operation sequences

mod common;

use common::*;
use loyalty_engine::ErrorCode;
use loyalty_engine::db::repository::{ledger, voucher};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::models::{DerivedBalance, ReferenceType, TransactionFilter};

const CUSTOMER: i64 = 1;

fn tier_rank(name: &str) -> usize {
    ["bronze", "silver", "gold"]
        .iter()
        .position(|t| *t == name)
        .unwrap()
}

#[tokio::test]
async fn test_random_sequences_preserve_invariants() {
    let engine = test_engine().await;
    let mut rng = StdRng::seed_from_u64(0x10_7A17);
    let account = engine.resolve_account(CUSTOMER).await.unwrap();

    let mut last_lifetime = 0;
    let mut last_rank = 0;
    let mut redemptions = 0;

    for step in 0..150 {
        let outcome = match rng.gen_range(0..4) {
            0 => engine
                .earn(earn(CUSTOMER, &format!("o-{step}"), rng.gen_range(0.0..900.0)))
                .await
                .map(|_| ()),
            1 => {
                let points = rng.gen_range(1..=10) * 100;
                let result = engine.redeem(redeem(CUSTOMER, points)).await.map(|_| ());
                if result.is_ok() {
                    redemptions += 1;
                }
                result
            }
            2 => engine
                .adjust(adjust(CUSTOMER, rng.gen_range(-400..=400), "random"))
                .await
                .map(|_| ()),
            _ => {
                // Refund an earlier order, which may or may not exist
                let order = rng.gen_range(0..=step);
                engine
                    .refund_order(shared::models::RefundRequest {
                        customer_id: CUSTOMER,
                        order_id: format!("o-{order}"),
                        reason: "random refund".into(),
                    })
                    .await
                    .map(|_| ())
            }
        };
        if let Err(e) = outcome {
            assert!(
                matches!(
                    e.code,
                    ErrorCode::InsufficientBalance
                        | ErrorCode::WouldOverdraw
                        | ErrorCode::InvalidInput
                        | ErrorCode::OrderNotEarned
                ),
                "unexpected error at step {step}: {e:?}"
            );
        }

        // Balance derivation matches a fold over the stored entries
        let entries = ledger::list_for_account(engine.pool(), account.id).await.unwrap();
        let folded = DerivedBalance::from_deltas(entries.iter().map(|e| e.points_delta));
        let summary = engine.get_account(CUSTOMER).await.unwrap();
        assert_eq!(summary.balance, folded.current_balance);
        assert_eq!(summary.lifetime_earned, folded.lifetime_earned);

        // Non-negativity
        assert!(summary.balance >= 0, "negative balance at step {step}");

        // Lifetime earned and tier never go down
        assert!(summary.lifetime_earned >= last_lifetime);
        let rank = tier_rank(&summary.tier);
        assert!(rank >= last_rank, "tier dropped at step {step}");
        last_lifetime = summary.lifetime_earned;
        last_rank = rank;
    }

    // Every voucher has exactly one matching debit and vice versa
    let vouchers = voucher::list_for_account(engine.pool(), account.id).await.unwrap();
    let debits: Vec<_> = ledger::list_for_account(engine.pool(), account.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.reference_type == ReferenceType::VoucherRedemption)
        .collect();
    assert_eq!(vouchers.len(), redemptions);
    assert_eq!(debits.len(), redemptions);
    for v in &vouchers {
        let matching: Vec<_> = debits
            .iter()
            .filter(|e| e.reference_id == v.id.to_string())
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].points_delta, -v.points_redeemed);
    }
}

#[tokio::test]
async fn test_running_balance_matches_prefix_sums() {
    let engine = test_engine().await;
    let mut rng = StdRng::seed_from_u64(42);
    for step in 0..40 {
        let customer = rng.gen_range(1..=3);
        let _ = engine
            .adjust(adjust(customer, rng.gen_range(-150..=300), &format!("step {step}")))
            .await;
    }

    for customer in 1..=3 {
        let account = engine.resolve_account(customer).await.unwrap();
        let entries = ledger::list_for_account(engine.pool(), account.id).await.unwrap();
        let mut expected: Vec<(i64, i64)> = entries
            .iter()
            .scan(0, |running, e| {
                *running += e.points_delta;
                Some((e.id, *running))
            })
            .collect();
        expected.reverse();

        let page = engine
            .list_transactions(&TransactionFilter::for_customer(customer).paginate(1, 100))
            .await
            .unwrap();
        let actual: Vec<_> = page
            .data
            .iter()
            .map(|r| (r.entry.id, r.running_balance_after_entry))
            .collect();
        assert_eq!(actual, expected);
    }
}

#[tokio::test]
async fn test_reads_are_pure() {
    let engine = test_engine().await;
    engine.earn(earn(CUSTOMER, "o-1", 640.0)).await.unwrap();
    engine.redeem(redeem(CUSTOMER, 300)).await.unwrap();
    engine.adjust(adjust(CUSTOMER, 15, "goodwill")).await.unwrap();

    let filter = TransactionFilter::for_customer(CUSTOMER);
    let summary = engine.get_account(CUSTOMER).await.unwrap();
    let history = engine.list_transactions(&filter).await.unwrap();

    for _ in 0..3 {
        assert_eq!(engine.get_account(CUSTOMER).await.unwrap(), summary);
        assert_eq!(engine.list_transactions(&filter).await.unwrap(), history);
    }
}

#[tokio::test]
async fn test_declined_operations_leave_no_trace() {
    let engine = test_engine().await;
    engine.earn(earn(CUSTOMER, "o-1", 250.0)).await.unwrap();
    let account = engine.resolve_account(CUSTOMER).await.unwrap();
    let before = ledger::list_for_account(engine.pool(), account.id).await.unwrap();

    assert!(engine.redeem(redeem(CUSTOMER, 300)).await.is_err());
    assert!(engine.redeem(redeem(CUSTOMER, 150)).await.is_err());
    assert!(engine.adjust(adjust(CUSTOMER, -251, "too much")).await.is_err());
    assert!(engine.adjust(adjust(CUSTOMER, 0, "zero")).await.is_err());
    assert!(engine.earn(earn(CUSTOMER, "o-2", -5.0)).await.is_err());

    let after = ledger::list_for_account(engine.pool(), account.id).await.unwrap();
    assert_eq!(before, after);
    assert!(voucher::list_for_account(engine.pool(), account.id).await.unwrap().is_empty());
}
