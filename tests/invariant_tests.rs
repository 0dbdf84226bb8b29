use buyoutflow::application::engine::ApprovalEngine;
use buyoutflow::domain::approval::Actor;
use buyoutflow::domain::commitment::{CommitmentEntry, CommitmentUpdate};
use buyoutflow::domain::money::Money;
use buyoutflow::infrastructure::in_memory::{InMemoryAuditLog, InMemoryCommitmentStore};
use rand::prelude::*;
use rust_decimal::Decimal;

fn engine() -> ApprovalEngine {
    ApprovalEngine::new(
        Box::new(InMemoryCommitmentStore::new()),
        Box::new(InMemoryAuditLog::new()),
    )
}

fn money(rng: &mut StdRng) -> Money {
    // Two decimal places, up to $5M.
    let cents: i64 = rng.gen_range(0..=500_000_000);
    Money::new(Decimal::new(cents, 2)).unwrap()
}

/// Storm of random budget/contract updates; the derived-field invariants must
/// hold after every single mutation.
#[tokio::test]
async fn test_budget_invariants_under_random_updates() {
    let engine = engine();
    let actor = Actor::default();
    let mut rng = StdRng::seed_from_u64(42);

    let entry = CommitmentEntry::new(
        "e1",
        "P-100",
        "05-1000",
        "Structural Metal Framing",
        Money::ZERO,
        Money::ZERO,
    );
    engine.add(entry, &actor).await.unwrap();

    for _ in 0..500 {
        let update = CommitmentUpdate {
            original_budget: rng.gen_bool(0.5).then(|| money(&mut rng)),
            estimated_tax: rng.gen_bool(0.3).then(|| money(&mut rng)),
            contract_value: rng.gen_bool(0.4).then(|| money(&mut rng)),
            enrolled_in_sdi: rng.gen_bool(0.2).then(|| rng.r#gen()),
            bond_required: rng.gen_bool(0.2).then(|| rng.r#gen()),
            ..Default::default()
        };

        let entry = engine.update("P-100", "e1", update, &actor).await.unwrap();

        assert_eq!(
            entry.total_budget,
            entry.original_budget + entry.estimated_tax,
            "total budget invariant violated"
        );
        match entry.contract_value {
            Some(cv) => assert_eq!(entry.over_under, Some(entry.total_budget - cv)),
            None => assert_eq!(entry.over_under, None),
        }
    }
}

/// Random submit/respond sequences can never produce more than one pending
/// step, and the pending pointer must agree with the history tail.
#[tokio::test]
async fn test_at_most_one_pending_under_random_workflow() {
    let engine = engine();
    let actor = Actor::default();
    let mut rng = StdRng::seed_from_u64(7);

    let mut entry = CommitmentEntry::new(
        "e1",
        "P-100",
        "26-1000",
        "Electrical",
        money(&mut rng),
        Money::ZERO,
    );
    entry.subcontractor_name = Some("Volt Electric".to_string());
    entry.contract_value = Some(money(&mut rng));
    engine.add(entry, &actor).await.unwrap();

    for _ in 0..200 {
        // Outcomes are irrelevant here; InvalidTransition is an expected
        // answer for out-of-order calls.
        if rng.gen_bool(0.4) {
            let _ = engine.submit("P-100", "e1", None).await;
        } else {
            let _ = engine
                .respond("P-100", "e1", rng.r#gen(), None, rng.r#gen(), None)
                .await;
        }

        let listed = engine.list("P-100").await.unwrap();
        let entry = &listed[0];
        let pending = entry
            .approval_history
            .iter()
            .filter(|s| s.is_pending())
            .count();
        assert!(pending <= 1, "more than one pending step");
        assert_eq!(
            pending == 1,
            entry.current_step.is_some(),
            "pending pointer out of sync with history"
        );
    }
}
