/*!
 * Exchange Coordinator Integration Tests
 *
 * Claim policy, termination, and no-double-clear under stress
 */

use monitor_sim::core::types::{Ingredient, ItemPair};
use monitor_sim::exchange::{
    run_consumer, ExchangeCoordinator, Offer, RandomPairs, ScriptedPairs,
};
use monitor_sim::{run_exchange, ExchangeConfig, RecordingSink, SimConfig, SimEvent};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn fast_config(rounds: u64) -> ExchangeConfig {
    ExchangeConfig {
        rounds,
        ..SimConfig::fast().exchange
    }
}

fn pair(a: Ingredient, b: Ingredient) -> ItemPair {
    ItemPair::new(a, b).unwrap()
}

/// Every produced pair must be released before the next one is produced
fn assert_single_occupancy(events: &[SimEvent]) {
    let mut resident = None;
    for event in events {
        match event {
            SimEvent::PairProduced { ticket, .. } => {
                assert_eq!(resident, None, "pair {ticket} produced over a full slot");
                resident = Some(*ticket);
            }
            SimEvent::PairReleased { ticket, .. } => {
                assert_eq!(resident, Some(*ticket), "released a pair not in the slot");
                resident = None;
            }
            _ => {}
        }
    }
}

#[test]
fn test_single_round_claimed_by_missing_ingredient() {
    let sink = Arc::new(RecordingSink::new());
    let source = ScriptedPairs::new(vec![pair(Ingredient::Noodles, Ingredient::Water)]).unwrap();

    let report = run_exchange(&fast_config(1), sink.clone(), Box::new(source)).unwrap();

    assert_eq!(report.produced, 1);
    for consumer in &report.consumers {
        let expected = if consumer.consumer == Ingredient::Seeds { 1 } else { 0 };
        assert_eq!(consumer.claimed, expected, "{:?}", consumer.consumer);
    }

    let claims = sink.filter(|e| matches!(e, SimEvent::PairClaimed { .. }));
    assert_eq!(claims.len(), 1);
    assert!(matches!(
        claims[0],
        SimEvent::PairClaimed {
            consumer: Ingredient::Seeds,
            ..
        }
    ));
    assert_eq!(sink.count_kind("consumer_exited"), 3);
    assert_eq!(sink.count_kind("producer_exhausted"), 1);
}

#[test]
fn test_irrelevant_consumers_rewait_then_exit() {
    let coord = Arc::new(ExchangeCoordinator::new(1, Arc::new(RecordingSink::new())));

    let bystanders: Vec<_> = [Ingredient::Noodles, Ingredient::Water]
        .into_iter()
        .map(|identity| {
            let coord = coord.clone();
            thread::spawn(move || run_consumer(&coord, identity, Duration::ZERO))
        })
        .collect();

    coord
        .produce(pair(Ingredient::Noodles, Ingredient::Water))
        .unwrap();
    coord.declare_exhausted();

    // Neither bystander may clear the slot
    thread::sleep(Duration::from_millis(50));
    assert!(coord.snapshot().resident.is_some());
    assert!(bystanders.iter().all(|h| !h.is_finished()));

    let claimant = run_consumer(&coord, Ingredient::Seeds, Duration::ZERO);
    assert_eq!(claimant.claimed, 1);

    for handle in bystanders {
        assert_eq!(handle.join().unwrap().claimed, 0);
    }
    assert_eq!(coord.try_consume(None), Offer::Exhausted);
}

#[test]
fn test_zero_rounds_terminates_immediately() {
    let sink = Arc::new(RecordingSink::new());
    let report = run_exchange(
        &fast_config(0),
        sink.clone(),
        Box::new(RandomPairs::new(Some(1))),
    )
    .unwrap();

    assert_eq!(report.produced, 0);
    assert_eq!(report.total_claimed(), 0);
    assert_eq!(sink.count_kind("consumer_exited"), 3);
}

#[test]
fn test_stress_no_double_clear() {
    for rounds in [8, 250] {
        let sink = Arc::new(RecordingSink::new());
        let report = run_exchange(
            &fast_config(rounds),
            sink.clone(),
            Box::new(RandomPairs::new(Some(rounds))),
        )
        .unwrap();

        assert_eq!(report.produced, rounds);
        assert_eq!(report.total_claimed(), rounds);
        assert_eq!(report.slot.released, rounds);
        assert!(report.slot.resident.is_none());
        assert_eq!(report.slot.rounds_remaining, 0);

        let events = sink.events();
        assert_single_occupancy(&events);

        let mut released = BTreeSet::new();
        for event in &events {
            match event {
                SimEvent::PairClaimed { consumer, pair, .. } => {
                    assert_eq!(*consumer, pair.claimant());
                }
                SimEvent::PairReleased { ticket, .. } => {
                    assert!(released.insert(*ticket), "ticket {ticket} cleared twice");
                }
                _ => {}
            }
        }
        assert_eq!(released, (1..=rounds).collect::<BTreeSet<_>>());
    }
}

#[test]
fn test_claims_match_claimant_counts() {
    let script = vec![
        pair(Ingredient::Noodles, Ingredient::Water),
        pair(Ingredient::Water, Ingredient::Seeds),
        pair(Ingredient::Seeds, Ingredient::Noodles),
        pair(Ingredient::Water, Ingredient::Noodles),
    ];
    let source = ScriptedPairs::new(script).unwrap();

    let report = run_exchange(
        &fast_config(4),
        Arc::new(RecordingSink::new()),
        Box::new(source),
    )
    .unwrap();

    let claimed: Vec<_> = report
        .consumers
        .iter()
        .map(|c| (c.consumer, c.claimed))
        .collect();
    assert_eq!(
        claimed,
        vec![
            (Ingredient::Noodles, 1),
            (Ingredient::Water, 1),
            (Ingredient::Seeds, 2),
        ]
    );
}
