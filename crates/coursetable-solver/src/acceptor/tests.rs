//! Tests for acceptors.

use super::*;
use coursetable_config::{SimulatedAnnealingConfig, TabuSearchConfig};
use coursetable_core::Position;
use rand::SeedableRng;

#[test]
fn test_annealing_schedule_cools_to_minimum() {
    let mut acceptor = SimulatedAnnealingAcceptor::new(5.0, 1.3, 5, 10);
    acceptor.phase_started();

    let mut temperatures = Vec::new();
    for _ in 0..8 {
        acceptor.step_started();
        temperatures.push(acceptor.temperature());
        acceptor.step_ended(true);
    }

    assert_eq!(temperatures[0], 5.0);
    assert!(temperatures[..=5].windows(2).all(|w| w[1] < w[0]));
    assert!((temperatures[5] - 1.3).abs() < 1e-9);
    assert!(temperatures[7] <= 1.3 + 1e-9);
    assert!(acceptor.cooling_step() <= 6);
}

#[test]
fn test_annealing_reheats_after_consecutive_failures() {
    let mut acceptor = SimulatedAnnealingAcceptor::new(5.0, 1.3, 5, 10);
    acceptor.phase_started();

    for _ in 0..11 {
        acceptor.step_started();
        acceptor.step_ended(false);
    }
    assert!(acceptor.temperature() < 2.0);

    acceptor.step_started();
    assert_eq!(acceptor.temperature(), 5.0);
}

#[test]
fn test_annealing_success_resets_failure_count() {
    let mut acceptor = SimulatedAnnealingAcceptor::new(5.0, 1.3, 5, 10);
    acceptor.phase_started();

    for i in 0..30 {
        acceptor.step_started();
        acceptor.step_ended(i % 5 == 0);
    }
    acceptor.step_started();
    assert!(acceptor.temperature() < 5.0);
}

#[test]
fn test_annealing_metropolis_criterion() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut acceptor = SimulatedAnnealingAcceptor::new(5.0, 1.3, 5, 10);
    acceptor.phase_started();
    acceptor.step_started();

    assert!(acceptor.is_accepted(-3, &mut rng));
    assert!(acceptor.is_accepted(0, &mut rng));
    assert!((0..100).all(|_| !acceptor.is_accepted(1000, &mut rng)));

    // exp(-1 / 5) is about 0.82
    let accepted = (0..10_000)
        .filter(|_| acceptor.is_accepted(1, &mut rng))
        .count();
    assert!((7_800..8_600).contains(&accepted), "accepted {accepted}");
}

#[test]
fn test_tabu_forbids_pairs_in_either_order() {
    let mut acceptor = TabuSearchAcceptor::new(300);

    assert!(acceptor.is_move_allowed(&Move::SwapTimeslots { first: 4, second: 9 }));
    assert!(!acceptor.is_move_allowed(&Move::SwapTimeslots { first: 4, second: 9 }));
    assert!(!acceptor.is_move_allowed(&Move::SwapTimeslots { first: 9, second: 4 }));

    let (p, q) = (Position::new(0, 1), Position::new(2, 5));
    assert!(acceptor.is_move_allowed(&Move::SwapPositions { first: q, second: p }));
    assert!(!acceptor.is_move_allowed(&Move::SwapPositions { first: p, second: q }));
}

#[test]
fn test_tabu_rooms_are_keyed_by_timeslot() {
    let mut acceptor = TabuSearchAcceptor::new(300);
    let mv = |timeslot| Move::SwapRooms {
        first: 0,
        second: 2,
        timeslot,
    };

    assert!(acceptor.is_move_allowed(&mv(3)));
    assert!(acceptor.is_move_allowed(&mv(4)));
    assert!(!acceptor.is_move_allowed(&Move::SwapRooms {
        first: 2,
        second: 0,
        timeslot: 3,
    }));
}

#[test]
fn test_tabu_list_evicts_oldest() {
    let mut list = TabuList::new(2);
    list.push(1);
    list.push(2);
    list.push(3);

    assert_eq!(list.len(), 2);
    assert!(!list.contains(&1));
    assert!(list.contains(&2) && list.contains(&3));
    assert!(list.try_insert(1));
    assert!(!list.contains(&2));
}

#[test]
fn test_tabu_accepts_only_non_worsening() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut acceptor = TabuSearchAcceptor::new(10);

    assert!(acceptor.is_accepted(-1, &mut rng));
    assert!(acceptor.is_accepted(0, &mut rng));
    assert!(!acceptor.is_accepted(1, &mut rng));
}

#[test]
fn test_tabu_phase_start_clears_lists() {
    let mut acceptor = TabuSearchAcceptor::new(10);
    let mv = Move::SwapTimeslots { first: 0, second: 1 };
    assert!(acceptor.is_move_allowed(&mv));

    acceptor.phase_started();
    assert!(acceptor.is_move_allowed(&mv));
}

#[test]
fn test_builder_follows_config() {
    let sa = AcceptorBuilder::build(&AcceptorConfig::SimulatedAnnealing(
        SimulatedAnnealingConfig::default(),
    ));
    assert_eq!(sa.name(), "SA");

    let ts = AcceptorBuilder::build(&AcceptorConfig::TabuSearch(TabuSearchConfig {
        tabu_length: 5,
    }));
    assert_eq!(ts.name(), "TS");
}
