use super::*;
use coursetable_core::EventId;
use coursetable_scoring::count_violations;
use coursetable_test::fixtures;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn feasible_toy() -> (Instance, SolverState) {
    let instance = fixtures::toy();
    let grid = fixtures::toy_feasible_timetable(&instance);
    let state = SolverState::from_timetable(&instance, grid).unwrap();
    (instance, state)
}

fn event_at(state: &SolverState, room: usize, timeslot: usize) -> Option<usize> {
    state
        .grid()
        .get(Position::new(room, timeslot))
        .map(|e| e.id.0)
}

#[test]
fn test_swap_timeslots_rejects_unavailable_lecture() {
    let (instance, mut state) = feasible_toy();
    let before = state.clone();

    // TecCos cannot be taught in timeslot 8
    let outcome = swap_timeslots(&instance, &mut state, 2, 8, Feasibility::Preserve).unwrap();

    assert_eq!(outcome, MoveOutcome::Rejected(Rejection::Infeasible));
    assert_eq!(state, before);
}

#[test]
fn test_swap_timeslots_moves_whole_columns_and_reverses() {
    let (instance, mut state) = feasible_toy();
    let before = state.clone();

    let outcome = swap_timeslots(&instance, &mut state, 0, 19, Feasibility::Preserve).unwrap();
    let MoveOutcome::Applied(backup) = outcome else {
        panic!("expected the move to apply, got {outcome:?}");
    };

    assert_eq!(event_at(&state, 0, 19), Some(11));
    assert_eq!(event_at(&state, 1, 19), Some(0));
    assert_eq!(event_at(&state, 0, 0), None);
    assert_eq!(event_at(&state, 1, 0), None);
    state.check_consistency(&instance).unwrap();

    reverse(&mut state, &backup).unwrap();
    assert_eq!(state, before);
}

#[test]
fn test_swap_timeslots_between_empty_columns_has_no_effect() {
    let (instance, mut state) = feasible_toy();
    let outcome = swap_timeslots(&instance, &mut state, 11, 13, Feasibility::Relax).unwrap();
    assert_eq!(outcome, MoveOutcome::Rejected(Rejection::NoEffect));
}

#[test]
fn test_relaxed_swap_timeslots_sends_misfits_to_pending() {
    let (instance, mut state) = feasible_toy();

    // ArcTec is unavailable on the last day, Geotec is not
    let outcome = swap_timeslots(&instance, &mut state, 1, 16, Feasibility::Relax).unwrap();

    assert!(outcome.is_applied());
    assert_eq!(event_at(&state, 0, 16), Some(12));
    assert_eq!(event_at(&state, 1, 16), None);
    assert_eq!(state.pending(), &[instance.event(EventId(3))]);
    state.check_consistency(&instance).unwrap();
}

#[test]
fn test_swap_positions_no_effect_on_empty_cells() {
    let (instance, mut state) = feasible_toy();
    let outcome = swap_positions(
        &instance,
        &mut state,
        Position::new(2, 0),
        Position::new(2, 1),
        Feasibility::Preserve,
    )
    .unwrap();
    assert_eq!(outcome, MoveOutcome::Rejected(Rejection::NoEffect));
}

#[test]
fn test_swap_positions_rejects_curriculum_clash() {
    let (instance, mut state) = feasible_toy();
    let before = state.clone();

    // TecCos would join Geotec (same curriculum) in timeslot 0
    let outcome = swap_positions(
        &instance,
        &mut state,
        Position::new(1, 0),
        Position::new(2, 2),
        Feasibility::Preserve,
    )
    .unwrap();

    assert_eq!(outcome, MoveOutcome::Rejected(Rejection::Infeasible));
    assert_eq!(state, before);
}

#[test]
fn test_relaxed_swap_positions_evicts_clashing_lecture() {
    let (instance, mut state) = feasible_toy();

    let outcome = swap_positions(
        &instance,
        &mut state,
        Position::new(1, 0),
        Position::new(2, 2),
        Feasibility::Relax,
    )
    .unwrap();

    assert!(outcome.is_applied());
    assert_eq!(event_at(&state, 2, 2), Some(0));
    assert_eq!(event_at(&state, 1, 0), None);
    assert_eq!(state.pending(), &[instance.event(EventId(6))]);
    state.check_consistency(&instance).unwrap();
}

#[test]
fn test_swap_positions_into_empty_cell_and_back() {
    let (instance, mut state) = feasible_toy();
    let before = state.clone();

    let outcome = swap_positions(
        &instance,
        &mut state,
        Position::new(1, 0),
        Position::new(2, 19),
        Feasibility::Preserve,
    )
    .unwrap();
    let MoveOutcome::Applied(backup) = outcome else {
        panic!("expected the move to apply, got {outcome:?}");
    };
    assert_eq!(event_at(&state, 2, 19), Some(0));
    assert_eq!(event_at(&state, 1, 0), None);
    assert_eq!(
        backup.touched_courses().collect::<Vec<_>>(),
        vec![instance.event(EventId(0)).course]
    );

    reverse(&mut state, &backup).unwrap();
    assert_eq!(state, before);
}

#[test]
fn test_swap_rooms_exchanges_only_the_two_cells() {
    let (instance, mut state) = feasible_toy();
    let before = state.clone();

    let outcome = swap_rooms(&mut state, 0, 1, 0).unwrap();

    assert!(outcome.is_applied());
    assert_eq!(event_at(&state, 0, 0), Some(0));
    assert_eq!(event_at(&state, 1, 0), Some(11));
    for (position, event) in before.grid().occupied() {
        if position.timeslot != 0 {
            assert_eq!(state.grid().get(position), Some(event));
        }
    }
    assert_eq!(state.grid().placed_count(), before.grid().placed_count());
    assert_eq!(count_violations(&instance, state.grid()), 0);
}

#[test]
fn test_swap_rooms_same_room_has_no_effect() {
    let (_, mut state) = feasible_toy();
    let outcome = swap_rooms(&mut state, 1, 1, 0).unwrap();
    assert_eq!(outcome, MoveOutcome::Rejected(Rejection::NoEffect));
}

#[test]
fn test_preserving_moves_never_break_hard_constraints() {
    let (instance, mut state) = feasible_toy();
    let mut rng = StdRng::seed_from_u64(7);
    let mut applied = 0;

    for _ in 0..2000 {
        let kind = MoveKind::IMPROVEMENT[rng.random_range(0..3)];
        let Some(mv) = kind.select(&mut rng, state.grid()) else {
            continue;
        };
        let before = state.clone();
        let outcome = mv.apply(&instance, &mut state, Feasibility::Preserve).unwrap();

        state.check_consistency(&instance).unwrap();
        assert_eq!(count_violations(&instance, state.grid()), 0, "{mv:?}");
        assert_eq!(state.distance(), 0);

        match outcome {
            MoveOutcome::Applied(backup) => {
                applied += 1;
                if applied % 3 == 0 {
                    reverse(&mut state, &backup).unwrap();
                    assert_eq!(state, before);
                }
            }
            MoveOutcome::Rejected(_) => assert_eq!(state, before),
        }
    }
    assert!(applied > 0);
}

#[test]
fn test_selectors_draw_distinct_indices() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..200 {
        let (a, b) = random_timeslot_pair(&mut rng, 3).unwrap();
        assert_ne!(a, b);
        assert!(a < 3 && b < 3);

        let (p, q) = random_position_pair(&mut rng, 2, 4).unwrap();
        assert_ne!(p.timeslot, q.timeslot);
        assert!(p.room < 2 && q.room < 2);

        let (r1, r2, ts) = random_room_pair(&mut rng, 3, 5).unwrap();
        assert_ne!(r1, r2);
        assert!(ts < 5);
    }
    assert_eq!(random_timeslot_pair(&mut rng, 1), None);
    assert_eq!(random_position_pair(&mut rng, 2, 1), None);
    assert_eq!(random_room_pair(&mut rng, 1, 5), None);
}
