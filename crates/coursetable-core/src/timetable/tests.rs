use super::*;
use crate::domain::{CourseId, Event, EventId, Position};

fn event(id: usize, course: usize) -> Event {
    Event::new(EventId(id), CourseId(course))
}

#[test]
fn test_new_grid_is_all_empty() {
    let grid = Timetable::new(2, 3, 1);
    assert_eq!(grid.position_count(), 6);
    assert_eq!(grid.empty_positions().len(), 6);
    assert_eq!(grid.placed_count(), 0);
    grid.check_consistency().unwrap();
}

#[test]
fn test_assign_and_remove_keep_empty_set_in_sync() {
    let mut grid = Timetable::new(2, 3, 2);
    let p = Position::new(1, 2);

    grid.assign(event(0, 1), p).unwrap();
    assert_eq!(grid.get(p), Some(event(0, 1)));
    assert!(!grid.empty_positions().contains(p));
    assert_eq!(grid.positions_of(CourseId(1)), &[p]);
    grid.check_consistency().unwrap();

    assert_eq!(grid.remove(p), Some(event(0, 1)));
    assert!(grid.empty_positions().contains(p));
    assert!(grid.positions_of(CourseId(1)).is_empty());
    assert_eq!(grid.remove(p), None);
    grid.check_consistency().unwrap();
}

#[test]
fn test_assign_to_occupied_is_invariant_violation() {
    let mut grid = Timetable::new(1, 1, 1);
    grid.assign(event(0, 0), Position::new(0, 0)).unwrap();
    let err = grid.assign(event(1, 0), Position::new(0, 0)).unwrap_err();
    assert!(err.is_invariant_violation());
}

#[test]
fn test_assign_outside_grid_is_invariant_violation() {
    let mut grid = Timetable::new(1, 1, 1);
    assert!(grid.assign(event(0, 0), Position::new(0, 1)).is_err());
}

#[test]
fn test_rewrite_permutes_events() {
    let mut grid = Timetable::new(2, 2, 2);
    let a = Position::new(0, 0);
    let b = Position::new(1, 1);
    grid.assign(event(0, 0), a).unwrap();
    grid.assign(event(1, 1), b).unwrap();

    grid.rewrite(&[(a, Some(event(1, 1))), (b, Some(event(0, 0)))])
        .unwrap();
    assert_eq!(grid.get(a), Some(event(1, 1)));
    assert_eq!(grid.get(b), Some(event(0, 0)));
    grid.check_consistency().unwrap();

    grid.rewrite(&[(a, None)]).unwrap();
    assert!(grid.is_free(a));
    assert_eq!(grid.placed_count(), 1);
    grid.check_consistency().unwrap();
}

#[test]
fn test_events_in_timeslot_and_occupied_order() {
    let mut grid = Timetable::new(3, 2, 3);
    grid.assign(event(0, 0), Position::new(2, 1)).unwrap();
    grid.assign(event(1, 1), Position::new(0, 1)).unwrap();
    grid.assign(event(2, 2), Position::new(1, 0)).unwrap();

    let column: Vec<_> = grid.events_in_timeslot(1).collect();
    assert_eq!(column, vec![(0, event(1, 1)), (2, event(0, 0))]);

    let occupied: Vec<_> = grid.occupied().map(|(p, _)| p).collect();
    assert_eq!(
        occupied,
        vec![
            Position::new(0, 1),
            Position::new(1, 0),
            Position::new(2, 1)
        ]
    );
}

#[test]
fn test_equality_ignores_empty_set_order() {
    let mut a = Timetable::new(2, 2, 1);
    let mut b = Timetable::new(2, 2, 1);
    a.assign(event(0, 0), Position::new(0, 0)).unwrap();
    a.assign(event(1, 0), Position::new(1, 1)).unwrap();
    b.assign(event(1, 0), Position::new(1, 1)).unwrap();
    b.assign(event(0, 0), Position::new(0, 0)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_position_set_swap_remove_keeps_index() {
    let mut set = PositionSet::full(2, 2);
    assert_eq!(set.len(), 4);
    assert!(set.remove(Position::new(0, 0)));
    assert!(!set.remove(Position::new(0, 0)));
    assert!(set.contains(Position::new(1, 1)));
    assert!(set.remove(Position::new(1, 1)));
    assert_eq!(set.len(), 2);
    let mut rest: Vec<_> = set.iter().collect();
    rest.sort();
    assert_eq!(rest, vec![Position::new(0, 1), Position::new(1, 0)]);
    assert!(set.insert(Position::new(0, 0)));
    assert!(!set.insert(Position::new(0, 0)));
}
