//! Tests for instance construction and derived tables.

use super::*;
use crate::error::CoursetableError;

fn small_instance() -> Instance {
    Instance::builder("small", 2, 3)
        .course("c1", "t1", 2, 2, 30, false)
        .course("c2", "t1", 1, 1, 10, false)
        .course("c3", "t2", 3, 2, 50, true)
        .room("r1", 40, 0)
        .room("r2", 20, 1)
        .curriculum("q1", ["c2", "c3"])
        .unavailable("c3", 1, 2)
        .room_constraint("c1", "r2")
        .build()
        .unwrap()
}

#[test]
fn test_events_follow_lecture_counts() {
    let instance = small_instance();
    assert_eq!(instance.event_count(), 6);

    let per_course: Vec<usize> = instance
        .course_ids()
        .map(|c| instance.events().iter().filter(|e| e.course == c).count())
        .collect();
    assert_eq!(per_course, vec![2, 1, 3]);

    for (i, event) in instance.events().iter().enumerate() {
        assert_eq!(event.id, EventId(i));
    }
}

#[test]
fn test_timeslot_mapping() {
    let instance = small_instance();
    assert_eq!(instance.timeslot_count(), 6);
    assert_eq!(instance.day_of(4), 1);
    assert_eq!(instance.period_of(4), 1);
    assert_eq!(instance.timeslot_of(1, 1), 4);
    assert_eq!(instance.day_timeslots(1), 3..6);
}

#[test]
fn test_conflict_tables() {
    let instance = small_instance();
    let (c1, c2, c3) = (CourseId(0), CourseId(1), CourseId(2));

    assert!(instance.same_teacher(c1, c2));
    assert!(!instance.same_teacher(c1, c3));
    assert!(instance.share_curriculum(c2, c3));
    assert!(!instance.share_curriculum(c1, c3));
    assert!(instance.conflicts(c1, c1));
    assert!(instance.conflicts(c1, c2));
    assert!(instance.conflicts(c3, c2));
    assert!(!instance.conflicts(c1, c3));
    assert_eq!(instance.curricula_of(c3), &[CurriculumId(0)]);
    assert!(instance.curricula_of(c1).is_empty());
}

#[test]
fn test_unavailability_lookup() {
    let instance = small_instance();
    assert!(instance.is_unavailable(CourseId(2), 5));
    assert!(!instance.is_unavailable(CourseId(2), 4));
    assert!(!instance.is_unavailable(CourseId(0), 5));
}

#[test]
fn test_room_constraints_resolved() {
    let instance = small_instance();
    assert_eq!(
        instance.room_constraints(),
        &[RoomConstraint {
            course: CourseId(0),
            room: 1
        }]
    );
}

#[test]
fn test_unknown_course_rejected() {
    let err = Instance::builder("bad", 1, 1)
        .course("c1", "t1", 1, 1, 1, false)
        .curriculum("q1", ["c1", "missing"])
        .build()
        .unwrap_err();
    assert!(matches!(err, CoursetableError::InvalidInstance(_)));
}

#[test]
fn test_unavailability_outside_grid_rejected() {
    let err = Instance::builder("bad", 1, 2)
        .course("c1", "t1", 1, 1, 1, false)
        .unavailable("c1", 0, 2)
        .build()
        .unwrap_err();
    assert!(matches!(err, CoursetableError::InvalidInstance(_)));
}

#[test]
fn test_duplicate_course_rejected() {
    let result = Instance::builder("bad", 1, 1)
        .course("c1", "t1", 1, 1, 1, false)
        .course("c1", "t2", 1, 1, 1, false)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_empty_grid_rejected() {
    assert!(Instance::builder("bad", 0, 4).build().is_err());
}
