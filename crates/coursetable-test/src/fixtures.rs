//! Instance and timetable fixtures.
//!
//! Event ids of the `Toy` instance, by course:
//! `SceCosC` 0..=2, `ArcTec` 3..=5, `TecCos` 6..=10, `Geotec` 11..=15.

use coursetable_core::{parse_instance, EventId, Instance, Position, Timetable};

/// The `Toy` instance of the ITC-2007 curriculum-based track.
pub const TOY_ECTT: &str = "\
Name: Toy
Courses: 4
Rooms: 3
Days: 5
Periods_per_day: 4
Curricula: 2
Min_Max_Daily_Lectures: 2 3
UnAvailability_Constraints: 8
RoomConstraints: 3

COURSES:
SceCosC Ocra 3 3 30 1
ArcTec Indaco 3 2 42 0
TecCos Rosa 5 4 40 1
Geotec Scarlatti 5 4 18 1

ROOMS:
rA\t32\t1
rB\t50\t0
rC\t40\t1

CURRICULA:
Cur1 3 SceCosC ArcTec TecCos
Cur2 2 TecCos Geotec

UNAVAILABILITY_CONSTRAINTS:
TecCos 2 0
TecCos 2 1
TecCos 3 2
TecCos 3 3
ArcTec 4 0
ArcTec 4 1
ArcTec 4 2
ArcTec 4 3

ROOM_CONSTRAINTS:
SceCosC rA
Geotec rB
TecCos rC

END.
";

pub fn toy() -> Instance {
    parse_instance(TOY_ECTT).expect("toy instance parses")
}

/// One course with one lecture, one room, one timeslot.
pub fn single_lecture() -> Instance {
    Instance::builder("single", 1, 1)
        .course("c1", "t1", 1, 1, 10, false)
        .room("r1", 20, 0)
        .build()
        .expect("fixture builds")
}

/// Two single-lecture courses of one teacher and a single timeslot.
///
/// Only one of the two lectures can ever be placed.
pub fn shared_teacher_single_slot() -> Instance {
    Instance::builder("clash", 1, 1)
        .course("a", "t1", 1, 1, 10, false)
        .course("b", "t1", 1, 1, 10, false)
        .room("r1", 20, 0)
        .room("r2", 20, 0)
        .build()
        .expect("fixture builds")
}

/// A 50-student course and rooms seating at most 30.
pub fn undersized_rooms() -> Instance {
    Instance::builder("crowded", 2, 2)
        .course("big", "t1", 2, 1, 50, false)
        .room("small", 30, 0)
        .room("tiny", 20, 0)
        .build()
        .expect("fixture builds")
}

/// Several lectures per course but far more positions than lectures.
pub fn roomy() -> Instance {
    Instance::builder("roomy", 5, 6)
        .course("alg", "knuth", 4, 4, 40, false)
        .course("db", "codd", 3, 3, 60, false)
        .course("os", "ritchie", 4, 3, 30, true)
        .course("net", "cerf", 2, 2, 25, false)
        .course("ai", "mccarthy", 3, 2, 80, false)
        .room("hall", 100, 0)
        .room("lab", 35, 0)
        .room("seminar", 50, 1)
        .curriculum("cs1", ["alg", "db", "os"])
        .curriculum("cs2", ["os", "net", "ai"])
        .unavailable("alg", 0, 0)
        .unavailable("alg", 0, 1)
        .unavailable("ai", 4, 5)
        .build()
        .expect("fixture builds")
}

fn place(instance: &Instance, grid: &mut Timetable, event: usize, room: usize, timeslot: usize) {
    grid.assign(instance.event(EventId(event)), Position::new(room, timeslot))
        .expect("fixture position is free");
}

/// A partially filled `Toy` timetable; not necessarily feasible.
pub fn toy_partial_timetable(instance: &Instance) -> Timetable {
    let mut grid = Timetable::for_instance(instance);
    for (event, room, ts) in [
        (0, 0, 0),
        (1, 0, 6),
        (2, 1, 10),
        (3, 1, 5),
        (4, 2, 2),
        (6, 2, 1),
        (7, 2, 4),
        (11, 1, 0),
        (12, 0, 3),
    ] {
        place(instance, &mut grid, event, room, ts);
    }
    grid
}

/// A complete, hard-feasible `Toy` timetable.
pub fn toy_feasible_timetable(instance: &Instance) -> Timetable {
    let mut grid = Timetable::for_instance(instance);
    let placements = [
        // SceCosC in rB
        (0, 1, 0),
        (1, 1, 4),
        (2, 1, 8),
        // ArcTec in rB
        (3, 1, 1),
        (4, 1, 5),
        (5, 1, 9),
        // TecCos in rC
        (6, 2, 2),
        (7, 2, 6),
        (8, 2, 10),
        (9, 2, 12),
        (10, 2, 18),
        // Geotec in rA
        (11, 0, 0),
        (12, 0, 1),
        (13, 0, 3),
        (14, 0, 5),
        (15, 0, 7),
    ];
    for (event, room, ts) in placements {
        place(instance, &mut grid, event, room, ts);
    }
    grid
}
