//! Text rendering of a timetable.

use std::fmt;

use coursetable_core::{Instance, Position, Timetable};

const CELL_WIDTH: usize = 11;

/// Rooms as rows, timeslots as columns, each cell holding the course of
/// its lecture or `-`.
///
/// ```
/// use coursetable::TimetableDisplay;
/// use coursetable_core::{Instance, Timetable};
///
/// let instance = Instance::builder("tiny", 1, 2)
///     .course("c1", "t1", 1, 1, 10, false)
///     .room("r1", 20, 0)
///     .build()
///     .unwrap();
/// let grid = Timetable::for_instance(&instance);
///
/// let text = TimetableDisplay::new(&instance, &grid).to_string();
/// assert!(text.starts_with("Timetable: tiny\n"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimetableDisplay<'a> {
    instance: &'a Instance,
    timetable: &'a Timetable,
}

impl<'a> TimetableDisplay<'a> {
    pub fn new(instance: &'a Instance, timetable: &'a Timetable) -> Self {
        Self {
            instance,
            timetable,
        }
    }
}

impl fmt::Display for TimetableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.timetable;
        let label_width = self
            .instance
            .rooms()
            .iter()
            .map(|room| room.name.len())
            .max()
            .unwrap_or(0);

        writeln!(f, "Timetable: {}", self.instance.name())?;
        write!(f, "{:label_width$} ", "")?;
        for ts in 0..grid.timeslots() {
            let day = self.instance.day_of(ts);
            let period = self.instance.period_of(ts);
            write!(f, "|{:>CELL_WIDTH$}", format!("{day}.{period}"))?;
        }
        writeln!(f, "|")?;

        for room in 0..grid.rooms() {
            write!(f, "{:<label_width$} ", self.instance.room(room).name)?;
            for ts in 0..grid.timeslots() {
                match grid.get(Position::new(room, ts)) {
                    Some(event) => {
                        let name = &self.instance.course(event.course).name;
                        write!(f, "|{name:>CELL_WIDTH$}")?;
                    }
                    None => write!(f, "|{:>CELL_WIDTH$}", "-")?,
                }
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
