//! Reader for the `.ectt` instance format.
//!
//! The format is line oriented: a header of `Key: value` lines, then the
//! sections `COURSES:`, `ROOMS:`, `CURRICULA:`,
//! `UNAVAILABILITY_CONSTRAINTS:` and `ROOM_CONSTRAINTS:`, each a list of
//! whitespace separated records closed by a blank line, and a final
//! `END.` line.
//!
//! # Example
//!
//! ```
//! use coursetable_core::parse_instance;
//!
//! let text = "\
//! Name: Tiny
//! Courses: 1
//! Rooms: 1
//! Days: 1
//! Periods_per_day: 2
//! Curricula: 0
//! Min_Max_Daily_Lectures: 0 2
//! UnAvailability_Constraints: 0
//! RoomConstraints: 0
//!
//! COURSES:
//! c1 t1 2 1 10 0
//!
//! ROOMS:
//! r1 20 0
//!
//! CURRICULA:
//!
//! UNAVAILABILITY_CONSTRAINTS:
//!
//! ROOM_CONSTRAINTS:
//!
//! END.
//! ";
//!
//! let instance = parse_instance(text).unwrap();
//! assert_eq!(instance.name(), "Tiny");
//! assert_eq!(instance.event_count(), 2);
//! ```


use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::{Instance, InstanceBuilder};
use crate::error::CoursetableError;

/// Error reading an instance file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("missing header field '{0}'")]
    MissingHeader(&'static str),

    #[error("missing section '{0}'")]
    MissingSection(&'static str),

    #[error("section {section} declares {declared} records but holds {found}")]
    CountMismatch {
        section: &'static str,
        declared: usize,
        found: usize,
    },

    #[error(transparent)]
    Instance(#[from] CoursetableError),
}

impl ParseError {
    fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// Reads and parses an instance file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<Instance, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_instance(&text)
}

/// Parses an instance from `.ectt` text.
pub fn parse_instance(text: &str) -> Result<Instance, ParseError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .collect();

    let header = Header::parse(&lines)?;
    let mut builder = InstanceBuilder::new(header.name.clone(), header.days, header.periods)
        .daily_lectures(header.min_daily, header.max_daily);

    let courses = section(&lines, "COURSES:")?;
    expect_count("COURSES", header.courses, courses.len())?;
    for &(line, record) in &courses {
        let fields = Fields::new(line, record);
        fields.expect_len(6)?;
        builder = builder.course(
            fields.str(0),
            fields.str(1),
            fields.number(2)?,
            fields.number(3)?,
            fields.number(4)?,
            fields.number::<u8>(5)? != 0,
        );
    }

    let rooms = section(&lines, "ROOMS:")?;
    expect_count("ROOMS", header.rooms, rooms.len())?;
    for &(line, record) in &rooms {
        let fields = Fields::new(line, record);
        fields.expect_len(3)?;
        builder = builder.room(fields.str(0), fields.number(1)?, fields.number(2)?);
    }

    let curricula = section(&lines, "CURRICULA:")?;
    expect_count("CURRICULA", header.curricula, curricula.len())?;
    for &(line, record) in &curricula {
        let fields = Fields::new(line, record);
        let declared: usize = fields.number(1)?;
        let len = declared.checked_add(2).ok_or_else(|| {
            ParseError::syntax(line, format!("curriculum declares {declared} courses"))
        })?;
        fields.expect_len(len)?;
        builder = builder.curriculum(fields.str(0), fields.tokens[2..].iter().copied());
    }

    let unavailable = section(&lines, "UNAVAILABILITY_CONSTRAINTS:")?;
    expect_count(
        "UNAVAILABILITY_CONSTRAINTS",
        header.unavailabilities,
        unavailable.len(),
    )?;
    for &(line, record) in &unavailable {
        let fields = Fields::new(line, record);
        fields.expect_len(3)?;
        let (day, period): (usize, usize) = (fields.number(1)?, fields.number(2)?);
        if day >= header.days || period >= header.periods {
            return Err(ParseError::syntax(
                line,
                format!("day {day} period {period} outside the {}x{} week", header.days, header.periods),
            ));
        }
        builder = builder.unavailable(fields.str(0), day, period);
    }

    let room_constraints = section(&lines, "ROOM_CONSTRAINTS:")?;
    expect_count(
        "ROOM_CONSTRAINTS",
        header.room_constraints,
        room_constraints.len(),
    )?;
    for &(line, record) in &room_constraints {
        let fields = Fields::new(line, record);
        fields.expect_len(2)?;
        builder = builder.room_constraint(fields.str(0), fields.str(1));
    }

    Ok(builder.build()?)
}

#[derive(Debug)]
struct Header {
    name: String,
    courses: usize,
    rooms: usize,
    days: usize,
    periods: usize,
    curricula: usize,
    min_daily: usize,
    max_daily: usize,
    unavailabilities: usize,
    room_constraints: usize,
}

impl Header {
    fn parse(lines: &[(usize, &str)]) -> Result<Self, ParseError> {
        let mut name = None;
        let mut counts: [Option<usize>; 7] = [None; 7];
        let mut daily = None;

        for &(line, text) in lines.iter().take_while(|(_, l)| !l.is_empty()) {
            let Some((key, value)) = text.split_once(':') else {
                return Err(ParseError::syntax(line, format!("expected 'Key: value', got '{text}'")));
            };
            let value = value.trim();
            let slot = match key.trim() {
                "Name" => {
                    name = Some(value.to_string());
                    continue;
                }
                "Min_Max_Daily_Lectures" => {
                    let fields = Fields::new(line, value);
                    fields.expect_len(2)?;
                    daily = Some((fields.number(0)?, fields.number(1)?));
                    continue;
                }
                "Courses" => 0,
                "Rooms" => 1,
                "Days" => 2,
                "Periods_per_day" => 3,
                "Curricula" => 4,
                "UnAvailability_Constraints" => 5,
                "RoomConstraints" => 6,
                other => {
                    return Err(ParseError::syntax(line, format!("unknown header field '{other}'")))
                }
            };
            counts[slot] = Some(parse_number(line, value)?);
        }

        let field = |slot: usize, label: &'static str| counts[slot].ok_or(ParseError::MissingHeader(label));
        let (min_daily, max_daily) = daily.ok_or(ParseError::MissingHeader("Min_Max_Daily_Lectures"))?;
        Ok(Self {
            name: name.ok_or(ParseError::MissingHeader("Name"))?,
            courses: field(0, "Courses")?,
            rooms: field(1, "Rooms")?,
            days: field(2, "Days")?,
            periods: field(3, "Periods_per_day")?,
            curricula: field(4, "Curricula")?,
            unavailabilities: field(5, "UnAvailability_Constraints")?,
            room_constraints: field(6, "RoomConstraints")?,
            min_daily,
            max_daily,
        })
    }
}

// Records between a section title and the next blank line.
fn section<'a>(
    lines: &[(usize, &'a str)],
    title: &'static str,
) -> Result<Vec<(usize, &'a str)>, ParseError> {
    let start = lines
        .iter()
        .position(|(_, l)| *l == title)
        .ok_or(ParseError::MissingSection(title))?;
    Ok(lines[start + 1..]
        .iter()
        .take_while(|(_, l)| !l.is_empty() && *l != "END.")
        .copied()
        .collect())
}

fn expect_count(section: &'static str, declared: usize, found: usize) -> Result<(), ParseError> {
    if declared == found {
        Ok(())
    } else {
        Err(ParseError::CountMismatch {
            section,
            declared,
            found,
        })
    }
}

fn parse_number<T: FromStr>(line: usize, token: &str) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::syntax(line, format!("expected a number, got '{token}'")))
}

struct Fields<'a> {
    line: usize,
    tokens: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(line: usize, record: &'a str) -> Self {
        Self {
            line,
            tokens: record.split_whitespace().collect(),
        }
    }

    fn expect_len(&self, len: usize) -> Result<(), ParseError> {
        if self.tokens.len() == len {
            Ok(())
        } else {
            Err(ParseError::syntax(
                self.line,
                format!("expected {len} fields, found {}", self.tokens.len()),
            ))
        }
    }

    fn str(&self, index: usize) -> &'a str {
        self.tokens[index]
    }

    fn number<T: FromStr>(&self, index: usize) -> Result<T, ParseError> {
        match self.tokens.get(index) {
            Some(token) => parse_number(self.line, token),
            None => Err(ParseError::syntax(self.line, format!("missing field {}", index + 1))),
        }
    }
}
