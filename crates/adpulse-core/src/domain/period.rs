use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

use super::Day;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    from: Day,
    to: Day,
}

impl Period {
    pub fn new(from: Day, to: Day) -> Result<Self, ValidationError> {
        if to < from {
            return Err(ValidationError::InvalidRange {
                from: from.format_iso(),
                to: to.format_iso(),
            });
        }
        Ok(Self { from, to })
    }

    pub fn single(day: Day) -> Self {
        Self { from: day, to: day }
    }

    pub const fn from_day(&self) -> Day {
        self.from
    }

    pub const fn to_day(&self) -> Day {
        self.to
    }

    pub fn contains(&self, day: Day) -> bool {
        self.from <= day && day <= self.to
    }

    pub fn len_days(&self) -> u32 {
        (self.to.into_date().to_julian_day() - self.from.into_date().to_julian_day()) as u32 + 1
    }

    /// Ascending days of the period. Each call starts a fresh pass.
    pub fn days(&self) -> Days {
        Days {
            next: Some(self.from),
            last: self.to,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

/// Iterator over the days of a [`Period`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<Day>,
    last: Day,
}

impl Iterator for Days {
    type Item = Day;

    fn next(&mut self) -> Option<Day> {
        let current = self.next?;
        if current > self.last {
            self.next = None;
            return None;
        }
        self.next = current.next();
        Some(current)
    }
}
