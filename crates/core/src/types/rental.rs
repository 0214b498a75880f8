//! Rental period dates and day-count arithmetic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from rental period construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RentalPeriodError {
    /// The end date precedes the start date.
    #[error("rental end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// An inclusive rental date range.
///
/// Both endpoints count as rental days: a rental that starts and ends on
/// the same date is one day long. Construction enforces `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct RentalPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawPeriod> for RentalPeriod {
    type Error = RentalPeriodError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl RentalPeriod {
    /// Create a period from start and end dates (both inclusive).
    ///
    /// # Errors
    ///
    /// Returns [`RentalPeriodError::EndBeforeStart`] if `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RentalPeriodError> {
        if end < start {
            return Err(RentalPeriodError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// The first rental day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last rental day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of billable days, counting both endpoints.
    #[must_use]
    pub fn days(&self) -> u32 {
        // new() guarantees end >= start, so the difference is non-negative
        u32::try_from((self.end - self.start).num_days() + 1).unwrap_or(u32::MAX)
    }
}

impl std::fmt::Display for RentalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
