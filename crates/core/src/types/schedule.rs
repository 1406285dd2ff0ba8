//! Date and time containment rules shared by itineraries and activities.
//!
//! An itinerary covers an inclusive [`DateRange`]; an activity occupies a
//! [`TimeSpan`] on a single calendar date that must fall inside its
//! itinerary's range when the activity is created.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Violations of the scheduling invariants.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// An itinerary ends before it starts.
    #[error("end date before start date")]
    EndDateBeforeStartDate,
    /// An activity ends before it starts.
    #[error("end time before start time")]
    EndTimeBeforeStartTime,
    /// An activity date lies outside its itinerary.
    #[error("activity date outside itinerary range")]
    DateOutsideRange,
}

/// An inclusive range of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `end < start`. A single-day range is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::EndDateBeforeStartDate`] if `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ScheduleError> {
        if end < start {
            return Err(ScheduleError::EndDateBeforeStartDate);
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, counting both ends.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether `date` falls on or between the first and last day.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Check that `date` falls inside the range.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::DateOutsideRange`] otherwise.
    pub fn ensure_contains(&self, date: NaiveDate) -> Result<(), ScheduleError> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(ScheduleError::DateOutsideRange)
        }
    }

    /// Starts on or after `as_of`.
    #[must_use]
    pub fn is_upcoming(&self, as_of: NaiveDate) -> bool {
        self.start >= as_of
    }

    /// Ended strictly before `as_of`.
    #[must_use]
    pub fn is_past(&self, as_of: NaiveDate) -> bool {
        self.end < as_of
    }
}

/// A start/end pair of local date-times with `start <= end`.
///
/// Zero-length spans are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeSpan {
    /// Build a span, rejecting `end < start`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::EndTimeBeforeStartTime`] if `end < start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ScheduleError> {
        if end < start {
            return Err(ScheduleError::EndTimeBeforeStartTime);
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }
}
