//! Calendar arithmetic for windowed queries.
//!
//! Pure functions only: callers supply "now" from an injected clock so the
//! calculations stay deterministic under test.

use std::fmt;

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};

use super::records::{Record, TimedReading};
use super::{DailyPoints, UserLogin};

/// Reasons a window cannot be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The requested number of days was negative.
    NegativeDays { days: i64 },
    /// The shifted local time leaves the supported range.
    Unrepresentable { days: i64 },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeDays { days } => write!(f, "days must not be negative, got {days}"),
            Self::Unrepresentable { days } => {
                write!(f, "cannot compute a window of {days} days from the current time")
            }
        }
    }
}

impl std::error::Error for WindowError {}

/// Closed interval `[now - days, now]` in calendar days of the local zone.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use health_points::domain::TrailingWindow;
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 31, 9, 0, 0).unwrap();
/// let window = TrailingWindow::ending_at(now, 30).expect("valid window");
/// assert_eq!(window.start(), Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
/// assert_eq!(window.label(), "Last 30 Days");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    days: u64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TrailingWindow {
    /// Compute the window ending at `now`.
    ///
    /// The start keeps the local time of day, so a window crossing a
    /// daylight-saving change is not a multiple of 24 hours. A start inside
    /// a repeated hour takes the earlier instant; a start inside a skipped
    /// hour moves forward by the length of the gap.
    pub fn ending_at<Tz: TimeZone>(now: DateTime<Tz>, days: i64) -> Result<Self, WindowError> {
        let span = u64::try_from(days).map_err(|_| WindowError::NegativeDays { days })?;
        let local_start = now
            .naive_local()
            .checked_sub_days(Days::new(span))
            .ok_or(WindowError::Unrepresentable { days })?;
        let start = resolve_local(&now.timezone(), local_start)
            .ok_or(WindowError::Unrepresentable { days })?;
        Ok(Self {
            days: span,
            start,
            end: now.with_timezone(&Utc),
        })
    }

    /// Number of days covered.
    pub fn days(&self) -> u64 {
        self.days
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Inclusive upper bound.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Human-readable period label.
    pub fn label(&self) -> String {
        format!("Last {} Days", self.days)
    }

    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Map a local wall-clock time onto an instant.
///
/// Gaps are resolved with the offset in force a day earlier, which lands the
/// instant just past the transition.
fn resolve_local<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let before = local.checked_sub_signed(TimeDelta::days(1))?;
            let offset = zone.offset_from_utc_datetime(&before).fix();
            let utc = local.checked_sub_signed(TimeDelta::seconds(i64::from(
                offset.local_minus_utc(),
            )))?;
            Some(utc.and_utc())
        }
    }
}

/// Monday-to-Sunday span containing a given day.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use health_points::domain::CalendarWeek;
///
/// let thursday = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
/// let week = CalendarWeek::containing(thursday);
/// assert_eq!(week.start(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
/// assert_eq!(week.end(), NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWeek {
    start: NaiveDate,
    end: NaiveDate,
}

impl CalendarWeek {
    /// The week containing `day`.
    pub fn containing(day: NaiveDate) -> Self {
        let back = u64::from(day.weekday().num_days_from_monday());
        let start = day - Days::new(back);
        Self {
            start,
            end: start + Days::new(6),
        }
    }

    /// Monday of the week.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday of the week.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `day` falls inside the week.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Readings inside a trailing window, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary<T> {
    /// Period label, such as `Last 30 Days`.
    pub period: String,
    /// Matching readings.
    pub readings: Vec<T>,
}

/// Point total for the current week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPoints {
    /// Monday of the week.
    pub week: NaiveDate,
    /// Sum of all points earned that week.
    pub points: u32,
}

/// Keep the readings owned by `owner` inside `window`, newest first.
pub fn readings_in_window<T: TimedReading>(
    window: &TrailingWindow,
    owner: &UserLogin,
    readings: Vec<Record<T>>,
) -> Vec<Record<T>> {
    let mut kept: Vec<Record<T>> = readings
        .into_iter()
        .filter(|record| record.is_owned_by(owner) && window.contains(record.data.taken_at()))
        .collect();
    kept.sort_by(|a, b| b.data.taken_at().cmp(&a.data.taken_at()));
    kept
}

/// Sum the points `owner` earned during `week`.
pub fn weekly_total(week: &CalendarWeek, owner: &UserLogin, points: &[Record<DailyPoints>]) -> u32 {
    points
        .iter()
        .filter(|record| record.is_owned_by(owner) && week.contains(record.data.date()))
        .map(|record| record.data.total())
        .sum()
}
