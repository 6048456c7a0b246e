//! Blood pressure readings.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use pagination::Sort;
use serde::{Deserialize, Serialize};

use super::records::{RecordData, RecordKind, TimedReading};
use super::UserLogin;

/// Validation errors returned by [`BloodPressure::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BloodPressureValidationError {
    NonPositiveSystolic { value: i32 },
    NonPositiveDiastolic { value: i32 },
}

impl fmt::Display for BloodPressureValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveSystolic { value } => {
                write!(f, "systolic must be positive, got {value}")
            }
            Self::NonPositiveDiastolic { value } => {
                write!(f, "diastolic must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for BloodPressureValidationError {}

/// A single blood pressure reading.
///
/// ## Invariants
/// - `systolic` and `diastolic` are strictly positive.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use health_points::domain::{BloodPressure, UserLogin};
///
/// let reading = BloodPressure::new(
///     Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap(),
///     120,
///     80,
///     UserLogin::new("user").expect("login"),
/// )
/// .expect("valid reading");
/// assert_eq!(reading.systolic(), 120);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BloodPressureDto", into = "BloodPressureDto")]
pub struct BloodPressure {
    taken_at: DateTime<Utc>,
    systolic: i32,
    diastolic: i32,
    user: UserLogin,
}

impl BloodPressure {
    /// Validate and construct a reading.
    pub fn new(
        taken_at: DateTime<Utc>,
        systolic: i32,
        diastolic: i32,
        user: UserLogin,
    ) -> Result<Self, BloodPressureValidationError> {
        if systolic <= 0 {
            return Err(BloodPressureValidationError::NonPositiveSystolic { value: systolic });
        }
        if diastolic <= 0 {
            return Err(BloodPressureValidationError::NonPositiveDiastolic { value: diastolic });
        }
        Ok(Self {
            taken_at,
            systolic,
            diastolic,
            user,
        })
    }

    /// Systolic pressure in mmHg.
    pub fn systolic(&self) -> i32 {
        self.systolic
    }

    /// Diastolic pressure in mmHg.
    pub fn diastolic(&self) -> i32 {
        self.diastolic
    }

    /// Owner of the reading.
    pub fn user(&self) -> &UserLogin {
        &self.user
    }
}

impl RecordData for BloodPressure {
    const KIND: RecordKind = RecordKind::BloodPressure;
    const SORT_FIELDS: &'static [&'static str] = &["timestamp", "systolic", "diastolic", "user"];

    fn default_sort() -> Sort {
        Sort::desc("timestamp")
    }

    fn owner(&self) -> Option<&UserLogin> {
        Some(&self.user)
    }

    fn assign_owner(&mut self, owner: UserLogin) {
        self.user = owner;
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "timestamp" => self.taken_at.cmp(&other.taken_at),
            "systolic" => self.systolic.cmp(&other.systolic),
            "diastolic" => self.diastolic.cmp(&other.diastolic),
            "user" => self.user.cmp(&other.user),
            _ => Ordering::Equal,
        }
    }
}

impl TimedReading for BloodPressure {
    fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BloodPressureDto {
    timestamp: DateTime<Utc>,
    systolic: i32,
    diastolic: i32,
    user: UserLogin,
}

impl From<BloodPressure> for BloodPressureDto {
    fn from(value: BloodPressure) -> Self {
        Self {
            timestamp: value.taken_at,
            systolic: value.systolic,
            diastolic: value.diastolic,
            user: value.user,
        }
    }
}

impl TryFrom<BloodPressureDto> for BloodPressure {
    type Error = BloodPressureValidationError;

    fn try_from(value: BloodPressureDto) -> Result<Self, Self::Error> {
        Self::new(value.timestamp, value.systolic, value.diastolic, value.user)
    }
}
