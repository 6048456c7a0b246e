//! Body weight entries.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use pagination::Sort;
use serde::{Deserialize, Serialize};

use super::records::{RecordData, RecordKind, TimedReading};
use super::UserLogin;

/// Validation errors returned by [`WeightEntry::new`].
#[derive(Debug, Clone, PartialEq)]
pub enum WeightValidationError {
    NotFinite,
    NonPositive { value: f64 },
}

impl fmt::Display for WeightValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite => write!(f, "weight must be a finite number"),
            Self::NonPositive { value } => write!(f, "weight must be positive, got {value}"),
        }
    }
}

impl std::error::Error for WeightValidationError {}

/// A body weight measurement.
///
/// The unit is not stored with the entry; clients render it using the
/// configured [`super::WeightUnits`] preference.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use health_points::domain::{UserLogin, WeightEntry};
///
/// let entry = WeightEntry::new(Utc::now(), 72.5, UserLogin::new("user").expect("login"))
///     .expect("valid entry");
/// assert_eq!(entry.weight(), 72.5);
/// assert!(WeightEntry::new(Utc::now(), f64::NAN, UserLogin::new("user").expect("login")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightEntryDto", into = "WeightEntryDto")]
pub struct WeightEntry {
    taken_at: DateTime<Utc>,
    weight: f64,
    user: UserLogin,
}

impl WeightEntry {
    /// Validate and construct an entry.
    pub fn new(
        taken_at: DateTime<Utc>,
        weight: f64,
        user: UserLogin,
    ) -> Result<Self, WeightValidationError> {
        if !weight.is_finite() {
            return Err(WeightValidationError::NotFinite);
        }
        if weight <= 0.0 {
            return Err(WeightValidationError::NonPositive { value: weight });
        }
        Ok(Self {
            taken_at,
            weight,
            user,
        })
    }

    /// Measured weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Owner of the entry.
    pub fn user(&self) -> &UserLogin {
        &self.user
    }
}

impl RecordData for WeightEntry {
    const KIND: RecordKind = RecordKind::Weight;
    const SORT_FIELDS: &'static [&'static str] = &["timestamp", "weight", "user"];

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
            "weight" => self.weight.total_cmp(&other.weight),
            "user" => self.user.cmp(&other.user),
            _ => Ordering::Equal,
        }
    }
}

impl TimedReading for WeightEntry {
    fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeightEntryDto {
    timestamp: DateTime<Utc>,
    weight: f64,
    user: UserLogin,
}

impl From<WeightEntry> for WeightEntryDto {
    fn from(value: WeightEntry) -> Self {
        Self {
            timestamp: value.taken_at,
            weight: value.weight,
            user: value.user,
        }
    }
}

impl TryFrom<WeightEntryDto> for WeightEntry {
    type Error = WeightValidationError;

    fn try_from(value: WeightEntryDto) -> Result<Self, Self::Error> {
        Self::new(value.timestamp, value.weight, value.user)
    }
}
