//! Daily points: one record per day of exercise, meal, and alcohol compliance.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use pagination::Sort;
use serde::{Deserialize, Serialize};

use super::records::{RecordData, RecordKind};
use super::UserLogin;

/// Largest value a single compliance flag may hold.
pub const MAX_FLAG_POINTS: u8 = 1;
/// Maximum length of the free-text notes.
pub const NOTES_MAX: usize = 140;

/// Validation errors returned by [`DailyPoints::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointsValidationError {
    FlagOutOfRange { field: &'static str, value: u8 },
    NotesTooLong { max: usize },
}

impl fmt::Display for PointsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlagOutOfRange { field, value } => {
                write!(f, "{field} must be 0 or {MAX_FLAG_POINTS}, got {value}")
            }
            Self::NotesTooLong { max } => write!(f, "notes must be at most {max} characters"),
        }
    }
}

impl std::error::Error for PointsValidationError {}

/// Compliance flags earned on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointsFlags {
    /// Exercised today.
    pub exercise: u8,
    /// Ate well today.
    pub meals: u8,
    /// Stayed off alcohol today.
    pub alcohol: u8,
}

impl PointsFlags {
    /// All three flags earned.
    pub const fn all() -> Self {
        Self {
            exercise: 1,
            meals: 1,
            alcohol: 1,
        }
    }

    fn validate(self) -> Result<Self, PointsValidationError> {
        for (field, value) in [
            ("exercise", self.exercise),
            ("meals", self.meals),
            ("alcohol", self.alcohol),
        ] {
            if value > MAX_FLAG_POINTS {
                return Err(PointsValidationError::FlagOutOfRange { field, value });
            }
        }
        Ok(self)
    }

    /// Sum of the flags.
    pub fn total(self) -> u32 {
        u32::from(self.exercise) + u32::from(self.meals) + u32::from(self.alcohol)
    }
}

/// Points earned by a user on a calendar day.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use health_points::domain::{DailyPoints, PointsFlags, UserLogin};
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).expect("date");
/// let points = DailyPoints::new(day, PointsFlags::all(), None, UserLogin::new("user").expect("login"))
///     .expect("valid points");
/// assert_eq!(points.total(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DailyPointsDto", into = "DailyPointsDto")]
pub struct DailyPoints {
    date: NaiveDate,
    flags: PointsFlags,
    notes: Option<String>,
    user: UserLogin,
}

impl DailyPoints {
    /// Validate and construct a day's points.
    pub fn new(
        date: NaiveDate,
        flags: PointsFlags,
        notes: Option<String>,
        user: UserLogin,
    ) -> Result<Self, PointsValidationError> {
        let flags = flags.validate()?;
        if notes
            .as_deref()
            .is_some_and(|text| text.chars().count() > NOTES_MAX)
        {
            return Err(PointsValidationError::NotesTooLong { max: NOTES_MAX });
        }
        Ok(Self {
            date,
            flags,
            notes,
            user,
        })
    }

    /// Day the points were earned.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Individual compliance flags.
    pub fn flags(&self) -> PointsFlags {
        self.flags
    }

    /// Free-text notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Owner of the record.
    pub fn user(&self) -> &UserLogin {
        &self.user
    }

    /// `exercise + meals + alcohol`.
    pub fn total(&self) -> u32 {
        self.flags.total()
    }
}

impl RecordData for DailyPoints {
    const KIND: RecordKind = RecordKind::Points;
    const SORT_FIELDS: &'static [&'static str] =
        &["date", "exercise", "meals", "alcohol", "user"];

    fn default_sort() -> Sort {
        Sort::desc("date")
    }

    fn owner(&self) -> Option<&UserLogin> {
        Some(&self.user)
    }

    fn assign_owner(&mut self, owner: UserLogin) {
        self.user = owner;
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "date" => self.date.cmp(&other.date),
            "exercise" => self.flags.exercise.cmp(&other.flags.exercise),
            "meals" => self.flags.meals.cmp(&other.flags.meals),
            "alcohol" => self.flags.alcohol.cmp(&other.flags.alcohol),
            "user" => self.user.cmp(&other.user),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DailyPointsDto {
    date: NaiveDate,
    exercise: u8,
    meals: u8,
    alcohol: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    user: UserLogin,
}

impl From<DailyPoints> for DailyPointsDto {
    fn from(value: DailyPoints) -> Self {
        Self {
            date: value.date,
            exercise: value.flags.exercise,
            meals: value.flags.meals,
            alcohol: value.flags.alcohol,
            notes: value.notes,
            user: value.user,
        }
    }
}

impl TryFrom<DailyPointsDto> for DailyPoints {
    type Error = PointsValidationError;

    fn try_from(value: DailyPointsDto) -> Result<Self, Self::Error> {
        let flags = PointsFlags {
            exercise: value.exercise,
            meals: value.meals,
            alcohol: value.alcohol,
        };
        Self::new(value.date, flags, value.notes, value.user)
    }
}
