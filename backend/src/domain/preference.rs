//! Application preferences: weekly points goal and weight units.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use pagination::Sort;
use serde::{Deserialize, Serialize};

use super::records::{RecordData, RecordKind};
use super::UserLogin;

/// Smallest accepted weekly goal.
pub const WEEKLY_GOAL_MIN: u8 = 10;
/// Largest accepted weekly goal.
pub const WEEKLY_GOAL_MAX: u8 = 21;

/// Unit in which weights are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnits {
    /// Kilograms.
    Kg,
    /// Pounds.
    Lb,
}

impl WeightUnits {
    /// Return the wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }
}

impl fmt::Display for WeightUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown weight unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWeightUnitsError {
    input: String,
}

impl fmt::Display for ParseWeightUnitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown weight units: {}", self.input)
    }
}

impl std::error::Error for ParseWeightUnitsError {}

impl FromStr for WeightUnits {
    type Err = ParseWeightUnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(Self::Kg),
            "lb" => Ok(Self::Lb),
            other => Err(ParseWeightUnitsError {
                input: other.to_owned(),
            }),
        }
    }
}

/// Validation errors returned by [`Preference::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceValidationError {
    WeeklyGoalOutOfRange { value: u8 },
}

impl fmt::Display for PreferenceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeeklyGoalOutOfRange { value } => write!(
                f,
                "weekly goal must be between {WEEKLY_GOAL_MIN} and {WEEKLY_GOAL_MAX}, got {value}"
            ),
        }
    }
}

impl std::error::Error for PreferenceValidationError {}

/// Preferences shared by all users of an installation.
///
/// ## Invariants
/// - `weekly_goal`, when set, lies in `10..=21`.
///
/// # Examples
/// ```
/// use health_points::domain::{Preference, WeightUnits};
///
/// assert!(Preference::new(Some(10), WeightUnits::Kg).is_ok());
/// assert!(Preference::new(Some(22), WeightUnits::Kg).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PreferenceDto", into = "PreferenceDto")]
pub struct Preference {
    weekly_goal: Option<u8>,
    weight_units: WeightUnits,
}

impl Preference {
    /// Validate and construct preferences.
    pub fn new(
        weekly_goal: Option<u8>,
        weight_units: WeightUnits,
    ) -> Result<Self, PreferenceValidationError> {
        if let Some(value) = weekly_goal.filter(|goal| !(WEEKLY_GOAL_MIN..=WEEKLY_GOAL_MAX).contains(goal)) {
            return Err(PreferenceValidationError::WeeklyGoalOutOfRange { value });
        }
        Ok(Self {
            weekly_goal,
            weight_units,
        })
    }

    /// Weekly points goal.
    pub fn weekly_goal(&self) -> Option<u8> {
        self.weekly_goal
    }

    /// Preferred weight unit.
    pub fn weight_units(&self) -> WeightUnits {
        self.weight_units
    }
}

impl RecordData for Preference {
    const KIND: RecordKind = RecordKind::Preference;
    const SORT_FIELDS: &'static [&'static str] = &["weeklyGoal", "weightUnits"];

    fn default_sort() -> Sort {
        Sort::asc("id")
    }

    fn owner(&self) -> Option<&UserLogin> {
        None
    }

    fn assign_owner(&mut self, _owner: UserLogin) {}

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "weeklyGoal" => self.weekly_goal.cmp(&other.weekly_goal),
            "weightUnits" => self.weight_units.cmp(&other.weight_units),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreferenceDto {
    #[serde(default)]
    weekly_goal: Option<u8>,
    weight_units: WeightUnits,
}

impl From<Preference> for PreferenceDto {
    fn from(value: Preference) -> Self {
        Self {
            weekly_goal: value.weekly_goal,
            weight_units: value.weight_units,
        }
    }
}

impl TryFrom<PreferenceDto> for Preference {
    type Error = PreferenceValidationError;

    fn try_from(value: PreferenceDto) -> Result<Self, Self::Error> {
        Self::new(value.weekly_goal, value.weight_units)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Some(10), true)]
    #[case(Some(21), true)]
    #[case(Some(9), false)]
    #[case(Some(22), false)]
    #[case(None, true)]
    fn weekly_goal_bounds(#[case] goal: Option<u8>, #[case] accepted: bool) {
        assert_eq!(Preference::new(goal, WeightUnits::Lb).is_ok(), accepted);
    }

    #[rstest]
    #[case("kg", WeightUnits::Kg)]
    #[case("lb", WeightUnits::Lb)]
    fn weight_units_parse(#[case] raw: &str, #[case] expected: WeightUnits) {
        assert_eq!(raw.parse::<WeightUnits>().expect("known unit"), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    fn unknown_units_are_rejected() {
        let err = "stone".parse::<WeightUnits>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown weight units: stone");
    }

    #[rstest]
    fn serialises_camel_case() {
        let preference = Preference::new(Some(14), WeightUnits::Kg).expect("valid");
        let value = serde_json::to_value(&preference).expect("serialise");
        assert_eq!(value, json!({ "weeklyGoal": 14, "weightUnits": "kg" }));
    }

    #[rstest]
    fn deserialisation_rejects_out_of_range_goal() {
        let err = serde_json::from_value::<Preference>(json!({
            "weeklyGoal": 30,
            "weightUnits": "lb",
        }))
        .expect_err("goal out of range");
        assert!(err.to_string().contains("weekly goal must be between"));
    }
}
