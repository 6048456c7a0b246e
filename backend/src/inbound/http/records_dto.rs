//! Request payloads for the record endpoints.
//!
//! Payloads arrive with an optional `id` and an optional `user`. The id
//! decides between create and update. A missing user defaults to the caller
//! on create and to the stored owner on update.
//! Parsing maps domain validation failures onto field errors so clients see
//! which attribute was rejected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    BloodPressure, BloodPressureValidationError, DailyPoints, Error, PointsFlags,
    PointsValidationError, Preference, PreferenceValidationError, RecordData, RecordId,
    UserLogin, WEEKLY_GOAL_MAX, WEEKLY_GOAL_MIN, WeightEntry, WeightUnits,
    WeightValidationError,
};
use crate::inbound::http::validation::{ErrorCode, FieldName, field_error};

/// Conversion from a request payload into a domain record payload.
pub trait RecordPayload: Send + 'static {
    /// Domain payload the request describes.
    type Data: RecordData;

    /// Identifier supplied by the client, if any.
    fn id(&self) -> Option<RecordId>;

    /// Validate the payload, owning it by `default_owner` when no user is named.
    fn into_data(self, default_owner: &UserLogin) -> Result<Self::Data, Error>;
}

fn parse_owner<T: RecordData>(
    user: Option<String>,
    default_owner: &UserLogin,
) -> Result<UserLogin, Error> {
    match user {
        None => Ok(default_owner.clone()),
        Some(raw) => UserLogin::new(raw.as_str()).map_err(|err| {
            field_error(
                T::KIND,
                FieldName::new("user"),
                ErrorCode::InvalidLogin,
                json!(raw),
                err.to_string(),
            )
        }),
    }
}

/// Blood pressure reading payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BloodPressureRequest {
    /// Present when replacing an existing reading.
    pub id: Option<i64>,
    #[schema(value_type = String, format = DateTime, example = "2026-03-01T08:30:00Z")]
    pub timestamp: DateTime<Utc>,
    #[schema(example = 120)]
    pub systolic: i32,
    #[schema(example = 80)]
    pub diastolic: i32,
    /// Owner login; defaults to the caller.
    pub user: Option<String>,
}

impl RecordPayload for BloodPressureRequest {
    type Data = BloodPressure;

    fn id(&self) -> Option<RecordId> {
        self.id.map(RecordId::new)
    }

    fn into_data(self, default_owner: &UserLogin) -> Result<BloodPressure, Error> {
        let owner = parse_owner::<BloodPressure>(self.user, default_owner)?;
        BloodPressure::new(self.timestamp, self.systolic, self.diastolic, owner).map_err(|err| {
            let (field, value) = match err {
                BloodPressureValidationError::NonPositiveSystolic { value } => ("systolic", value),
                BloodPressureValidationError::NonPositiveDiastolic { value } => {
                    ("diastolic", value)
                }
            };
            field_error(
                BloodPressure::KIND,
                FieldName::new(field),
                ErrorCode::OutOfRange,
                json!(value),
                err.to_string(),
            )
        })
    }
}

/// Weight entry payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WeightRequest {
    /// Present when replacing an existing entry.
    pub id: Option<i64>,
    #[schema(value_type = String, format = DateTime, example = "2026-03-01T07:00:00Z")]
    pub timestamp: DateTime<Utc>,
    #[schema(example = 72.5)]
    pub weight: f64,
    /// Owner login; defaults to the caller.
    pub user: Option<String>,
}

impl RecordPayload for WeightRequest {
    type Data = WeightEntry;

    fn id(&self) -> Option<RecordId> {
        self.id.map(RecordId::new)
    }

    fn into_data(self, default_owner: &UserLogin) -> Result<WeightEntry, Error> {
        let owner = parse_owner::<WeightEntry>(self.user, default_owner)?;
        let weight = self.weight;
        WeightEntry::new(self.timestamp, weight, owner).map_err(|err: WeightValidationError| {
            field_error(
                WeightEntry::KIND,
                FieldName::new("weight"),
                ErrorCode::OutOfRange,
                // NaN and infinities have no JSON form and serialise as null.
                json!(weight),
                err.to_string(),
            )
        })
    }
}

/// Daily points payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PointsRequest {
    /// Present when replacing an existing record.
    pub id: Option<i64>,
    #[schema(value_type = String, format = Date, example = "2026-03-02")]
    pub date: NaiveDate,
    #[schema(minimum = 0, maximum = 1)]
    pub exercise: i64,
    #[schema(minimum = 0, maximum = 1)]
    pub meals: i64,
    #[schema(minimum = 0, maximum = 1)]
    pub alcohol: i64,
    #[schema(max_length = 140)]
    #[serde(default)]
    pub notes: Option<String>,
    /// Owner login; defaults to the caller.
    pub user: Option<String>,
}

impl RecordPayload for PointsRequest {
    type Data = DailyPoints;

    fn id(&self) -> Option<RecordId> {
        self.id.map(RecordId::new)
    }

    fn into_data(self, default_owner: &UserLogin) -> Result<DailyPoints, Error> {
        let owner = parse_owner::<DailyPoints>(self.user, default_owner)?;
        let flags = PointsFlags {
            exercise: narrow_flag("exercise", self.exercise)?,
            meals: narrow_flag("meals", self.meals)?,
            alcohol: narrow_flag("alcohol", self.alcohol)?,
        };
        let notes_len = self.notes.as_deref().map(|text| text.chars().count());
        DailyPoints::new(self.date, flags, self.notes, owner).map_err(|err| {
            let (field, code, value) = match err {
                PointsValidationError::FlagOutOfRange { field, value } => {
                    (field, ErrorCode::OutOfRange, json!(value))
                }
                PointsValidationError::NotesTooLong { .. } => {
                    ("notes", ErrorCode::TooLong, json!(notes_len))
                }
            };
            field_error(
                DailyPoints::KIND,
                FieldName::new(field),
                code,
                value,
                err.to_string(),
            )
        })
    }
}

fn narrow_flag(field: &'static str, value: i64) -> Result<u8, Error> {
    u8::try_from(value).map_err(|_| {
        field_error(
            DailyPoints::KIND,
            FieldName::new(field),
            ErrorCode::OutOfRange,
            json!(value),
            format!("{field} must be 0 or 1, got {value}"),
        )
    })
}

fn weekly_goal_out_of_range(value: i64, message: String) -> Error {
    field_error(
        Preference::KIND,
        FieldName::new("weeklyGoal"),
        ErrorCode::OutOfRange,
        json!(value),
        message,
    )
}

/// Preferences payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRequest {
    /// Present when replacing existing preferences.
    pub id: Option<i64>,
    #[schema(minimum = 10, maximum = 21, example = 15)]
    #[serde(default)]
    pub weekly_goal: Option<i64>,
    #[schema(value_type = String, example = "kg")]
    #[serde(default)]
    pub weight_units: Option<WeightUnits>,
}

impl RecordPayload for PreferenceRequest {
    type Data = Preference;

    fn id(&self) -> Option<RecordId> {
        self.id.map(RecordId::new)
    }

    fn into_data(self, _default_owner: &UserLogin) -> Result<Preference, Error> {
        let units = self.weight_units.ok_or_else(|| {
            field_error(
                Preference::KIND,
                FieldName::new("weightUnits"),
                ErrorCode::Required,
                json!(null),
                "weight units are required",
            )
        })?;
        let goal = self
            .weekly_goal
            .map(|goal| {
                u8::try_from(goal).map_err(|_| {
                    weekly_goal_out_of_range(
                        goal,
                        format!(
                            "weekly goal must be between {WEEKLY_GOAL_MIN} and {WEEKLY_GOAL_MAX}, got {goal}"
                        ),
                    )
                })
            })
            .transpose()?;
        Preference::new(goal, units).map_err(|err| {
            let PreferenceValidationError::WeeklyGoalOutOfRange { value } = err;
            weekly_goal_out_of_range(i64::from(value), err.to_string())
        })
    }
}
