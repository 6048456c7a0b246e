//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the wire shape of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "A new weight cannot already have an ID")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "01HZY8B2W6X5Y7Z9ABCD1234")]
    trace_id: Option<String>,
    /// Supplementary error details such as `field`, `entityName`, or `errorKey`.
    details: Option<serde_json::Value>,
}

/// Stored blood pressure reading.
#[derive(ToSchema)]
#[schema(as = BloodPressureRecord)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BloodPressureSchema {
    #[schema(example = 1)]
    id: i64,
    /// RFC 3339 instant the reading was taken.
    #[schema(value_type = String, format = DateTime, example = "2026-03-01T08:30:00Z")]
    timestamp: String,
    #[schema(example = 120)]
    systolic: i32,
    #[schema(example = 80)]
    diastolic: i32,
    #[schema(example = "user")]
    user: String,
}

/// Stored weight entry.
#[derive(ToSchema)]
#[schema(as = WeightRecord)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct WeightSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(value_type = String, format = DateTime, example = "2026-03-01T07:00:00Z")]
    timestamp: String,
    #[schema(example = 72.5)]
    weight: f64,
    #[schema(example = "user")]
    user: String,
}

/// Stored daily points.
#[derive(ToSchema)]
#[schema(as = PointsRecord)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PointsSchema {
    #[schema(example = 1)]
    id: i64,
    /// Calendar day as `YYYY-MM-DD`.
    #[schema(value_type = String, format = Date, example = "2026-03-02")]
    date: String,
    #[schema(minimum = 0, maximum = 1, example = 1)]
    exercise: u8,
    #[schema(minimum = 0, maximum = 1, example = 1)]
    meals: u8,
    #[schema(minimum = 0, maximum = 1, example = 0)]
    alcohol: u8,
    #[schema(max_length = 140)]
    notes: Option<String>,
    #[schema(example = "user")]
    user: String,
}

/// Stored preferences.
#[derive(ToSchema)]
#[schema(as = PreferenceRecord)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PreferenceSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(minimum = 10, maximum = 21, example = 15)]
    weekly_goal: Option<u8>,
    /// `kg` or `lb`.
    #[schema(example = "kg")]
    weight_units: String,
}

/// Blood pressure readings inside a trailing window.
#[derive(ToSchema)]
#[schema(as = BloodPressureByDays)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BloodPressureWindowSchema {
    #[schema(example = "Last 30 Days")]
    period: String,
    readings: Vec<BloodPressureSchema>,
}

/// Weight entries inside a trailing window.
#[derive(ToSchema)]
#[schema(as = WeightByDays)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct WeightWindowSchema {
    #[schema(example = "Last 30 Days")]
    period: String,
    readings: Vec<WeightSchema>,
}

/// OpenAPI schema for [`crate::domain::WeeklyPoints`].
#[derive(ToSchema)]
#[schema(as = crate::domain::WeeklyPoints)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct WeeklyPointsSchema {
    /// Monday of the current week.
    #[schema(value_type = String, format = Date, example = "2026-03-02")]
    week: String,
    #[schema(example = 5)]
    points: u32,
}
