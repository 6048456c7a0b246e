//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed health records used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Keep types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - BloodPressure, WeightEntry, DailyPoints, Preference: record payloads.
//! - Record / RecordId / RecordKind: stored record envelope.
//! - Caller / Authority: explicit caller identity.
//! - RecordService, ReadingsWindowService, WeeklyPointsService: use-cases.

pub mod auth;
pub mod blood_pressure;
pub mod error;
pub mod points;
pub mod ports;
pub mod preference;
pub mod records;
pub mod records_service;
pub mod trace_id;
pub mod user;
pub mod weight;
pub mod window;
pub mod window_service;

pub use self::auth::{Authority, Caller, LoginCredentials, LoginValidationError, ParseAuthorityError};
pub use self::blood_pressure::{BloodPressure, BloodPressureValidationError};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::points::{DailyPoints, NOTES_MAX, PointsFlags, PointsValidationError};
pub use self::preference::{
    ParseWeightUnitsError, Preference, PreferenceValidationError, WEEKLY_GOAL_MAX,
    WEEKLY_GOAL_MIN, WeightUnits,
};
pub use self::records::{Record, RecordData, RecordId, RecordKind, TimedReading};
pub use self::records_service::RecordService;
pub use self::trace_id::TraceId;
pub use self::user::{UserLogin, UserValidationError};
pub use self::weight::{WeightEntry, WeightValidationError};
pub use self::window::{CalendarWeek, TrailingWindow, WeeklyPoints, WindowError, WindowSummary};
pub use self::window_service::{ReadingsWindowService, WeeklyPointsService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use health_points::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
