//! Shared validation helpers for inbound HTTP adapters.
//!
//! Entity failures carry `entityName` and `errorKey` in their details so the
//! error responder can attach the alert headers; field failures add the
//! offending `field`, `value`, and a stable `code`.

use actix_web::error::JsonPayloadError;
use actix_web::web;
use pagination::{PageParams, PageRequest, PaginationError};
use serde_json::{Value, json};

use crate::domain::{Error, RecordKind};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    OutOfRange,
    Required,
    MalformedPayload,
    TooLong,
    InvalidLogin,
    InvalidPageSize,
    InvalidSort,
    UnknownSortField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::Required => "required",
            ErrorCode::MalformedPayload => "malformed_payload",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidLogin => "invalid_login",
            ErrorCode::InvalidPageSize => "invalid_page_size",
            ErrorCode::InvalidSort => "invalid_sort",
            ErrorCode::UnknownSortField => "unknown_sort_field",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Error keyed to an entity, rendered as `error.<error_key>` in alerts.
pub(crate) fn entity_error(kind: RecordKind, error_key: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "entityName": kind.entity_name(),
        "errorKey": error_key,
    }))
}

/// Error for a create request that already carries an id.
pub(crate) fn id_exists_error(kind: RecordKind) -> Error {
    entity_error(
        kind,
        "idexists",
        format!("A new {} cannot already have an ID", kind.entity_name()),
    )
}

/// Error for a single rejected field of an entity payload.
pub(crate) fn field_error(
    kind: RecordKind,
    field: FieldName,
    code: ErrorCode,
    value: Value,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "entityName": kind.entity_name(),
        "errorKey": "validation",
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Error for a request body the JSON extractor could not decode.
///
/// The entity is taken from the last segment of `path` when it names a
/// record collection.
pub(crate) fn malformed_payload(error: &JsonPayloadError, path: &str) -> Error {
    let message = format!("malformed request body: {error}");
    let kind = path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .and_then(RecordKind::from_collection_path);
    let details = match kind {
        Some(kind) => json!({
            "entityName": kind.entity_name(),
            "errorKey": "validation",
            "code": ErrorCode::MalformedPayload.as_str(),
        }),
        None => json!({ "code": ErrorCode::MalformedPayload.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

/// JSON extractor settings that report decoding failures as structured
/// validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|error, request| malformed_payload(&error, request.path()).into())
}

fn pagination_error(error: PaginationError) -> Error {
    let (value, code) = match &error {
        PaginationError::InvalidSize { size, .. } => (json!(size), ErrorCode::InvalidPageSize),
        PaginationError::InvalidSort { value } => (json!(value), ErrorCode::InvalidSort),
        PaginationError::UnknownSortField { field } => (json!(field), ErrorCode::UnknownSortField),
    };
    let field = match code {
        ErrorCode::InvalidPageSize => "size",
        _ => "sort",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "value": value,
        "code": code.as_str(),
    }))
}

/// Validate raw list query parameters.
pub(crate) fn page_request(params: PageParams) -> Result<PageRequest, Error> {
    PageRequest::try_from(params).map_err(pagination_error)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn id_exists_names_the_entity() {
        let err = id_exists_error(RecordKind::Weight);
        assert_eq!(err.message(), "A new weight cannot already have an ID");
        assert_eq!(
            err.details(),
            Some(&json!({"entityName": "weight", "errorKey": "idexists"}))
        );
    }

    #[rstest]
    fn field_errors_carry_field_context() {
        let err = field_error(
            RecordKind::Preference,
            FieldName::new("weeklyGoal"),
            ErrorCode::OutOfRange,
            json!(9),
            "weekly goal out of range",
        );
        let details = err.details().expect("details");
        assert_eq!(details["field"], "weeklyGoal");
        assert_eq!(details["value"], 9);
        assert_eq!(details["code"], "out_of_range");
        assert_eq!(details["errorKey"], "validation");
    }

    #[rstest]
    #[case(Some(0), None, "size", "invalid_page_size")]
    #[case(None, Some("date,sideways"), "sort", "invalid_sort")]
    fn bad_page_params_are_rejected(
        #[case] size: Option<u32>,
        #[case] sort: Option<&str>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = page_request(PageParams {
            page: None,
            size,
            sort: sort.map(str::to_owned),
        })
        .expect_err("invalid params");
        let details = err.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }

    #[rstest]
    #[case("/api/preferences", Some("preference"))]
    #[case("/api/blood-pressures", Some("bloodPressure"))]
    #[case("/api/authenticate", None)]
    fn malformed_bodies_name_the_collection(#[case] path: &str, #[case] entity: Option<&str>) {
        let err = malformed_payload(&JsonPayloadError::ContentType, path);
        let details = err.details().expect("details");
        assert_eq!(details["code"], "malformed_payload");
        assert_eq!(details.get("entityName").and_then(Value::as_str), entity);
    }

    #[rstest]
    fn default_page_params_are_accepted() {
        let request = page_request(PageParams::default()).expect("defaults");
        assert_eq!(request, PageRequest::default());
    }
}
