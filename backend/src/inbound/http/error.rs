//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Entity validation failures also carry the alert headers clients use
//! to render form errors.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::Value;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Header naming the failed validation as `error.<errorKey>`.
pub const ERROR_HEADER: &str = "X-HealthPoints-Error";

/// Header carrying the parameter of an alert or error.
pub const PARAMS_HEADER: &str = "X-HealthPoints-Params";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

/// Entity name and error key carried by an entity validation failure.
fn failure_alert(error: &Error) -> Option<(&str, &str)> {
    let details = error.details()?;
    let entity = details.get("entityName").and_then(Value::as_str)?;
    let key = details.get("errorKey").and_then(Value::as_str)?;
    Some((entity, key))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if let Some((entity, key)) = failure_alert(self) {
            builder.insert_header((ERROR_HEADER, format!("error.{key}")));
            builder.insert_header((PARAMS_HEADER, entity.to_owned()));
        }
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), details = ?self.details(), "internal error");
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
