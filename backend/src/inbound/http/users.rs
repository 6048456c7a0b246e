//! Session API handlers.
//!
//! ```text
//! POST /api/authenticate {"username":"admin","password":"admin"}
//! POST /api/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/authenticate`.
///
/// Example JSON:
/// `{"username":"admin","password":"admin"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Authenticate a user and establish a session.
///
/// The session cookie stores the caller's login and authorities.
#[utoipa::path(
    post,
    path = "/api/authenticate",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["session"],
    operation_id = "authenticate",
    security([])
)]
#[post("/authenticate")]
pub async fn authenticate(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let caller = state.login.authenticate(&credentials).await?;
    session.persist_caller(&caller)?;
    Ok(HttpResponse::Ok().finish())
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cleared")
    ),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().finish()
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::InvalidUsername(inner) => {
            Error::invalid_request(format!("invalid username: {inner}"))
                .with_details(json!({ "field": "username", "code": "invalid_username" }))
        }
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

#[cfg(test)]
mod tests;
