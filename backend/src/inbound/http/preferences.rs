//! Preferences HTTP handlers.
//!
//! Preferences are shared by every user of an installation.
//!
//! ```text
//! POST /api/preferences
//! PUT /api/preferences
//! GET /api/preferences?page=0&size=20&sort=id,asc
//! GET /api/preferences/{id}
//! DELETE /api/preferences/{id}
//! GET /api/_search/preferences/{query}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::PageParams;

use crate::domain::{Preference, Record};
use crate::inbound::http::ApiResult;
use crate::inbound::http::records;
use crate::inbound::http::records_dto::PreferenceRequest;
use crate::inbound::http::schemas::{ErrorSchema, PreferenceSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Store a new set of preferences.
#[utoipa::path(
    post,
    path = "/api/preferences",
    request_body = PreferenceRequest,
    responses(
        (
            status = 201,
            description = "Preferences created",
            headers(
                ("Location" = String, description = "URI of the new preferences"),
                ("X-HealthPoints-Alert" = String, description = "Alert key")
            ),
            body = PreferenceSchema
        ),
        (status = 400, description = "Invalid preferences or id already set", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["preferences"],
    operation_id = "createPreference"
)]
#[post("/preferences")]
pub async fn create_preference(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PreferenceRequest>,
) -> ApiResult<HttpResponse> {
    records::create(&state, &session, payload.into_inner()).await
}

/// Replace preferences, creating them when no id is supplied.
#[utoipa::path(
    put,
    path = "/api/preferences",
    request_body = PreferenceRequest,
    responses(
        (status = 200, description = "Preferences updated", body = PreferenceSchema),
        (status = 201, description = "Preferences created", body = PreferenceSchema),
        (status = 400, description = "Invalid preferences", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Preferences not found", body = ErrorSchema)
    ),
    tags = ["preferences"],
    operation_id = "updatePreference"
)]
#[put("/preferences")]
pub async fn update_preference(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PreferenceRequest>,
) -> ApiResult<HttpResponse> {
    records::update(&state, &session, payload.into_inner()).await
}

/// List stored preferences.
#[utoipa::path(
    get,
    path = "/api/preferences",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size, at most 100"),
        ("sort" = Option<String>, Query, description = "`field,asc|desc`; fields: weeklyGoal, weightUnits")
    ),
    responses(
        (
            status = 200,
            description = "One page of preferences",
            headers(
                ("X-Total-Count" = u64, description = "Total number of preferences"),
                ("Link" = String, description = "RFC 5988 navigation links")
            ),
            body = [PreferenceSchema]
        ),
        (status = 400, description = "Invalid pagination parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["preferences"],
    operation_id = "listPreferences"
)]
#[get("/preferences")]
pub async fn list_preferences(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    records::list::<Preference>(&state, &session, &req, params.into_inner()).await
}

/// Fetch one set of preferences.
#[utoipa::path(
    get,
    path = "/api/preferences/{id}",
    params(("id" = i64, Path, description = "Preferences identifier")),
    responses(
        (status = 200, description = "Preferences", body = PreferenceSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such preferences")
    ),
    tags = ["preferences"],
    operation_id = "getPreference"
)]
#[get("/preferences/{id}")]
pub async fn get_preference(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    records::get::<Preference>(&state, &session, id.into_inner()).await
}

/// Delete one set of preferences.
#[utoipa::path(
    delete,
    path = "/api/preferences/{id}",
    params(("id" = i64, Path, description = "Preferences identifier")),
    responses(
        (status = 200, description = "Preferences deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such preferences")
    ),
    tags = ["preferences"],
    operation_id = "deletePreference"
)]
#[delete("/preferences/{id}")]
pub async fn delete_preference(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    records::delete::<Preference>(&state, &session, id.into_inner()).await
}

/// Free-text search over preferences.
#[utoipa::path(
    get,
    path = "/api/_search/preferences/{query}",
    params(("query" = String, Path, description = "Free-text query")),
    responses(
        (status = 200, description = "Matching preferences", body = [PreferenceSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Search unavailable", body = ErrorSchema)
    ),
    tags = ["preferences"],
    operation_id = "searchPreferences"
)]
#[get("/_search/preferences/{query}")]
pub async fn search_preferences(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<Preference>>>> {
    records::search(&state, &session, &query).await
}
