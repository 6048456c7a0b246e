//! Blood pressure HTTP handlers.
//!
//! ```text
//! POST /api/blood-pressures
//! PUT /api/blood-pressures
//! GET /api/blood-pressures?page=0&size=20&sort=timestamp,desc
//! GET /api/blood-pressures/{id}
//! DELETE /api/blood-pressures/{id}
//! GET /api/_search/blood-pressures/{query}
//! GET /api/bp-by-days/{days}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::PageParams;

use crate::domain::{BloodPressure, Record, WindowSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::records;
use crate::inbound::http::records_dto::BloodPressureRequest;
use crate::inbound::http::schemas::{BloodPressureSchema, BloodPressureWindowSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Record a new blood pressure reading.
#[utoipa::path(
    post,
    path = "/api/blood-pressures",
    request_body = BloodPressureRequest,
    responses(
        (
            status = 201,
            description = "Reading created",
            headers(
                ("Location" = String, description = "URI of the new reading"),
                ("X-HealthPoints-Alert" = String, description = "Alert key")
            ),
            body = BloodPressureSchema
        ),
        (status = 400, description = "Invalid reading or id already set", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["blood-pressures"],
    operation_id = "createBloodPressure"
)]
#[post("/blood-pressures")]
pub async fn create_blood_pressure(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BloodPressureRequest>,
) -> ApiResult<HttpResponse> {
    records::create(&state, &session, payload.into_inner()).await
}

/// Replace a blood pressure reading, creating it when no id is supplied.
#[utoipa::path(
    put,
    path = "/api/blood-pressures",
    request_body = BloodPressureRequest,
    responses(
        (status = 200, description = "Reading updated", body = BloodPressureSchema),
        (status = 201, description = "Reading created", body = BloodPressureSchema),
        (status = 400, description = "Invalid reading", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Reading not found", body = ErrorSchema)
    ),
    tags = ["blood-pressures"],
    operation_id = "updateBloodPressure"
)]
#[put("/blood-pressures")]
pub async fn update_blood_pressure(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BloodPressureRequest>,
) -> ApiResult<HttpResponse> {
    records::update(&state, &session, payload.into_inner()).await
}

/// List the caller's readings, or every reading for administrators.
#[utoipa::path(
    get,
    path = "/api/blood-pressures",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size, at most 100"),
        ("sort" = Option<String>, Query, description = "`field,asc|desc`; fields: timestamp, systolic, diastolic, user")
    ),
    responses(
        (
            status = 200,
            description = "One page of readings",
            headers(
                ("X-Total-Count" = u64, description = "Total number of readings"),
                ("Link" = String, description = "RFC 5988 navigation links")
            ),
            body = [BloodPressureSchema]
        ),
        (status = 400, description = "Invalid pagination parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["blood-pressures"],
    operation_id = "listBloodPressures"
)]
#[get("/blood-pressures")]
pub async fn list_blood_pressures(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    records::list::<BloodPressure>(&state, &session, &req, params.into_inner()).await
}

/// Fetch one reading.
#[utoipa::path(
    get,
    path = "/api/blood-pressures/{id}",
    params(("id" = i64, Path, description = "Reading identifier")),
    responses(
        (status = 200, description = "Reading", body = BloodPressureSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such reading")
    ),
    tags = ["blood-pressures"],
    operation_id = "getBloodPressure"
)]
#[get("/blood-pressures/{id}")]
pub async fn get_blood_pressure(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    records::get::<BloodPressure>(&state, &session, id.into_inner()).await
}

/// Delete one reading.
#[utoipa::path(
    delete,
    path = "/api/blood-pressures/{id}",
    params(("id" = i64, Path, description = "Reading identifier")),
    responses(
        (status = 200, description = "Reading deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such reading")
    ),
    tags = ["blood-pressures"],
    operation_id = "deleteBloodPressure"
)]
#[delete("/blood-pressures/{id}")]
pub async fn delete_blood_pressure(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    records::delete::<BloodPressure>(&state, &session, id.into_inner()).await
}

/// Free-text search over readings.
#[utoipa::path(
    get,
    path = "/api/_search/blood-pressures/{query}",
    params(("query" = String, Path, description = "Free-text query")),
    responses(
        (status = 200, description = "Matching readings", body = [BloodPressureSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Search unavailable", body = ErrorSchema)
    ),
    tags = ["blood-pressures"],
    operation_id = "searchBloodPressures"
)]
#[get("/_search/blood-pressures/{query}")]
pub async fn search_blood_pressures(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<BloodPressure>>>> {
    records::search(&state, &session, &query).await
}

/// Readings the caller took during the last `days` days, newest first.
#[utoipa::path(
    get,
    path = "/api/bp-by-days/{days}",
    params(("days" = i64, Path, description = "Length of the trailing window in days")),
    responses(
        (status = 200, description = "Readings in the window", body = BloodPressureWindowSchema),
        (status = 400, description = "Negative or unrepresentable window", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["blood-pressures"],
    operation_id = "bloodPressureByDays"
)]
#[get("/bp-by-days/{days}")]
pub async fn blood_pressure_by_days(
    state: web::Data<HttpState>,
    session: SessionContext,
    days: web::Path<i64>,
) -> ApiResult<web::Json<WindowSummary<Record<BloodPressure>>>> {
    let caller = session.require_caller()?;
    let summary = state
        .windows
        .blood_pressure
        .by_days(&caller, days.into_inner())
        .await?;
    Ok(web::Json(summary))
}
