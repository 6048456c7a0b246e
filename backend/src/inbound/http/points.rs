//! Daily points HTTP handlers.
//!
//! ```text
//! POST /api/points
//! PUT /api/points
//! GET /api/points?page=0&size=20&sort=date,desc
//! GET /api/points/{id}
//! DELETE /api/points/{id}
//! GET /api/_search/points/{query}
//! GET /api/points-this-week
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::PageParams;

use crate::domain::{DailyPoints, Record, WeeklyPoints};
use crate::inbound::http::ApiResult;
use crate::inbound::http::records;
use crate::inbound::http::records_dto::PointsRequest;
use crate::inbound::http::schemas::{ErrorSchema, PointsSchema, WeeklyPointsSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Record a day's points.
#[utoipa::path(
    post,
    path = "/api/points",
    request_body = PointsRequest,
    responses(
        (
            status = 201,
            description = "Points created",
            headers(
                ("Location" = String, description = "URI of the new record"),
                ("X-HealthPoints-Alert" = String, description = "Alert key")
            ),
            body = PointsSchema
        ),
        (status = 400, description = "Invalid points or id already set", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "createPoints"
)]
#[post("/points")]
pub async fn create_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PointsRequest>,
) -> ApiResult<HttpResponse> {
    records::create(&state, &session, payload.into_inner()).await
}

/// Replace a day's points, creating the record when no id is supplied.
#[utoipa::path(
    put,
    path = "/api/points",
    request_body = PointsRequest,
    responses(
        (status = 200, description = "Points updated", body = PointsSchema),
        (status = 201, description = "Points created", body = PointsSchema),
        (status = 400, description = "Invalid points", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Record not found", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "updatePoints"
)]
#[put("/points")]
pub async fn update_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PointsRequest>,
) -> ApiResult<HttpResponse> {
    records::update(&state, &session, payload.into_inner()).await
}

/// List the caller's points, or every user's points for administrators.
#[utoipa::path(
    get,
    path = "/api/points",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size, at most 100"),
        ("sort" = Option<String>, Query, description = "`field,asc|desc`; fields: date, exercise, meals, alcohol, user")
    ),
    responses(
        (
            status = 200,
            description = "One page of points",
            headers(
                ("X-Total-Count" = u64, description = "Total number of records"),
                ("Link" = String, description = "RFC 5988 navigation links")
            ),
            body = [PointsSchema]
        ),
        (status = 400, description = "Invalid pagination parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "listPoints"
)]
#[get("/points")]
pub async fn list_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    records::list::<DailyPoints>(&state, &session, &req, params.into_inner()).await
}

/// Fetch one day's points.
#[utoipa::path(
    get,
    path = "/api/points/{id}",
    params(("id" = i64, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Points", body = PointsSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such record")
    ),
    tags = ["points"],
    operation_id = "getPoints"
)]
#[get("/points/{id}")]
pub async fn get_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    records::get::<DailyPoints>(&state, &session, id.into_inner()).await
}

/// Delete one day's points.
#[utoipa::path(
    delete,
    path = "/api/points/{id}",
    params(("id" = i64, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Points deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such record")
    ),
    tags = ["points"],
    operation_id = "deletePoints"
)]
#[delete("/points/{id}")]
pub async fn delete_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    records::delete::<DailyPoints>(&state, &session, id.into_inner()).await
}

/// Free-text search over points.
#[utoipa::path(
    get,
    path = "/api/_search/points/{query}",
    params(("query" = String, Path, description = "Free-text query")),
    responses(
        (status = 200, description = "Matching points", body = [PointsSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Search unavailable", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "searchPoints"
)]
#[get("/_search/points/{query}")]
pub async fn search_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<DailyPoints>>>> {
    records::search(&state, &session, &query).await
}

/// Sum of the caller's points from Monday to Sunday of the current week.
#[utoipa::path(
    get,
    path = "/api/points-this-week",
    responses(
        (status = 200, description = "Current week's total", body = WeeklyPointsSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "pointsThisWeek"
)]
#[get("/points-this-week")]
pub async fn points_this_week(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<WeeklyPoints>> {
    let caller = session.require_caller()?;
    let total = state.windows.weekly_points.points_this_week(&caller).await?;
    Ok(web::Json(total))
}
