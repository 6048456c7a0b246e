//! Weight HTTP handlers.
//!
//! ```text
//! POST /api/weights
//! PUT /api/weights
//! GET /api/weights?page=0&size=20&sort=timestamp,desc
//! GET /api/weights/{id}
//! DELETE /api/weights/{id}
//! GET /api/_search/weights/{query}
//! GET /api/weight-by-days/{days}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::PageParams;

use crate::domain::{Record, WeightEntry, WindowSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::records;
use crate::inbound::http::records_dto::WeightRequest;
use crate::inbound::http::schemas::{ErrorSchema, WeightSchema, WeightWindowSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Record a new weight entry.
#[utoipa::path(
    post,
    path = "/api/weights",
    request_body = WeightRequest,
    responses(
        (
            status = 201,
            description = "Entry created",
            headers(
                ("Location" = String, description = "URI of the new entry"),
                ("X-HealthPoints-Alert" = String, description = "Alert key")
            ),
            body = WeightSchema
        ),
        (status = 400, description = "Invalid entry or id already set", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["weights"],
    operation_id = "createWeight"
)]
#[post("/weights")]
pub async fn create_weight(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WeightRequest>,
) -> ApiResult<HttpResponse> {
    records::create(&state, &session, payload.into_inner()).await
}

/// Replace a weight entry, creating it when no id is supplied.
#[utoipa::path(
    put,
    path = "/api/weights",
    request_body = WeightRequest,
    responses(
        (status = 200, description = "Entry updated", body = WeightSchema),
        (status = 201, description = "Entry created", body = WeightSchema),
        (status = 400, description = "Invalid entry", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Entry not found", body = ErrorSchema)
    ),
    tags = ["weights"],
    operation_id = "updateWeight"
)]
#[put("/weights")]
pub async fn update_weight(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WeightRequest>,
) -> ApiResult<HttpResponse> {
    records::update(&state, &session, payload.into_inner()).await
}

/// List the caller's entries, or every entry for administrators.
#[utoipa::path(
    get,
    path = "/api/weights",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size, at most 100"),
        ("sort" = Option<String>, Query, description = "`field,asc|desc`; fields: timestamp, weight, user")
    ),
    responses(
        (
            status = 200,
            description = "One page of entries",
            headers(
                ("X-Total-Count" = u64, description = "Total number of entries"),
                ("Link" = String, description = "RFC 5988 navigation links")
            ),
            body = [WeightSchema]
        ),
        (status = 400, description = "Invalid pagination parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["weights"],
    operation_id = "listWeights"
)]
#[get("/weights")]
pub async fn list_weights(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    records::list::<WeightEntry>(&state, &session, &req, params.into_inner()).await
}

/// Fetch one weight entry.
#[utoipa::path(
    get,
    path = "/api/weights/{id}",
    params(("id" = i64, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry", body = WeightSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such entry")
    ),
    tags = ["weights"],
    operation_id = "getWeight"
)]
#[get("/weights/{id}")]
pub async fn get_weight(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    records::get::<WeightEntry>(&state, &session, id.into_inner()).await
}

/// Delete one weight entry.
#[utoipa::path(
    delete,
    path = "/api/weights/{id}",
    params(("id" = i64, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such entry")
    ),
    tags = ["weights"],
    operation_id = "deleteWeight"
)]
#[delete("/weights/{id}")]
pub async fn delete_weight(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    records::delete::<WeightEntry>(&state, &session, id.into_inner()).await
}

/// Free-text search over weight entries.
#[utoipa::path(
    get,
    path = "/api/_search/weights/{query}",
    params(("query" = String, Path, description = "Free-text query")),
    responses(
        (status = 200, description = "Matching entries", body = [WeightSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Search unavailable", body = ErrorSchema)
    ),
    tags = ["weights"],
    operation_id = "searchWeights"
)]
#[get("/_search/weights/{query}")]
pub async fn search_weights(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<WeightEntry>>>> {
    records::search(&state, &session, &query).await
}

/// Weights the caller recorded during the last `days` days, newest first.
#[utoipa::path(
    get,
    path = "/api/weight-by-days/{days}",
    params(("days" = i64, Path, description = "Length of the trailing window in days")),
    responses(
        (status = 200, description = "Entries in the window", body = WeightWindowSchema),
        (status = 400, description = "Negative or unrepresentable window", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["weights"],
    operation_id = "weightByDays"
)]
#[get("/weight-by-days/{days}")]
pub async fn weight_by_days(
    state: web::Data<HttpState>,
    session: SessionContext,
    days: web::Path<i64>,
) -> ApiResult<web::Json<WindowSummary<Record<WeightEntry>>>> {
    let caller = session.require_caller()?;
    let summary = state
        .windows
        .weight
        .by_days(&caller, days.into_inner())
        .await?;
    Ok(web::Json(summary))
}
