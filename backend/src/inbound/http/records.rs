//! Shared request flow for the record endpoints.
//!
//! Each entity module exposes thin, documented handlers that delegate here.
//! The helpers own the HTTP contract common to every record kind: alert
//! headers on writes, `Location` on create, pagination headers on lists, and
//! empty `404` bodies for id-keyed reads and deletes.

use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, web};
use pagination::PageParams;
use tracing::warn;

use crate::domain::ports::WriteOutcome;
use crate::domain::{Error, Record, RecordData, RecordId, RecordKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::PARAMS_HEADER;
use crate::inbound::http::records_dto::RecordPayload;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, RecordPortsFor};
use crate::inbound::http::validation::{id_exists_error, page_request};

/// Header naming the translation key of a successful write.
pub const ALERT_HEADER: &str = "X-HealthPoints-Alert";
/// Header carrying the total number of matches of a list request.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";
/// Application name prefixed to alert keys.
const APPLICATION_NAME: &str = "healthPoints";

#[derive(Debug, Clone, Copy)]
enum Alert {
    Created,
    Updated,
    Deleted,
}

impl Alert {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

fn with_alert(status: StatusCode, kind: RecordKind, alert: Alert, id: RecordId) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    builder
        .insert_header((
            ALERT_HEADER,
            format!("{APPLICATION_NAME}.{}.{}", kind.entity_name(), alert.as_str()),
        ))
        .insert_header((PARAMS_HEADER, id.to_string()));
    builder
}

fn warn_if_stale<T: RecordData>(outcome: &WriteOutcome<T>) {
    if !outcome.mirror_synced {
        warn!(
            kind = %T::KIND,
            id = %outcome.record.id,
            "record stored but search mirror is stale"
        );
    }
}

/// Location of a single record resource.
fn location(kind: RecordKind, id: RecordId) -> String {
    format!("/api/{}/{id}", kind.collection_path())
}

/// Create a record from a payload that must not carry an id.
pub(crate) async fn create<P>(
    state: &HttpState,
    session: &SessionContext,
    payload: P,
) -> ApiResult<HttpResponse>
where
    P: RecordPayload,
    HttpState: RecordPortsFor<P::Data>,
{
    let caller = session.require_caller()?;
    let kind = <P::Data as RecordData>::KIND;
    if payload.id().is_some() {
        return Err(id_exists_error(kind));
    }
    let data = payload.into_data(caller.login())?;
    let ports = RecordPortsFor::<P::Data>::record_ports(state);
    let outcome = ports.command.create(&caller, data).await?;
    warn_if_stale(&outcome);
    let id = outcome.record.id;
    Ok(with_alert(StatusCode::CREATED, kind, Alert::Created, id)
        .insert_header((header::LOCATION, location(kind, id)))
        .json(outcome.record))
}

/// Replace a record, or create it when the payload carries no id.
pub(crate) async fn update<P>(
    state: &HttpState,
    session: &SessionContext,
    payload: P,
) -> ApiResult<HttpResponse>
where
    P: RecordPayload,
    HttpState: RecordPortsFor<P::Data>,
{
    let Some(id) = payload.id() else {
        return create(state, session, payload).await;
    };
    let caller = session.require_caller()?;
    let kind = <P::Data as RecordData>::KIND;
    let ports = RecordPortsFor::<P::Data>::record_ports(state);
    // A replacement without `user` keeps the stored owner.
    let stored = if kind.is_owned() {
        ports.query.find(&caller, id).await?
    } else {
        None
    };
    let default_owner = stored
        .as_ref()
        .and_then(|record| record.data.owner())
        .unwrap_or_else(|| caller.login());
    let data = payload.into_data(default_owner)?;
    let outcome = ports.command.update(&caller, Record::new(id, data)).await?;
    warn_if_stale(&outcome);
    Ok(with_alert(StatusCode::OK, kind, Alert::Updated, outcome.record.id).json(outcome.record))
}

/// Fetch one record, answering an empty `404` when it is not visible.
pub(crate) async fn get<T>(
    state: &HttpState,
    session: &SessionContext,
    id: i64,
) -> ApiResult<HttpResponse>
where
    T: RecordData,
    HttpState: RecordPortsFor<T>,
{
    let caller = session.require_caller()?;
    let ports = RecordPortsFor::<T>::record_ports(state);
    Ok(match ports.query.find(&caller, RecordId::new(id)).await? {
        Some(record) => HttpResponse::Ok().json(record),
        None => HttpResponse::NotFound().finish(),
    })
}

/// List one page of records with `X-Total-Count` and `Link` headers.
pub(crate) async fn list<T>(
    state: &HttpState,
    session: &SessionContext,
    req: &HttpRequest,
    params: PageParams,
) -> ApiResult<HttpResponse>
where
    T: RecordData,
    HttpState: RecordPortsFor<T>,
{
    let caller = session.require_caller()?;
    let request = page_request(params)?;
    let ports = RecordPortsFor::<T>::record_ports(state);
    let page = ports.query.list(&caller, request).await?;
    let link = page.link_header(&req.full_url());
    let link = HeaderValue::from_str(&link)
        .map_err(|err| Error::internal(format!("invalid link header: {err}")))?;
    let total = page.total();
    Ok(HttpResponse::Ok()
        .insert_header((TOTAL_COUNT_HEADER, total.to_string()))
        .insert_header((header::LINK, link))
        .json(page.into_items()))
}

/// Delete one record, answering an empty `404` when nothing was removed.
pub(crate) async fn delete<T>(
    state: &HttpState,
    session: &SessionContext,
    id: i64,
) -> ApiResult<HttpResponse>
where
    T: RecordData,
    HttpState: RecordPortsFor<T>,
{
    let caller = session.require_caller()?;
    let ports = RecordPortsFor::<T>::record_ports(state);
    match ports.command.delete(&caller, RecordId::new(id)).await? {
        Some(outcome) => {
            if !outcome.mirror_synced {
                warn!(kind = %T::KIND, id = %outcome.id, "record deleted but search mirror is stale");
            }
            Ok(with_alert(StatusCode::OK, T::KIND, Alert::Deleted, outcome.id).finish())
        }
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

/// Run a free-text query against the search mirror.
pub(crate) async fn search<T>(
    state: &HttpState,
    session: &SessionContext,
    query: &str,
) -> ApiResult<web::Json<Vec<Record<T>>>>
where
    T: RecordData,
    HttpState: RecordPortsFor<T>,
{
    let caller = session.require_caller()?;
    let ports = RecordPortsFor::<T>::record_ports(state);
    let records = ports.query.search(&caller, query).await?;
    Ok(web::Json(records))
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
