//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving the caller.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Caller, Error};

pub(crate) const CALLER_KEY: &str = "caller";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated caller in the session cookie.
    pub fn persist_caller(&self, caller: &Caller) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(CALLER_KEY, caller)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current caller from the session, if present.
    ///
    /// A cookie whose payload no longer parses is treated as absent.
    pub fn caller(&self) -> Result<Option<Caller>, Error> {
        match self.0.get::<Caller>(CALLER_KEY) {
            Ok(caller) => Ok(caller),
            Err(error) => {
                tracing::warn!("invalid caller in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Require an authenticated caller or return `401 Unauthorized`.
    pub fn require_caller(&self) -> Result<Caller, Error> {
        self.caller()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session entry and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
