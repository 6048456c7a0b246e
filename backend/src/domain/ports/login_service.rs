//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing identity provider.
//! Handler tests substitute a test double instead of wiring one up.

use async_trait::async_trait;

use crate::domain::{Authority, Caller, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated caller.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Caller, Error>;
}

/// In-memory authenticator standing in for an external identity provider.
///
/// Knows two accounts: `admin` / `admin` holding both authorities, and
/// `user` / `user` holding [`Authority::User`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    fn authorities_for(username: &str, password: &str) -> Option<&'static [Authority]> {
        match (username, password) {
            ("admin", "admin") => Some(&[Authority::Admin, Authority::User]),
            ("user", "user") => Some(&[Authority::User]),
            _ => None,
        }
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Caller, Error> {
        let username = credentials.username();
        let authorities = Self::authorities_for(username.as_ref(), credentials.password())
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        Ok(Caller::new(username.clone(), authorities.iter().copied()))
    }
}
