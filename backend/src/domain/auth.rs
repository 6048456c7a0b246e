//! Authentication primitives: login credentials, authorities, and callers.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{UserLogin, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username is not a well-formed login.
    InvalidUsername(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::InvalidUsername(inner) => write!(f, "invalid username: {inner}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and is a valid [`UserLogin`].
/// - `password` is non-empty and keeps caller-provided whitespace; it is
///   zeroed on drop.
///
/// # Examples
/// ```
/// use health_points::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" user ", "user").expect("valid credentials");
/// assert_eq!(creds.username().as_ref(), "user");
/// assert_eq!(creds.password(), "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: UserLogin,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        let username = UserLogin::new(normalized).map_err(LoginValidationError::InvalidUsername)?;
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login the caller is trying to authenticate as.
    pub fn username(&self) -> &UserLogin {
        &self.username
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Granted authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    /// May act on any user's records.
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    /// May act on their own records.
    #[serde(rename = "ROLE_USER")]
    User,
}

impl Authority {
    /// Return the wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::User => "ROLE_USER",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAuthorityError {
    input: String,
}

impl fmt::Display for ParseAuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown authority: {}", self.input)
    }
}

impl std::error::Error for ParseAuthorityError {}

impl FromStr for Authority {
    type Err = ParseAuthorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_ADMIN" => Ok(Self::Admin),
            "ROLE_USER" => Ok(Self::User),
            other => Err(ParseAuthorityError {
                input: other.to_owned(),
            }),
        }
    }
}

/// Authenticated principal on whose behalf an operation runs.
///
/// Services receive the caller explicitly; nothing reads identity from
/// ambient state.
///
/// # Examples
/// ```
/// use health_points::domain::{Authority, Caller, UserLogin};
///
/// let login = UserLogin::new("admin").expect("login");
/// let caller = Caller::new(login, [Authority::Admin, Authority::User]);
/// assert!(caller.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    login: UserLogin,
    authorities: Vec<Authority>,
}

impl Caller {
    /// Construct a caller from a login and its authorities.
    pub fn new(login: UserLogin, authorities: impl IntoIterator<Item = Authority>) -> Self {
        let mut authorities: Vec<Authority> = authorities.into_iter().collect();
        authorities.sort_by_key(|authority| authority.as_str());
        authorities.dedup();
        Self { login, authorities }
    }

    /// Construct a caller holding only [`Authority::User`].
    pub fn user(login: UserLogin) -> Self {
        Self::new(login, [Authority::User])
    }

    /// Login of the caller.
    pub fn login(&self) -> &UserLogin {
        &self.login
    }

    /// Granted authorities.
    pub fn authorities(&self) -> &[Authority] {
        &self.authorities
    }

    /// Whether the caller holds [`Authority::Admin`].
    pub fn is_admin(&self) -> bool {
        self.authorities.contains(&Authority::Admin)
    }
}
