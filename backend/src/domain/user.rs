//! Login names identifying record owners.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum allowed length for a login.
pub const LOGIN_MAX: usize = 50;

static LOGIN_RE: OnceLock<Regex> = OnceLock::new();

fn login_regex() -> &'static Regex {
    LOGIN_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = r"^[A-Za-z0-9_'.@-]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("login regex failed to compile: {error}"))
    })
}

/// Validation errors returned by [`UserLogin::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyLogin,
    LoginTooLong { max: usize },
    LoginInvalidCharacters,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLogin => write!(f, "login must not be empty"),
            Self::LoginTooLong { max } => write!(f, "login must be at most {max} characters"),
            Self::LoginInvalidCharacters => write!(
                f,
                "login may only contain letters, numbers, and the characters _ ' . @ -",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Login name identifying the owner of a record.
///
/// # Examples
/// ```
/// use health_points::domain::UserLogin;
///
/// let login = UserLogin::new("user").expect("valid login");
/// assert_eq!(login.as_ref(), "user");
/// assert!(UserLogin::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserLogin(String);

impl UserLogin {
    /// Validate and construct a [`UserLogin`].
    pub fn new(login: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(login.into())
    }

    fn from_owned(login: String) -> Result<Self, UserValidationError> {
        if login.is_empty() {
            return Err(UserValidationError::EmptyLogin);
        }
        if login.chars().count() > LOGIN_MAX {
            return Err(UserValidationError::LoginTooLong { max: LOGIN_MAX });
        }
        if !login_regex().is_match(&login) {
            return Err(UserValidationError::LoginInvalidCharacters);
        }
        Ok(Self(login))
    }
}

impl AsRef<str> for UserLogin {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserLogin> for String {
    fn from(value: UserLogin) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserLogin {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
