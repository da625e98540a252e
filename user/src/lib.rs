//! Provides read-only access to the user directory.
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{self, Debug};

pub mod repository;

pub use repository::{DirectoryError, UserDirectory};

/// A single entry of the user directory.
///
/// Entries are kept as the directory returns them and only interpreted when
/// looked at, so an irregular entry never affects the others.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct UserRecord(Value);

impl UserRecord {
    pub fn new(login: &str, password: &str) -> Self {
        Self(json!({
            "login": login,
            "user": { "password": password },
        }))
    }

    /// Returns the login, if the entry carries one as a string.
    pub fn login(&self) -> Option<&str> {
        self.0.get("login").and_then(Value::as_str)
    }

    /// Compares the provided password with the stored one verbatim.
    ///
    /// A missing or non-string password never matches. An entry without a
    /// `user` object can't be checked at all and is reported as malformed.
    pub fn has_password(&self, password: &str) -> Result<bool, DirectoryError> {
        match self.0.get("user") {
            None | Some(Value::Null) => Err(DirectoryError::MalformedResponse(format!(
                "entry {} has no user profile",
                self.login().unwrap_or("<unknown>")
            ))),
            Some(user) => Ok(user.get("password").and_then(Value::as_str) == Some(password)),
        }
    }
}

// The password stays out of logs.
impl Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("login", &self.login())
            .field("user", &"<redacted>")
            .finish()
    }
}
