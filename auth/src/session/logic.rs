use std::{error::Error, fmt::Display};

use async_trait::async_trait;
use user::DirectoryError;

use super::Session;

/// Expected authorization failures. They are part of the result, not errors
/// of the operation itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthenticationError {
    UserNotFound,
    WrongPassword,
}

impl AuthenticationError {
    /// Returns the message shown to users.
    pub fn message(&self) -> &'static str {
        match self {
            AuthenticationError::UserNotFound => "Такой пользователь не найден",
            AuthenticationError::WrongPassword => "Неверный пороль",
        }
    }
}

impl Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for AuthenticationError {}

/// Outcome of an authorization: either a session or the reason it was denied.
#[derive(Debug)]
pub enum AuthResult {
    Authorized(Session),
    Denied(AuthenticationError),
}

impl AuthResult {
    /// Returns the user facing error message of a denied authorization.
    pub fn error(&self) -> Option<&'static str> {
        match self {
            AuthResult::Authorized(_) => None,
            AuthResult::Denied(err) => Some(err.message()),
        }
    }

    pub fn res(&self) -> Option<&Session> {
        match self {
            AuthResult::Authorized(session) => Some(session),
            AuthResult::Denied(_) => None,
        }
    }

    pub fn res_mut(&mut self) -> Option<&mut Session> {
        match self {
            AuthResult::Authorized(session) => Some(session),
            AuthResult::Denied(_) => None,
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthResult::Authorized(_))
    }

    pub fn into_session(self) -> Result<Session, AuthenticationError> {
        match self {
            AuthResult::Authorized(session) => Ok(session),
            AuthResult::Denied(err) => Err(err),
        }
    }
}

/// Trait to be implemented by everything that can check credentials.
///
/// Unreachable or broken directories surface as `DirectoryError`, bad
/// credentials as `AuthResult::Denied`.
#[async_trait]
pub trait Authenticator {
    async fn authorize(&self, login: &str, password: &str) -> Result<AuthResult, DirectoryError>;
}
