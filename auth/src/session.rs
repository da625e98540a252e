//! Provides functionality for user sessions.
use chrono::{DateTime, Utc};
use std::{
    error::Error,
    fmt::{self, Display},
};
use tracing::{debug, info};

pub mod authenticator;
pub mod logic;

/// Holds all session related errors.
#[derive(Debug, PartialEq)]
pub enum SessionError {
    InvalidSession,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionError::InvalidSession => write!(f, "Session is invalid"),
        }
    }
}

impl Error for SessionError {}

/// Operations available on a session handed out by a successful authorization.
pub trait SessionHandle {
    /// Ends the session. Every later call on the session fails.
    fn logout(&mut self) -> Result<(), SessionError>;

    /// Hook for removing comments. Currently only leaves a log entry.
    fn remove_comment(&self) -> Result<(), SessionError>;

    /// Returns true until the session has been logged out.
    fn is_active(&self) -> bool;
}

/// An in-memory session. It carries no token, no expiry and no
/// reference to the user it was issued for.
#[derive(Debug)]
pub struct Session {
    issued_at: DateTime<Utc>,
    active: bool,
}

impl Session {
    pub(crate) fn open() -> Self {
        Self {
            issued_at: Utc::now(),
            active: true,
        }
    }

    /// Returns the time the session was opened.
    pub fn issued_at(&self) -> Result<DateTime<Utc>, SessionError> {
        self.ensure_active()?;
        Ok(self.issued_at)
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if !self.active {
            return Err(SessionError::InvalidSession);
        }
        Ok(())
    }
}

impl SessionHandle for Session {
    fn logout(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.active = false;
        debug!(issued_at = %self.issued_at, "session logged out");
        Ok(())
    }

    fn remove_comment(&self) -> Result<(), SessionError> {
        self.ensure_active()?;
        info!(issued_at = %self.issued_at, "remove comment requested");
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
