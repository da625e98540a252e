use crate::UserRecord;
use async_trait::async_trait;
use std::{error::Error, fmt::Display};

pub mod http;
pub mod memory;

/// Directory related errors.
#[derive(Debug, PartialEq)]
pub enum DirectoryError {
    InvalidEndpoint(String),
    UpstreamUnavailable(String),
    MalformedResponse(String),
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::InvalidEndpoint(err) => write!(f, "invalid endpoint: {}", err),
            DirectoryError::UpstreamUnavailable(err) => write!(f, "upstream unavailable: {}", err),
            DirectoryError::MalformedResponse(err) => write!(f, "malformed response: {}", err),
        }
    }
}

impl Error for DirectoryError {}

impl From<url::ParseError> for DirectoryError {
    fn from(value: url::ParseError) -> Self {
        DirectoryError::InvalidEndpoint(value.to_string())
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(value: serde_json::Error) -> Self {
        DirectoryError::MalformedResponse(value.to_string())
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(value: reqwest::Error) -> Self {
        DirectoryError::UpstreamUnavailable(value.to_string())
    }
}

/// Trait to be implemented by user directories.
#[async_trait]
pub trait UserDirectory {
    /// Read all users in the order the directory returns them.
    async fn read(&self) -> Result<Vec<UserRecord>, DirectoryError>;
}
