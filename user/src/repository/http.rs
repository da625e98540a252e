//! Provides a user directory backed by a remote HTTP service.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::UserRecord;

use super::{DirectoryError, UserDirectory};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_BASE_URL: &str = "http://localhost:3004";
pub const DEFAULT_USERS_PATH: &str = "/users";

/// Reads the full user list with a plain GET on every call.
#[derive(Debug)]
pub struct HttpDirectory {
    client: Client,
    endpoint: Url,
}

/// Contains properties and functionality to build an HTTP directory.
pub struct HttpDirectoryBuilder {
    base_url: String,
    users_path: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl Default for HttpDirectoryBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            users_path: DEFAULT_USERS_PATH.to_string(),
            user_agent: APP_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl HttpDirectoryBuilder {
    /// Overrides the default base url of `http://localhost:3004`.
    pub fn with_base_url(self, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..self
        }
    }

    /// Overrides the default path of `/users`.
    pub fn with_users_path(self, users_path: &str) -> Self {
        Self {
            users_path: users_path.to_string(),
            ..self
        }
    }

    pub fn with_user_agent(self, user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            ..self
        }
    }

    /// Sets a request timeout. Without one a hung directory hangs the caller.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Builds the directory based upon the builder's configuration.
    pub fn finish(self) -> Result<HttpDirectory, DirectoryError> {
        let endpoint = endpoint_url(&self.base_url, &self.users_path)?;

        let mut builder = Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| DirectoryError::InvalidEndpoint(err.to_string()))?;

        Ok(HttpDirectory { client, endpoint })
    }
}

impl HttpDirectory {
    /// Returns an HttpDirectoryBuilder with default values.
    ///
    /// The default settings are:
    /// - base url: http://localhost:3004
    /// - users path: /users
    /// - user agent: the crate name and version
    /// - timeout: none
    ///
    /// Example:
    /// ```
    /// use std::time::Duration;
    /// use user::repository::http::HttpDirectory;
    ///
    /// let _directory = HttpDirectory::build()
    ///     .with_base_url("http://users.internal:3004")
    ///     .with_timeout(Duration::from_secs(5))
    ///     .finish()
    ///     .expect("valid endpoint");
    /// ```
    pub fn build() -> HttpDirectoryBuilder {
        HttpDirectoryBuilder::default()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn endpoint_url(base_url: &str, users_path: &str) -> Result<Url, DirectoryError> {
    let base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(DirectoryError::InvalidEndpoint(format!(
            "{} cannot be used as a base url",
            base_url
        )));
    }

    let path = users_path.trim_start_matches('/');
    let endpoint = format!("{}/{}", base.as_str().trim_end_matches('/'), path);
    Ok(Url::parse(&endpoint)?)
}

#[async_trait]
impl UserDirectory for HttpDirectory {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn read(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "user directory answered with an error status");
            return Err(DirectoryError::UpstreamUnavailable(format!(
                "{} - {}",
                self.endpoint, status
            )));
        }

        let body = response.bytes().await?;
        let users: Vec<UserRecord> = serde_json::from_slice(&body)?;

        debug!(count = users.len(), "loaded users");

        Ok(users)
    }
}
