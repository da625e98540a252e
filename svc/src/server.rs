use std::sync::Arc;

use auth::{AuthResult, Authenticator, DirectoryAuthenticator};
use tracing::instrument;
use user::{repository::http::HttpDirectory, DirectoryError};

use crate::configuration::Configuration;

/// Entry point for authorizations.
#[derive(Clone)]
pub struct Server {
    authenticator: Arc<dyn Authenticator + Send + Sync>,
}

impl Server {
    pub fn new(authenticator: Arc<dyn Authenticator + Send + Sync>) -> Self {
        Self { authenticator }
    }

    /// Builds a server that checks credentials against the configured HTTP directory.
    pub fn build(configuration: &Configuration) -> Result<Self, DirectoryError> {
        let user_agent = format!(
            "{}/{}",
            configuration.application.name,
            env!("CARGO_PKG_VERSION")
        );

        let mut builder = HttpDirectory::build()
            .with_base_url(&configuration.directory.base_url)
            .with_users_path(&configuration.directory.users_path)
            .with_user_agent(&user_agent);
        if let Some(timeout) = configuration.directory.timeout() {
            builder = builder.with_timeout(timeout);
        }
        let directory = builder.finish()?;

        let authenticator = DirectoryAuthenticator::new(Arc::new(directory));
        Ok(Self::new(Arc::new(authenticator)))
    }

    /// Checks the credentials.
    ///
    /// Bad credentials come back as `AuthResult::Denied`, an unreachable or
    /// broken directory as `DirectoryError`.
    #[instrument(skip(self, password))]
    pub async fn authorize(&self, login: &str, password: &str) -> Result<AuthResult, DirectoryError> {
        self.authenticator.authorize(login, password).await
    }
}
