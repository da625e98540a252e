//! Authorizes logins against a user directory.
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};
use user::{DirectoryError, UserDirectory, UserRecord};

use super::{
    logic::{AuthResult, AuthenticationError, Authenticator},
    Session,
};

/// Authenticator backed by a user directory. Holds no state besides the
/// directory, so concurrent authorizations never interfere.
#[derive(Clone)]
pub struct DirectoryAuthenticator {
    directory: Arc<dyn UserDirectory + Send + Sync>,
}

impl DirectoryAuthenticator {
    pub fn new(directory: Arc<dyn UserDirectory + Send + Sync>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Authenticator for DirectoryAuthenticator {
    async fn authorize(&self, login: &str, password: &str) -> Result<AuthResult, DirectoryError> {
        authorize(self.directory.as_ref(), login, password).await
    }
}

/// Fetches the full user list and checks the credentials against it.
///
/// The first record with exactly the same login decides the outcome, other
/// records are never inspected. Directory failures, including a matching
/// record without a user profile, are returned as errors and never turned
/// into a denied result.
#[instrument(skip_all, fields(login = %login))]
pub async fn authorize<D>(
    directory: &D,
    login: &str,
    password: &str,
) -> Result<AuthResult, DirectoryError>
where
    D: UserDirectory + Sync + ?Sized,
{
    let users = directory.read().await?;
    check_credentials(&users, login, password)
}

fn check_credentials(
    users: &[UserRecord],
    login: &str,
    password: &str,
) -> Result<AuthResult, DirectoryError> {
    let user = match users.iter().find(|user| user.login() == Some(login)) {
        Some(user) => user,
        None => {
            info!("user not found");
            return Ok(AuthResult::Denied(AuthenticationError::UserNotFound));
        }
    };

    if !user.has_password(password)? {
        info!("wrong password");
        return Ok(AuthResult::Denied(AuthenticationError::WrongPassword));
    }

    info!("user authorized");
    Ok(AuthResult::Authorized(Session::open()))
}
