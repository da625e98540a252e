//! Authorizes logins against the user directory and hands out sessions.
pub mod session;

pub use session::{
    authenticator::{authorize, DirectoryAuthenticator},
    logic::{AuthResult, AuthenticationError, Authenticator},
    Session, SessionError, SessionHandle,
};
pub use user::DirectoryError;
