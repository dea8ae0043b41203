//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to authenticate credentials without
//! importing persistence concerns, so HTTP handler tests can substitute a
//! test double instead of wiring a database.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable and both
    /// fail with an unauthorised error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
