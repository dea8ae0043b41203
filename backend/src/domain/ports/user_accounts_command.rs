//! Driving port for account mutations.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Registration, User, UserProfile, Username};

/// Domain use-case port for registering, editing, and removing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountsCommand: Send + Sync {
    /// Register a new account.
    async fn create_user(&self, registration: &Registration) -> Result<(), Error>;

    /// Delete `target` on behalf of `caller`.
    async fn delete_user(&self, caller: &Caller, target: &Username) -> Result<(), Error>;

    /// Delete every non-Admin account.
    async fn delete_all(&self) -> Result<(), Error>;

    /// Replace the profile of `target` on behalf of `caller`.
    async fn update_user_info(
        &self,
        caller: &Caller,
        target: &Username,
        profile: UserProfile,
    ) -> Result<User, Error>;
}
