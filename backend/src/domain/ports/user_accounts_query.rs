//! Driving port for account lookups.

use async_trait::async_trait;

use crate::domain::{Caller, Error, User, Username};

/// Domain use-case port for reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountsQuery: Send + Sync {
    /// Fetch `target` on behalf of `caller`.
    async fn get_user(&self, caller: &Caller, target: &Username) -> Result<User, Error>;

    /// Every account, ordered by username.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Accounts whose role is named `role`, ordered by username.
    ///
    /// A name outside the known roles matches nothing.
    async fn list_users_by_role(&self, role: &str) -> Result<Vec<User>, Error>;
}
