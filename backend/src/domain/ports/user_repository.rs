//! Port abstraction for account persistence adapters and their errors.
//!
//! The [`UserRepository`] trait is the credential store: it persists profile
//! fields together with the salted password digest and answers lookups by
//! username or role. Listing operations return accounts ordered by username.

use async_trait::async_trait;

use crate::domain::{Role, StoredCredential, User, UserProfile, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Insert collided with an existing username.
        DuplicateUsername { username: String } => "username {username} is already taken",
    }
}

/// Account row as read back for authentication.
///
/// `credential` is `None` when the stored row lacks a salt or digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub user: User,
    pub credential: Option<StoredCredential>,
}

/// Account to insert at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub user: User,
    pub credential: StoredCredential,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the profile for `username`.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the profile together with its stored credential.
    async fn find_account(
        &self,
        username: &Username,
    ) -> Result<Option<StoredAccount>, UserPersistenceError>;

    /// Every account, ordered by username.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Accounts holding `role`, ordered by username.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError>;

    /// Insert a new account.
    ///
    /// Fails with [`UserPersistenceError::DuplicateUsername`] when the
    /// username already exists.
    async fn insert(&self, account: &NewAccount) -> Result<(), UserPersistenceError>;

    /// Remove one account. Returns whether a row was deleted.
    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError>;

    /// Remove every non-Admin account. Returns the number of rows removed.
    async fn delete_all_non_admin(&self) -> Result<usize, UserPersistenceError>;

    /// Overwrite the editable profile fields.
    ///
    /// Returns the updated account, or `None` when no row matched.
    async fn update_profile(
        &self,
        username: &Username,
        profile: &UserProfile,
    ) -> Result<Option<User>, UserPersistenceError>;
}
