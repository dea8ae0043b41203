//! Test utilities for the accounts crate.
//!
//! Compiled for unit tests and, behind the `test-support` feature, for the
//! integration suites under `tests/` so they can run the full HTTP stack
//! without PostgreSQL.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{NewAccount, StoredAccount, UserPersistenceError, UserRepository};
use crate::domain::{Role, StoredCredential, User, UserProfile, Username};

/// `UserRepository` kept in process memory.
///
/// Accounts live in a `BTreeMap` keyed by username, so listings come back in
/// username order just like the Diesel adapter.
///
/// # Examples
/// ```
/// use accounts::domain::{Role, User};
/// use accounts::test_support::InMemoryUserRepository;
///
/// let admin = User::try_from_parts("admin", "Ada", "Lovelace", Role::Admin).unwrap();
/// let repo = InMemoryUserRepository::default().with_account(admin, "admin-pw");
/// assert_eq!(repo.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<BTreeMap<Username, StoredAccount>>,
}

impl InMemoryUserRepository {
    /// Seed an account whose password is `password`.
    ///
    /// # Panics
    ///
    /// Panics when the password cannot be hashed; only used to build
    /// fixtures.
    #[must_use]
    pub fn with_account(self, user: User, password: &str) -> Self {
        let credential = match StoredCredential::derive(password) {
            Ok(credential) => credential,
            Err(err) => panic!("fixture password must hash: {err}"),
        };
        self.lock().insert(
            user.username().clone(),
            StoredAccount {
                user,
                credential: Some(credential),
            },
        );
        self
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no accounts are stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<Username, StoredAccount>> {
        // A poisoned map only happens after a test already panicked.
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn users_matching(&self, keep: impl Fn(&User) -> bool) -> Vec<User> {
        self.lock()
            .values()
            .map(|account| &account.user)
            .filter(|user| keep(user))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().get(username).map(|account| account.user.clone()))
    }

    async fn find_account(
        &self,
        username: &Username,
    ) -> Result<Option<StoredAccount>, UserPersistenceError> {
        Ok(self.lock().get(username).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users_matching(|_| true))
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users_matching(|user| user.role() == role))
    }

    async fn insert(&self, account: &NewAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.lock();
        let username = account.user.username();
        if accounts.contains_key(username) {
            return Err(UserPersistenceError::duplicate_username(username.as_ref()));
        }
        accounts.insert(
            username.clone(),
            StoredAccount {
                user: account.user.clone(),
                credential: Some(account.credential.clone()),
            },
        );
        Ok(())
    }

    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        Ok(self.lock().remove(username).is_some())
    }

    async fn delete_all_non_admin(&self) -> Result<usize, UserPersistenceError> {
        let mut accounts = self.lock();
        let before = accounts.len();
        accounts.retain(|_, account| account.user.role().is_admin());
        Ok(before - accounts.len())
    }

    async fn update_profile(
        &self,
        username: &Username,
        profile: &UserProfile,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut accounts = self.lock();
        let Some(account) = accounts.get_mut(username) else {
            return Ok(None);
        };
        account.user = account.user.clone().with_profile(profile.clone());
        Ok(Some(account.user.clone()))
    }
}
