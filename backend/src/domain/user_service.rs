//! Account management service.
//!
//! [`UserService`] evaluates the access rules in
//! [`crate::domain::authorization`] before reading or writing through the
//! [`UserRepository`] port, and implements the driving ports used by the HTTP
//! adapter. Each call performs at most one lookup followed by one write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, NewAccount, UserAccountsCommand, UserAccountsQuery, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    AccessDenied, Caller, CredentialError, Error, LoginCredentials, Registration, Role,
    StoredCredential, User, UserProfile, Username, authorize_delete, authorize_read,
    authorize_update,
};

/// Failure kinds raised by [`UserService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserServiceError {
    /// Username is already registered.
    #[error("user already exists")]
    AlreadyExists,
    /// No account has the requested username.
    #[error("user not found")]
    NotFound,
    /// Caller may not act on the target account.
    #[error("caller is not authorized")]
    Unauthorized,
    /// Target is an Admin the caller may not touch.
    #[error("caller is not authorized to change an admin")]
    IsAdmin,
    /// Birthdate lies after the current date.
    #[error("birthdate cannot be after the current date")]
    InvalidDate,
    /// Username and password did not match a stored account.
    #[error("incorrect username and/or password")]
    InvalidCredentials,
    /// Password digest could not be derived.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] UserPersistenceError),
}

impl From<AccessDenied> for UserServiceError {
    fn from(value: AccessDenied) -> Self {
        match value {
            AccessDenied::NotOwner => Self::Unauthorized,
            AccessDenied::ProtectedAdmin => Self::IsAdmin,
        }
    }
}

fn detailed(error: Error, code: &str) -> Error {
    error.with_details(json!({ "code": code }))
}

impl From<UserServiceError> for Error {
    fn from(value: UserServiceError) -> Self {
        let message = value.to_string();
        match value {
            UserServiceError::AlreadyExists => {
                detailed(Error::conflict(message), "user_already_exists")
            }
            UserServiceError::NotFound => detailed(Error::not_found(message), "user_not_found"),
            UserServiceError::Unauthorized => {
                detailed(Error::unauthorized(message), "unauthorized_user")
            }
            UserServiceError::IsAdmin => detailed(Error::unauthorized(message), "user_is_admin"),
            UserServiceError::InvalidDate => {
                detailed(Error::invalid_request(message), "invalid_birthdate")
            }
            UserServiceError::InvalidCredentials => {
                detailed(Error::unauthorized(message), "invalid_credentials")
            }
            UserServiceError::Credential(_) => Error::internal(message),
            UserServiceError::Storage(UserPersistenceError::Connection { message }) => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserServiceError::Storage(UserPersistenceError::Query { message }) => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserServiceError::Storage(UserPersistenceError::DuplicateUsername { .. }) => {
                detailed(Error::conflict("user already exists"), "user_already_exists")
            }
        }
    }
}

/// Account service implementing the login, command, and query ports.
#[derive(Clone)]
pub struct UserService<R> {
    user_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UserService<R> {
    /// Create a service backed by `user_repo`, reading "today" from `clock`.
    pub fn new(user_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { user_repo, clock }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    async fn verified_user(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<Option<User>, UserServiceError> {
        let Some(account) = self.user_repo.find_account(username).await? else {
            return Ok(None);
        };
        let Some(credential) = account.credential else {
            return Ok(None);
        };
        let matches = credential
            .verify_blocking(Zeroizing::new(password.to_owned()))
            .await?;
        Ok(matches.then_some(account.user))
    }

    async fn require_user(&self, username: &Username) -> Result<User, UserServiceError> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or(UserServiceError::NotFound)
    }

    /// Whether `password` matches the stored digest for `username`.
    ///
    /// Unknown usernames and rows without a salt yield `Ok(false)`. Only
    /// store failures are errors.
    pub async fn authenticate(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<bool, UserServiceError> {
        Ok(self.verified_user(username, password).await?.is_some())
    }

    /// Authenticate and return the stored account.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, UserServiceError> {
        self.verified_user(credentials.username(), credentials.password())
            .await?
            .ok_or(UserServiceError::InvalidCredentials)
    }

    /// Hash the password under a fresh salt and insert the account.
    pub async fn create_user(&self, registration: &Registration) -> Result<bool, UserServiceError> {
        let credential =
            StoredCredential::derive_blocking(Zeroizing::new(registration.password().to_owned()))
                .await?;
        let user = User::new(
            registration.username().clone(),
            registration.role(),
            registration.profile().clone(),
        );
        let account = NewAccount { user, credential };
        match self.user_repo.insert(&account).await {
            Ok(()) => {}
            Err(UserPersistenceError::DuplicateUsername { .. }) => {
                return Err(UserServiceError::AlreadyExists);
            }
            Err(err) => return Err(err.into()),
        }
        info!(
            username = %registration.username(),
            role = %registration.role(),
            "account created"
        );
        Ok(true)
    }

    /// Fetch `target`; non-admins may only fetch themselves.
    pub async fn get_user_by_username(
        &self,
        caller: &Caller,
        target: &Username,
    ) -> Result<User, UserServiceError> {
        authorize_read(caller, target)?;
        self.require_user(target).await
    }

    /// Every account, ordered by username.
    pub async fn get_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.user_repo.list_all().await?)
    }

    /// Accounts holding `role`, ordered by username.
    pub async fn get_users_by_role(&self, role: Role) -> Result<Vec<User>, UserServiceError> {
        Ok(self.user_repo.list_by_role(role).await?)
    }

    /// Accounts whose role is named `role`. Unknown names match nothing.
    pub async fn get_users_by_role_name(&self, role: &str) -> Result<Vec<User>, UserServiceError> {
        match role.parse::<Role>() {
            Ok(role) => self.get_users_by_role(role).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Delete `target` on behalf of `caller`.
    pub async fn delete_user(
        &self,
        caller: &Caller,
        target: &Username,
    ) -> Result<bool, UserServiceError> {
        let user = self.require_user(target).await?;
        authorize_delete(caller, &user)?;
        if !self.user_repo.delete(target).await? {
            return Err(UserServiceError::NotFound);
        }
        info!(username = %target, deleted_by = %caller.username(), "account deleted");
        Ok(true)
    }

    /// Delete every non-Admin account.
    pub async fn delete_all(&self) -> Result<bool, UserServiceError> {
        let removed = self.user_repo.delete_all_non_admin().await?;
        info!(removed, "non-admin accounts deleted");
        Ok(true)
    }

    /// Replace the profile of `target` on behalf of `caller`.
    ///
    /// A birthdate after today is rejected before the target is looked up.
    pub async fn update_user_info(
        &self,
        caller: &Caller,
        target: &Username,
        profile: UserProfile,
    ) -> Result<User, UserServiceError> {
        let today = self.clock.utc().date_naive();
        if profile.birthdate().is_some_and(|birthdate| birthdate > today) {
            return Err(UserServiceError::InvalidDate);
        }
        let user = self.require_user(target).await?;
        authorize_update(caller, &user)?;
        self.user_repo
            .update_profile(target, &profile)
            .await?
            .ok_or(UserServiceError::NotFound)
    }
}

#[async_trait]
impl<R> LoginService for UserService<R>
where
    R: UserRepository,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        UserService::login(self, credentials)
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<R> UserAccountsCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, registration: &Registration) -> Result<(), Error> {
        UserService::create_user(self, registration)
            .await
            .map(|_| ())
            .map_err(Error::from)
    }

    async fn delete_user(&self, caller: &Caller, target: &Username) -> Result<(), Error> {
        UserService::delete_user(self, caller, target)
            .await
            .map(|_| ())
            .map_err(Error::from)
    }

    async fn delete_all(&self) -> Result<(), Error> {
        UserService::delete_all(self)
            .await
            .map(|_| ())
            .map_err(Error::from)
    }

    async fn update_user_info(
        &self,
        caller: &Caller,
        target: &Username,
        profile: UserProfile,
    ) -> Result<User, Error> {
        UserService::update_user_info(self, caller, target, profile)
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<R> UserAccountsQuery for UserService<R>
where
    R: UserRepository,
{
    async fn get_user(&self, caller: &Caller, target: &Username) -> Result<User, Error> {
        self.get_user_by_username(caller, target)
            .await
            .map_err(Error::from)
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.get_users().await.map_err(Error::from)
    }

    async fn list_users_by_role(&self, role: &str) -> Result<Vec<User>, Error> {
        self.get_users_by_role_name(role).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
