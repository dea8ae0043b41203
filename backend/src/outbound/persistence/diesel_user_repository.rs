//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Every query is parameterised through Diesel's DSL. Listings are ordered by
//! username so callers see a stable sequence.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{NewAccount, StoredAccount, UserPersistenceError, UserRepository};
use crate::domain::{Role, StoredCredential, User, UserProfile, Username};

use super::models::{AccountRow, NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Insert failures: a primary-key collision means the username is taken.
fn map_insert_error(error: diesel::result::Error, username: &Username) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_username(username.as_ref())
        }
        other => map_diesel_error(other),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        username,
        name,
        surname,
        role,
        address,
        birthdate,
    } = row;
    let role: Role = role.parse().map_err(|err| {
        warn!(%username, "stored account has an unknown role");
        UserPersistenceError::query(format!("invalid role in database: {err}"))
    })?;
    let invalid = |err| UserPersistenceError::query(format!("invalid account in database: {err}"));
    let mut profile = UserProfile::new(name, surname).map_err(invalid)?;
    if let Some(address) = address {
        profile = profile.with_address(address);
    }
    if let Some(birthdate) = birthdate {
        profile = profile.with_birthdate(birthdate);
    }
    let username = Username::new(username).map_err(invalid)?;
    Ok(User::new(username, role, profile))
}

fn row_to_account(row: AccountRow) -> Result<StoredAccount, UserPersistenceError> {
    let credential = match (row.password, row.salt) {
        (Some(password), Some(salt)) => Some(StoredCredential::from_stored(password, salt)),
        _ => None,
    };
    Ok(StoredAccount {
        user: row_to_user(row.user)?,
        credential,
    })
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(row_to_user).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(username.as_ref())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_account(
        &self,
        username: &Username,
    ) -> Result<Option<StoredAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AccountRow> = users::table
            .find(username.as_ref())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::username.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_users(rows)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::role.eq(role.as_str()))
            .order(users::username.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_users(rows)
    }

    async fn insert(&self, account: &NewAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user = &account.user;
        let row = NewUserRow {
            username: user.username().as_ref(),
            name: user.name(),
            surname: user.surname(),
            role: user.role().as_str(),
            address: user.address(),
            birthdate: user.birthdate(),
            password: account.credential.password_hash(),
            salt: account.credential.salt(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, user.username()))
    }

    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(username.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn delete_all_non_admin(&self) -> Result<usize, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(users::table.filter(users::role.ne(Role::Admin.as_str())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn update_profile(
        &self,
        username: &Username,
        profile: &UserProfile,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = UserProfileUpdate {
            name: profile.name(),
            surname: profile.surname(),
            address: profile.address(),
            birthdate: profile.birthdate(),
        };

        let row: Option<UserRow> = diesel::update(users::table.find(username.as_ref()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}
