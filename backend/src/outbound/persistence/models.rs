//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::users;

/// Profile columns read for listings and lookups.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub role: String,
    pub address: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

/// Profile plus credential columns, read during authentication.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password: Option<String>,
    pub salt: Option<Vec<u8>>,
}

/// Insertable struct for registering accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub name: &'a str,
    pub surname: &'a str,
    pub role: &'a str,
    pub address: Option<&'a str>,
    pub birthdate: Option<NaiveDate>,
    pub password: &'a str,
    pub salt: &'a [u8],
}

/// Changeset for the editable profile columns.
///
/// `None` values clear the column rather than leaving it untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileUpdate<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub address: Option<&'a str>,
    pub birthdate: Option<NaiveDate>,
}
