//! User account data model.
//!
//! A [`User`] couples an immutable identity (username and role) with the
//! profile fields account holders may edit. Credentials live alongside the
//! user in storage but are modelled separately in
//! [`crate::domain::credentials`] so they never travel with the profile.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was empty once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`] characters.
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// Username contained whitespace or path separators.
    #[error("username may not contain whitespace or '/'")]
    UsernameInvalidCharacters,
    /// Name was empty once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Surname was empty once trimmed.
    #[error("surname must not be empty")]
    EmptySurname,
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Usernames appear as URL path segments, so separators are excluded.
        Regex::new(r"^[^\s/]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Stable, unique account identifier chosen at registration.
///
/// # Examples
/// ```
/// use accounts::domain::Username;
///
/// let name = Username::new("mario.rossi").unwrap();
/// assert_eq!(name.as_ref(), "mario.rossi");
/// assert!(Username::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Error returned when parsing a role outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{value}'; expected Customer, Manager, or Admin")]
pub struct RoleParseError {
    value: String,
}

impl RoleParseError {
    /// The rejected input.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// Account role. Closed set, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Shop customer.
    Customer,
    /// Store manager.
    Manager,
    /// Administrator with authority over other accounts.
    Admin,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 3] = [Role::Customer, Role::Manager, Role::Admin];

    /// Canonical string form as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }

    /// Whether this role is [`Role::Admin`].
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleParseError {
                value: s.to_owned(),
            })
    }
}

/// Profile fields an account holder may change after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    name: String,
    surname: String,
    address: Option<String>,
    birthdate: Option<NaiveDate>,
}

impl UserProfile {
    /// Build a profile, requiring non-blank name and surname.
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let surname = surname.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if surname.trim().is_empty() {
            return Err(UserValidationError::EmptySurname);
        }
        Ok(Self {
            name,
            surname,
            address: None,
            birthdate: None,
        })
    }

    /// Attach a postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach a birthdate.
    #[must_use]
    pub fn with_birthdate(mut self, birthdate: NaiveDate) -> Self {
        self.birthdate = Some(birthdate);
        self
    }

    /// Given name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Family name.
    pub fn surname(&self) -> &str {
        self.surname.as_str()
    }

    /// Postal address, if recorded.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Date of birth, if recorded.
    pub fn birthdate(&self) -> Option<NaiveDate> {
        self.birthdate
    }
}

/// Registered account.
///
/// ## Invariants
/// - `username` and `role` never change after creation; only the profile is
///   replaced by updates (see [`User::with_profile`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    username: Username,
    role: Role,
    profile: UserProfile,
}

impl User {
    /// Build a user from validated components.
    pub fn new(username: Username, role: Role, profile: UserProfile) -> Self {
        Self {
            username,
            role,
            profile,
        }
    }

    /// Fallible constructor from raw strings, for fixtures and row mapping.
    pub fn try_from_parts(
        username: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            Username::new(username)?,
            role,
            UserProfile::new(name, surname)?,
        ))
    }

    /// Replace the editable profile, keeping identity and role.
    #[must_use]
    pub fn with_profile(self, profile: UserProfile) -> Self {
        Self { profile, ..self }
    }

    /// Unique account identifier.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Account role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Editable profile fields.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Given name.
    pub fn name(&self) -> &str {
        self.profile.name()
    }

    /// Family name.
    pub fn surname(&self) -> &str {
        self.profile.surname()
    }

    /// Postal address, if recorded.
    pub fn address(&self) -> Option<&str> {
        self.profile.address()
    }

    /// Date of birth, if recorded.
    pub fn birthdate(&self) -> Option<NaiveDate> {
        self.profile.birthdate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    username: String,
    name: String,
    surname: String,
    role: Role,
    address: Option<String>,
    birthdate: Option<NaiveDate>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            username,
            role,
            profile,
        } = value;
        Self {
            username: username.into(),
            name: profile.name,
            surname: profile.surname,
            role,
            address: profile.address,
            birthdate: profile.birthdate,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let UserDto {
            username,
            name,
            surname,
            role,
            address,
            birthdate,
        } = value;
        let mut profile = UserProfile::new(name, surname)?;
        profile.address = address;
        profile.birthdate = birthdate;
        Ok(Self::new(Username::new(username)?, role, profile))
    }
}
