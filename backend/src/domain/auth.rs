//! Authentication and registration inputs.
//!
//! Inbound adapters parse raw payloads into these types before calling a
//! driving port, so services only ever see validated usernames and non-empty
//! passwords. Passwords are held in [`Zeroizing`] buffers and wiped on drop.

use zeroize::Zeroizing;

use super::user::{Role, UserProfile, UserValidationError, Username};

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username failed validation.
    #[error(transparent)]
    Username(UserValidationError),
    /// Name or surname failed validation.
    #[error(transparent)]
    Profile(UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

fn validated_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and satisfies [`Username`] validation.
/// - `password` is non-empty but keeps caller-provided whitespace so the
///   derived hash matches what was registered.
///
/// # Examples
/// ```
/// use accounts::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.username().as_ref(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username =
            Username::new(username.trim()).map_err(CredentialsValidationError::Username)?;
        let password = validated_password(password)?;
        Ok(Self { username, password })
    }

    /// Username suitable for account lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    profile: UserProfile,
    role: Role,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration fields.
    pub fn try_new(
        username: &str,
        name: &str,
        surname: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, CredentialsValidationError> {
        let username =
            Username::new(username.trim()).map_err(CredentialsValidationError::Username)?;
        let profile = UserProfile::new(name.trim(), surname.trim())
            .map_err(CredentialsValidationError::Profile)?;
        let password = validated_password(password)?;
        Ok(Self {
            username,
            profile,
            role,
            password,
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Initial profile (name and surname only).
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Requested role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Plaintext password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
