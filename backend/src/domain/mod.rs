//! Domain primitives, access rules, and the account service.
//!
//! Purpose: define strongly typed account entities and the rules that govern
//! who may read, edit, or delete them. Types are transport agnostic; adapters
//! translate them to HTTP payloads and database rows.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - User, Username, Role, UserProfile: account model.
//! - Caller and the `authorize_*` rules: access decisions.
//! - StoredCredential: salted password digest.
//! - UserService: implementation of the driving ports.

pub mod auth;
pub mod authorization;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::authorization::{
    AccessDenied, Caller, authorize_delete, authorize_read, authorize_update,
};
pub use self::credentials::{CredentialError, HASH_LEN, SALT_LEN, StoredCredential};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{
    Role, RoleParseError, USERNAME_MAX, User, UserProfile, UserValidationError, Username,
};
pub use self::user_service::{UserService, UserServiceError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use accounts::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
