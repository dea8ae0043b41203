//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes a `400 invalid_request` whose details name the
//! offending field and a stable machine-readable code.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{CredentialsValidationError, Error, Role, UserValidationError};

/// Birthdates are exchanged as calendar dates.
pub(crate) const BIRTHDATE_FORMAT: &str = "%Y-%m-%d";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyField,
    InvalidUsername,
    UsernameTooLong,
    InvalidRole,
    InvalidBirthdateFormat,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::EmptyField => "empty_field",
            Self::InvalidUsername => "invalid_username",
            Self::UsernameTooLong => "username_too_long",
            Self::InvalidRole => "invalid_role",
            Self::InvalidBirthdateFormat => "invalid_birthdate_format",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const SURNAME: FieldName = FieldName::new("surname");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const ROLE: FieldName = FieldName::new("role");
pub(crate) const ADDRESS: FieldName = FieldName::new("address");
pub(crate) const BIRTHDATE: FieldName = FieldName::new("birthdate");

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Unwrap a required request field.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, ErrorCode::EmptyField, format!("{name} must not be empty"))
}

/// Map domain user validation failures onto field-scoped HTTP errors.
pub(crate) fn map_user_validation_error(err: &UserValidationError) -> Error {
    match err {
        UserValidationError::EmptyUsername => empty_field_error(USERNAME),
        UserValidationError::UsernameTooLong { .. } => {
            field_error(USERNAME, ErrorCode::UsernameTooLong, err.to_string())
        }
        UserValidationError::UsernameInvalidCharacters => {
            field_error(USERNAME, ErrorCode::InvalidUsername, err.to_string())
        }
        UserValidationError::EmptyName => empty_field_error(NAME),
        UserValidationError::EmptySurname => empty_field_error(SURNAME),
    }
}

/// Map login or registration validation failures.
pub(crate) fn map_credentials_error(err: &CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::Username(inner) | CredentialsValidationError::Profile(inner) => {
            map_user_validation_error(inner)
        }
        CredentialsValidationError::EmptyPassword => empty_field_error(PASSWORD),
    }
}

/// Parse one of the closed set of role names.
pub(crate) fn parse_role(value: &str) -> Result<Role, Error> {
    value.trim().parse().map_err(|err: crate::domain::RoleParseError| {
        field_value_error(ROLE, ErrorCode::InvalidRole, err.to_string(), err.value())
    })
}

/// Parse an optional `YYYY-MM-DD` birthdate.
pub(crate) fn parse_optional_birthdate(value: Option<&str>) -> Result<Option<NaiveDate>, Error> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), BIRTHDATE_FORMAT).map_err(|_| {
                field_value_error(
                    BIRTHDATE,
                    ErrorCode::InvalidBirthdateFormat,
                    "birthdate must be formatted YYYY-MM-DD",
                    raw,
                )
            })
        })
        .transpose()
}

/// Reject a present but blank optional text field.
pub(crate) fn non_blank_optional(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<String>, Error> {
    match value {
        Some(raw) if raw.trim().is_empty() => Err(empty_field_error(field)),
        Some(raw) => Ok(Some(raw.trim().to_owned())),
        None => Ok(None),
    }
}
