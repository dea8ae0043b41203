//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes the table.

diesel::table! {
    /// Registered accounts with their credentials.
    ///
    /// `password` holds the hex-encoded digest and `salt` the raw salt bytes.
    /// Both are nullable so rows imported without credentials cannot log in.
    users (username) {
        username -> Varchar,
        name -> Varchar,
        surname -> Varchar,
        /// One of `Customer`, `Manager`, `Admin`.
        role -> Varchar,
        address -> Nullable<Varchar>,
        birthdate -> Nullable<Date>,
        password -> Nullable<Varchar>,
        salt -> Nullable<Bytea>,
    }
}
