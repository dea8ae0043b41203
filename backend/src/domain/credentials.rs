//! Salted password hashes.
//!
//! Passwords are stretched with Argon2id (default parameters) into a
//! [`HASH_LEN`]-byte digest using a per-account random salt. The digest is
//! persisted hex-encoded next to the raw salt bytes. Verification re-derives
//! the digest and compares it in constant time.
//!
//! Argon2 costs tens of milliseconds per call, so async callers go through
//! [`StoredCredential::derive_blocking`] and
//! [`StoredCredential::verify_blocking`], which run on Tokio's blocking pool.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::Output;
use rand::RngCore;
use zeroize::Zeroizing;

/// Length of freshly generated salts, in bytes.
pub const SALT_LEN: usize = 16;

/// Length of the derived password digest, in bytes.
pub const HASH_LEN: usize = 32;

/// Failures while deriving a password digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// The key-derivation function rejected its inputs.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
    /// The blocking hashing task panicked or was cancelled.
    #[error("password hashing task aborted: {message}")]
    Task { message: String },
}

fn task_error(err: tokio::task::JoinError) -> CredentialError {
    CredentialError::Task {
        message: err.to_string(),
    }
}

fn derive_digest(
    password: &[u8],
    salt: &[u8],
) -> Result<Zeroizing<[u8; HASH_LEN]>, CredentialError> {
    let mut digest = Zeroizing::new([0_u8; HASH_LEN]);
    Argon2::default()
        .hash_password_into(password, salt, &mut digest[..])
        .map_err(|err| CredentialError::Hashing {
            message: err.to_string(),
        })?;
    Ok(digest)
}

/// Password digest and salt as persisted for one account.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential {
    password_hash: String,
    salt: Vec<u8>,
}

impl StoredCredential {
    /// Hash `password` under a fresh random salt.
    pub fn derive(password: &str) -> Result<Self, CredentialError> {
        let mut salt = vec![0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::derive_with_salt(password, salt)
    }

    /// Hash `password` under a caller-supplied salt.
    pub fn derive_with_salt(password: &str, salt: Vec<u8>) -> Result<Self, CredentialError> {
        let digest = derive_digest(password.as_bytes(), &salt)?;
        Ok(Self {
            password_hash: hex::encode(&digest[..]),
            salt,
        })
    }

    /// [`Self::derive`] on the blocking thread pool.
    pub async fn derive_blocking(password: Zeroizing<String>) -> Result<Self, CredentialError> {
        tokio::task::spawn_blocking(move || Self::derive(&password))
            .await
            .map_err(task_error)?
    }

    /// Rehydrate a credential read from storage.
    pub fn from_stored(password_hash: impl Into<String>, salt: Vec<u8>) -> Self {
        Self {
            password_hash: password_hash.into(),
            salt,
        }
    }

    /// Hex-encoded digest.
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    /// Raw salt bytes.
    pub fn salt(&self) -> &[u8] {
        self.salt.as_slice()
    }

    /// Whether `password` hashes to the stored digest.
    ///
    /// Malformed stored values never match. The final comparison runs in
    /// constant time with respect to the digest contents.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::StoredCredential;
    ///
    /// let credential = StoredCredential::derive_with_salt("s3cret", vec![7; 16]).unwrap();
    /// assert!(credential.verify("s3cret"));
    /// assert!(!credential.verify("S3cret"));
    /// ```
    pub fn verify(&self, password: &str) -> bool {
        let Ok(expected) = hex::decode(&self.password_hash) else {
            return false;
        };
        if expected.len() != HASH_LEN {
            return false;
        }
        let Ok(actual) = derive_digest(password.as_bytes(), &self.salt) else {
            return false;
        };
        match (Output::new(&expected), Output::new(&actual[..])) {
            // `Output` equality is implemented with a constant-time comparison.
            (Ok(expected), Ok(actual)) => expected == actual,
            _ => false,
        }
    }
}

impl StoredCredential {
    /// [`Self::verify`] on the blocking thread pool.
    pub async fn verify_blocking(self, password: Zeroizing<String>) -> Result<bool, CredentialError> {
        tokio::task::spawn_blocking(move || self.verify(&password))
            .await
            .map_err(task_error)
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("password_hash", &"<redacted>")
            .field("salt_len", &self.salt.len())
            .finish()
    }
}
