//! Password hashing and verification

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use taller_types::{Error, Result};

/// How a stored password value is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordFormat {
    /// PHC string produced by [`hash_password`]
    Argon2,
    /// Hash written by another tool (bcrypt); cannot be verified here
    ForeignHash,
    /// Legacy clear text
    Plaintext,
}

impl PasswordFormat {
    pub fn detect(stored: &str) -> Self {
        if stored.starts_with("$argon2") {
            PasswordFormat::Argon2
        } else if ["$2a$", "$2b$", "$2y$"].iter().any(|p| stored.starts_with(p)) {
            PasswordFormat::ForeignHash
        } else {
            PasswordFormat::Plaintext
        }
    }
}

pub fn is_password_hash(stored: &str) -> bool {
    PasswordFormat::detect(stored) == PasswordFormat::Argon2
}

/// Hash a password with Argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check `password` against a stored value
///
/// Plaintext values compare directly so accounts keep working until the
/// next bootstrap rehashes them. Foreign hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordFormat::detect(stored) {
        PasswordFormat::Argon2 => match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        },
        PasswordFormat::ForeignHash => false,
        PasswordFormat::Plaintext => !stored.is_empty() && stored == password,
    }
}
