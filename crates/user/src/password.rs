use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{UserError, UserResult};

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserError::Hashing(e.to_string()))?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored Argon2 hash. A mismatch is `Ok(false)`,
/// not an error; only an unparseable hash fails.
pub fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| UserError::Hashing(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
