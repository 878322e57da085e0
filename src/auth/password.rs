//! Argon2id password hashing and verification.
//!
//! Hashes are stored in PHC string format, so the salt and parameters travel
//! with the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// A valid hash of a throwaway secret. Logins for unknown usernames verify
/// against it so they cost the same as a wrong password.
pub fn dummy_hash() -> Option<&'static str> {
    static DUMMY: Lazy<Option<String>> =
        Lazy::new(|| hash_password(&crate::auth::sessions::new_token()).ok());
    DUMMY.as_deref()
}

/// Username: 3–32 characters of ASCII letters, digits, `_`, `-` or `.`.
pub fn validate_username(username: &str) -> Result<(), String> {
    let name = username.trim();
    if name.len() < 3 || name.len() > 32 {
        return Err("username must be 3-32 characters".into());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err("username may only contain letters, digits, '_', '-' and '.'".into());
    }
    Ok(())
}

pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_hash_is_valid_and_matches_nothing_guessable() {
        let hash = dummy_hash().expect("dummy hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("", hash).expect("verify"));
        assert!(!verify_password("pw123456", hash).expect("verify"));
    }

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("pw123456").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw123456", &hash).expect("verify"));
        assert!(!verify_password("pw654321", &hash).expect("verify"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("pw123456").expect("hash");
        let b = hash_password("pw123456").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("pw123456", "not-a-phc-string").is_err());
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password_strength("short", 8).is_err());
        assert!(validate_password_strength("pw123456", 8).is_ok());
    }
}
