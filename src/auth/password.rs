use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::AppConfig;
use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Check a typed password against the configured shared secret.
/// The plain password wins when both a plain password and a hash are set.
pub fn check_shared_password(config: &AppConfig, typed: &str) -> Result<bool, AppError> {
    if let Some(plain) = &config.mod_password {
        return Ok(constant_time_eq(plain, typed));
    }
    match &config.mod_password_hash {
        Some(hash) => verify_password(typed, hash).map_err(AppError::Hash),
        None => Err(AppError::Config("no moderator password configured".to_string())),
    }
}

/// Constant-time string comparison to prevent timing attacks.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_password_is_preferred() {
        let mut cfg = AppConfig::with_password("letmein");
        cfg.mod_password_hash = Some(hash_password("other").unwrap());
        assert!(check_shared_password(&cfg, "letmein").unwrap());
        assert!(!check_shared_password(&cfg, "other").unwrap());
        assert!(!check_shared_password(&cfg, "letmei").unwrap());
    }

    #[test]
    fn falls_back_to_hash() {
        let mut cfg = AppConfig::with_password("x");
        cfg.mod_password = None;
        cfg.mod_password_hash = Some(hash_password("s3cret").unwrap());
        assert!(check_shared_password(&cfg, "s3cret").unwrap());
        assert!(!check_shared_password(&cfg, "wrong").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let mut cfg = AppConfig::with_password("x");
        cfg.mod_password = None;
        cfg.mod_password_hash = Some("$2a$12$bcrypt-style".to_string());
        assert!(matches!(check_shared_password(&cfg, "x"), Err(AppError::Hash(_))));
    }

    #[test]
    fn unconfigured_password_is_an_error() {
        let mut cfg = AppConfig::with_password("x");
        cfg.mod_password = None;
        assert!(matches!(check_shared_password(&cfg, "x"), Err(AppError::Config(_))));
    }

    #[test]
    fn constant_time_eq_compares_contents() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
    }
}
