use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use anyhow::Result;

/// パスワードをArgon2でハッシュ化します。
/// Djangoの `make_password` に相当する機能です。
pub fn hash_password(password: &str) -> Result<String> {
    if password.is_empty() {
        anyhow::bail!("La contraseña no puede estar vacía");
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// パスワードを検証します。ハッシュが壊れている場合も false。
/// Djangoの `check_password` に相当する機能です。
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = argon2::PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("operativo_123").expect("Failed to hash");

        assert!(verify_password("operativo_123", &hash));
        assert!(!verify_password("otra", &hash));
    }

    #[test]
    fn test_empty_password_is_rejected() {
        assert!(hash_password("").is_err());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("x", "not-a-phc-string"));
    }
}
