use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Verified against when the name is unknown, so both failure paths pay for one argon2 run.
/// Uses the same parameters as `Argon2::default()`; no password matches it.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$pBfoftdOhiGn6FJg8m5zxA$QhwXuUBzhmDMiNzGc3+ZEIp+ZVpc0YmE16nwZox+iHU";

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// A stored hash that cannot be parsed counts as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hashed) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
