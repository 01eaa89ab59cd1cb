// [libs/domain/auth/src/password.rs]
use crate::errors::AuthError;

/// PBKDF2 round count for freshly hashed passwords. `pbkdf2_simple` embeds the
/// round count, salt, and digest in one self-describing string, so this
/// constant only governs new hashes -- verifying an older hash with a
/// different round count still works.
const PBKDF2_ROUNDS: u32 = 100_000;

/// Hashes a plaintext password into a self-contained digest string suitable
/// for storage in `User.password_digest`.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    pbkdf2::pbkdf2_simple(plaintext, PBKDF2_ROUNDS).map_err(|err| AuthError::HashingFailure(err.to_string()))
}

/// Verifies a plaintext password against a stored digest produced by
/// [`hash_password`]. Returns `Ok` on match, `Err(AuthError::InvalidCredentials)`
/// otherwise -- never leaks whether the failure was a mismatch or a malformed digest.
pub fn verify_password(plaintext: &str, digest: &str) -> Result<(), AuthError> {
    pbkdf2::pbkdf2_check(plaintext, digest).map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_correct_password() {
        let digest = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &digest).is_ok());
    }

    #[test]
    fn rejects_an_incorrect_password() {
        let digest = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("wrong password", &digest).is_err());
    }

    #[test]
    fn produces_distinct_digests_for_the_same_password() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b, "salts should differ between hashes");
    }
}
