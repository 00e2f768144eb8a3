//! Credential hashing and verification.
//!
//! Stored credentials come in two shapes: bcrypt hashes (modular-crypt
//! strings with a `$2` prefix) written by registration, and legacy plaintext
//! values that predate hashing. Verification must handle both; a corrupt hash
//! is an internal failure, never a plain "wrong password".

use anyhow::{Result, anyhow};

/// Prefix shared by all bcrypt variants ($2a$, $2b$, $2y$).
const BCRYPT_PREFIX: &str = "$2";

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| anyhow!("bcrypt hash failed: {e}"))
}

/// Check a submitted plaintext password against a stored credential.
///
/// Returns `Ok(true)`/`Ok(false)` for a decided match, `Err` when the stored
/// hash cannot be parsed or the comparison itself fails. Callers map the
/// error to a 500, not a 401.
pub fn verify_credential(submitted: &str, stored: &str) -> Result<bool> {
    if stored.starts_with(BCRYPT_PREFIX) {
        // Library verify recomputes the hash and compares in constant time.
        return bcrypt::verify(submitted, stored).map_err(|e| anyhow!("bcrypt verify failed: {e}"));
    }
    // Legacy plaintext row: exact, case-sensitive compare.
    Ok(submitted == stored)
}

/// Check a submitted password against the nullable stored column. A NULL
/// credential never matches anything, not even an empty submission.
pub fn verify_stored_credential(submitted: &str, stored: Option<&str>) -> Result<bool> {
    match stored {
        Some(stored) => verify_credential(submitted, stored),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_hash(password: &str) -> String {
        // minimum bcrypt cost keeps the test suite fast; cost does not change the format
        bcrypt::hash(password, 4).unwrap()
    }

    #[test]
    fn hashed_credential_round_trip() {
        let phc = quick_hash("s3cret!");
        assert!(phc.starts_with("$2"));
        assert_ne!(phc, "s3cret!");
        assert!(verify_credential("s3cret!", &phc).unwrap());
        assert!(!verify_credential("S3cret!", &phc).unwrap());
        assert!(!verify_credential("", &phc).unwrap());
    }

    #[test]
    fn legacy_plaintext_exact_match_only() {
        assert!(verify_credential("letmein", "letmein").unwrap());
        assert!(!verify_credential("LetMeIn", "letmein").unwrap());
        assert!(!verify_credential("letmein ", "letmein").unwrap());
        // Empty stored value only matches an empty submission
        assert!(verify_credential("", "").unwrap());
        assert!(!verify_credential("x", "").unwrap());
    }

    #[test]
    fn null_stored_credential_never_matches() {
        // A NULL password column denies every submission, including the
        // empty string — NULL is not the same as a stored empty password.
        assert!(!verify_stored_credential("", None).unwrap());
        assert!(!verify_stored_credential("anything", None).unwrap());
        // The Some path still delegates to the dual-mode check
        assert!(verify_stored_credential("", Some("")).unwrap());
        let phc = quick_hash("pw");
        assert!(verify_stored_credential("pw", Some(&phc)).unwrap());
        assert!(!verify_stored_credential("nope", Some(&phc)).unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error_not_a_mismatch() {
        let err = verify_credential("whatever", "$2b$not-a-real-hash");
        assert!(err.is_err());
    }

    #[test]
    fn stored_plaintext_resembling_other_schemes_is_compared_literally() {
        // Only the $2 prefix selects the hash path
        assert!(verify_credential("$argon2id$something", "$argon2id$something").unwrap());
        assert!(!verify_credential("other", "$argon2id$something").unwrap());
    }
}
