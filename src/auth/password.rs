//! Password policy validation and salted PBKDF2-SHA256 hashing.
//!
//! Hashed-ness is tracked by type, not by value shape: a [`PasswordHash`]
//! comes either from `derive()` (a raw password) or `from_stored()` (the
//! database column), so re-hashing an already-hashed value is
//! unrepresentable.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const HASH_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;
const SCHEME: &str = "pbkdf2-sha256";

/// A composition rule the candidate password failed to meet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("password must be at least 8 characters long")]
    TooShort,
    #[error("password must contain at least 2 uppercase letters")]
    NotEnoughUppercase,
    #[error("password must contain at least 2 lowercase letters")]
    NotEnoughLowercase,
    #[error("password must contain at least 3 digits")]
    NotEnoughDigits,
    #[error("password must contain at least 1 special character")]
    MissingSpecial,
}

/// Validate a candidate password, returning it unchanged when it meets
/// every rule. The length rule is checked first, regardless of content.
pub fn validate_password(candidate: &str) -> Result<&str, PolicyError> {
    if candidate.chars().count() < 8 {
        return Err(PolicyError::TooShort);
    }
    if candidate.chars().filter(|c| c.is_uppercase()).count() < 2 {
        return Err(PolicyError::NotEnoughUppercase);
    }
    if candidate.chars().filter(|c| c.is_lowercase()).count() < 2 {
        return Err(PolicyError::NotEnoughLowercase);
    }
    if candidate.chars().filter(|c| c.is_ascii_digit()).count() < 3 {
        return Err(PolicyError::NotEnoughDigits);
    }
    // At least one character that is neither a word character nor whitespace
    let has_special = candidate
        .chars()
        .any(|c| !(c.is_alphanumeric() || c == '_' || c.is_whitespace()));
    if !has_special {
        return Err(PolicyError::MissingSpecial);
    }
    Ok(candidate)
}

/// Profile-edit variant: an absent or empty candidate means "do not change
/// the password" and passes through without touching the composition rules.
pub fn validate_password_change(candidate: Option<&str>) -> Result<Option<&str>, PolicyError> {
    match candidate {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => validate_password(s).map(Some),
    }
}

/// Salted PBKDF2-SHA256 password hash in its stored encoding:
/// `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derive a hash from a raw password with a fresh random salt.
    pub fn derive(password: &str) -> Self {
        Self::derive_with_salt(password, &generate_salt(), PBKDF2_ITERATIONS)
    }

    fn derive_with_salt(password: &str, salt: &[u8], iterations: u32) -> Self {
        let mut hash = [0u8; HASH_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
        Self(format!(
            "{SCHEME}${iterations}${}${}",
            BASE64.encode(salt),
            BASE64.encode(hash),
        ))
    }

    /// Wrap a value read back from the database. No hashing happens here.
    pub fn from_stored(encoded: String) -> Self {
        Self(encoded)
    }

    /// The stored encoding, as written to the database.
    pub fn as_stored(&self) -> &str {
        &self.0
    }

    /// Constant-time check of a raw password against this hash.
    /// A malformed stored value never matches.
    pub fn verify(&self, password: &str) -> bool {
        let mut parts = self.0.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(hash)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if scheme != SCHEME || parts.next().is_some() {
            return false;
        }
        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (BASE64.decode(salt), BASE64.decode(hash)) else {
            return false;
        };

        let mut candidate = [0u8; HASH_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut candidate);
        candidate.as_slice().ct_eq(&expected).into()
    }
}

/// Generate a cryptographically random salt
fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "ABcd123!x";

    #[test]
    fn valid_password_is_returned_unchanged() {
        assert_eq!(validate_password(VALID).unwrap(), VALID);
    }

    #[test]
    fn short_password_fails_with_length_rule_regardless_of_content() {
        // Meets every other rule but is 7 characters long
        assert_eq!(validate_password("AB1c2!3"), Err(PolicyError::TooShort));
        assert_eq!(validate_password(""), Err(PolicyError::TooShort));
        assert_eq!(validate_password("aaaaaaa"), Err(PolicyError::TooShort));
    }

    #[test]
    fn uppercase_rule_requires_two() {
        assert_eq!(
            validate_password("Abcd123!x"),
            Err(PolicyError::NotEnoughUppercase)
        );
    }

    #[test]
    fn lowercase_rule_requires_two() {
        assert_eq!(
            validate_password("ABCD123!x"),
            Err(PolicyError::NotEnoughLowercase)
        );
    }

    #[test]
    fn digit_rule_requires_three() {
        assert_eq!(
            validate_password("ABcdef12!"),
            Err(PolicyError::NotEnoughDigits)
        );
    }

    #[test]
    fn special_rule_rejects_word_chars_and_whitespace() {
        // Underscore is a word character, space is whitespace — neither counts
        assert_eq!(
            validate_password("ABcd123_x"),
            Err(PolicyError::MissingSpecial)
        );
        assert_eq!(
            validate_password("ABcd 1234"),
            Err(PolicyError::MissingSpecial)
        );
    }

    #[test]
    fn change_variant_passes_through_empty_as_no_change() {
        assert_eq!(validate_password_change(None).unwrap(), None);
        assert_eq!(validate_password_change(Some("")).unwrap(), None);
    }

    #[test]
    fn change_variant_validates_non_empty_input() {
        assert_eq!(validate_password_change(Some(VALID)).unwrap(), Some(VALID));
        assert_eq!(
            validate_password_change(Some("weak")),
            Err(PolicyError::TooShort)
        );
    }

    #[test]
    fn derived_hash_verifies_and_rejects() {
        let hash = PasswordHash::derive(VALID);
        assert!(hash.verify(VALID));
        assert!(!hash.verify("Wrong123!pw"));
    }

    #[test]
    fn stored_encoding_round_trips_without_rehash() {
        let hash = PasswordHash::derive(VALID);
        let stored = hash.as_stored().to_string();
        let reloaded = PasswordHash::from_stored(stored.clone());
        // Idempotence: loading and re-storing never changes the value
        assert_eq!(reloaded.as_stored(), stored);
        assert!(reloaded.verify(VALID));
    }

    #[test]
    fn two_derivations_use_distinct_salts() {
        let a = PasswordHash::derive(VALID);
        let b = PasswordHash::derive(VALID);
        assert_ne!(a.as_stored(), b.as_stored());
        assert!(a.verify(VALID) && b.verify(VALID));
    }

    #[test]
    fn malformed_stored_value_never_matches() {
        assert!(!PasswordHash::from_stored("plaintext".into()).verify("plaintext"));
        assert!(!PasswordHash::from_stored("pbkdf2-sha256$bad$x$y".into()).verify(VALID));
        assert!(!PasswordHash::from_stored(String::new()).verify(""));
    }

    #[test]
    fn encoding_names_the_scheme_and_iterations() {
        let hash = PasswordHash::derive(VALID);
        let stored = hash.as_stored();
        assert!(stored.starts_with("pbkdf2-sha256$600000$"));
        assert_eq!(stored.split('$').count(), 4);
    }
}
