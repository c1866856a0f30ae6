//! One-shot 6-digit verification codes for email confirmation and
//! password reset.

use rand::Rng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

/// A pending verification code. Comparison is constant-time; equality via
/// `==` is intentionally not derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generate a fresh code, uniform in `[100000, 999999]`.
    pub fn issue() -> Self {
        Self(rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX).to_string())
    }

    /// Wrap a code read back from the database.
    pub fn from_stored(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a submitted code.
    pub fn matches(&self, submitted: &str) -> bool {
        self.0.as_bytes().ct_eq(submitted.as_bytes()).into()
    }
}
