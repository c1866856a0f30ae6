use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::PasswordHash;
use crate::auth::verification::VerificationCode;

/// Clinician account. The password field only admits [`PasswordHash`],
/// so a plaintext or double-hashed value is unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: PasswordHash,
    pub verification_code: Option<VerificationCode>,
    pub verified: bool,
}

impl User {
    /// Build a new unverified account with a pending verification code.
    pub fn new(email: String, first_name: String, last_name: String, password: PasswordHash) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            password,
            verification_code: Some(VerificationCode::issue()),
            verified: false,
        }
    }
}
