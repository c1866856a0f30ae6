//! Account lifecycle: registration, email verification, password reset,
//! and profile edits. Thin orchestration over the user repository.

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository::user as users;
use crate::db::DatabaseError;
use crate::models::User;

use super::password::{validate_password, validate_password_change, PasswordHash, PolicyError};
use super::verification::VerificationCode;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("verification code does not match")]
    CodeMismatch,

    #[error("no verification code pending")]
    NoCodePending,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Register a new account. The password policy is mandatory here — there
/// is no empty-input bypass outside the profile-edit flow.
pub fn register(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<User, AccountError> {
    if !EMAIL_RE.is_match(email) {
        return Err(AccountError::InvalidEmail);
    }
    validate_password(password)?;

    let user = User::new(
        email.to_string(),
        first_name.to_string(),
        last_name.to_string(),
        PasswordHash::derive(password),
    );
    users::insert_user(conn, &user)?;
    tracing::info!(user_id = %user.id, "account registered, verification pending");
    Ok(user)
}

/// Check credentials. Unknown email and wrong password collapse into the
/// same error so the response does not leak which one failed.
pub fn login(conn: &Connection, email: &str, password: &str) -> Result<User, AccountError> {
    let user = match users::get_user_by_email(conn, email) {
        Ok(user) => user,
        Err(DatabaseError::NotFound { .. }) => return Err(AccountError::InvalidCredentials),
        Err(e) => return Err(e.into()),
    };
    if !user.password.verify(password) {
        return Err(AccountError::InvalidCredentials);
    }
    Ok(user)
}

/// Confirm the pending verification code; on match the account becomes
/// verified and the code is consumed.
pub fn verify_code(conn: &Connection, email: &str, submitted: &str) -> Result<User, AccountError> {
    let user = users::get_user_by_email(conn, email)?;
    let code = user
        .verification_code
        .as_ref()
        .ok_or(AccountError::NoCodePending)?;
    if !code.matches(submitted) {
        return Err(AccountError::CodeMismatch);
    }
    users::mark_verified(conn, user.id)?;
    tracing::info!(user_id = %user.id, "account verified");
    users::get_user(conn, user.id).map_err(Into::into)
}

/// Issue a fresh reset code through the same generation routine used at
/// registration. Dispatching it to the user is an external concern.
pub fn forgot_password(conn: &Connection, email: &str) -> Result<(), AccountError> {
    let user = users::get_user_by_email(conn, email)?;
    let code = VerificationCode::issue();
    users::set_verification_code(conn, user.id, Some(&code))?;
    tracing::info!(user_id = %user.id, "password reset code issued");
    Ok(())
}

/// Check a reset code without consuming it (the confirmation page).
pub fn check_reset_code(conn: &Connection, email: &str, submitted: &str) -> Result<(), AccountError> {
    let user = users::get_user_by_email(conn, email)?;
    let code = user
        .verification_code
        .as_ref()
        .ok_or(AccountError::NoCodePending)?;
    if !code.matches(submitted) {
        return Err(AccountError::CodeMismatch);
    }
    Ok(())
}

/// Overwrite the password after a successful code check. The code is a
/// one-shot token: it is consumed together with the hash update.
pub fn reset_password(
    conn: &Connection,
    email: &str,
    submitted: &str,
    new_password: &str,
) -> Result<(), AccountError> {
    check_reset_code(conn, email, submitted)?;
    validate_password(new_password)?;

    let user = users::get_user_by_email(conn, email)?;
    users::set_password(conn, user.id, &PasswordHash::derive(new_password))?;
    tracing::info!(user_id = %user.id, "password reset completed");
    Ok(())
}

/// Edit profile fields. An absent or empty password means "keep the
/// current one" — the stored hash is not touched.
pub fn update_profile(
    conn: &Connection,
    user_id: Uuid,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: Option<&str>,
) -> Result<User, AccountError> {
    if !EMAIL_RE.is_match(email) {
        return Err(AccountError::InvalidEmail);
    }
    let new_password = validate_password_change(password)?;

    let mut user = users::get_user(conn, user_id)?;
    user.first_name = first_name.to_string();
    user.last_name = last_name.to_string();
    user.email = email.to_string();
    if let Some(raw) = new_password {
        user.password = PasswordHash::derive(raw);
    }
    users::update_user(conn, &user)?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    const PASSWORD: &str = "ABcd123!x";

    fn registered(conn: &Connection) -> User {
        register(conn, "Ana", "Rojas", "ana@example.com", PASSWORD).unwrap()
    }

    #[test]
    fn register_rejects_bad_email_and_weak_password() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(
            register(&conn, "Ana", "Rojas", "not-an-email", PASSWORD),
            Err(AccountError::InvalidEmail)
        ));
        assert!(matches!(
            register(&conn, "Ana", "Rojas", "ana@example.com", "weak"),
            Err(AccountError::Policy(PolicyError::TooShort))
        ));
    }

    #[test]
    fn login_accepts_correct_credentials_only() {
        let conn = open_memory_database().unwrap();
        registered(&conn);

        assert!(login(&conn, "ana@example.com", PASSWORD).is_ok());
        assert!(matches!(
            login(&conn, "ana@example.com", "Wrong123!pw"),
            Err(AccountError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&conn, "nobody@example.com", PASSWORD),
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[test]
    fn verification_transitions_to_verified_and_consumes_code() {
        let conn = open_memory_database().unwrap();
        let user = registered(&conn);
        let code = user.verification_code.as_ref().unwrap().as_str().to_string();

        assert!(matches!(
            verify_code(&conn, "ana@example.com", "000000"),
            Err(AccountError::CodeMismatch)
        ));

        let verified = verify_code(&conn, "ana@example.com", &code).unwrap();
        assert!(verified.verified);
        assert!(verified.verification_code.is_none());

        // No code pending anymore — a second attempt cannot succeed
        assert!(matches!(
            verify_code(&conn, "ana@example.com", &code),
            Err(AccountError::NoCodePending)
        ));
    }

    #[test]
    fn reset_flow_reissues_checks_and_consumes_the_code() {
        let conn = open_memory_database().unwrap();
        let user = registered(&conn);

        forgot_password(&conn, "ana@example.com").unwrap();
        let reissued = users::get_user(&conn, user.id).unwrap();
        let code = reissued.verification_code.as_ref().unwrap().as_str().to_string();

        // Checking does not consume
        check_reset_code(&conn, "ana@example.com", &code).unwrap();
        check_reset_code(&conn, "ana@example.com", &code).unwrap();

        reset_password(&conn, "ana@example.com", &code, "NEwpw456$a").unwrap();
        assert!(login(&conn, "ana@example.com", "NEwpw456$a").is_ok());
        assert!(matches!(
            login(&conn, "ana@example.com", PASSWORD),
            Err(AccountError::InvalidCredentials)
        ));

        // One-shot: the code is gone after the reset
        assert!(matches!(
            check_reset_code(&conn, "ana@example.com", &code),
            Err(AccountError::NoCodePending)
        ));
    }

    #[test]
    fn reset_password_enforces_the_mandatory_policy() {
        let conn = open_memory_database().unwrap();
        registered(&conn);
        forgot_password(&conn, "ana@example.com").unwrap();
        let user = users::get_user_by_email(&conn, "ana@example.com").unwrap();
        let code = user.verification_code.as_ref().unwrap().as_str().to_string();

        assert!(matches!(
            reset_password(&conn, "ana@example.com", &code, "short"),
            Err(AccountError::Policy(PolicyError::TooShort))
        ));
    }

    #[test]
    fn profile_edit_with_empty_password_keeps_the_hash() {
        let conn = open_memory_database().unwrap();
        let user = registered(&conn);
        let stored_before = users::get_user(&conn, user.id)
            .unwrap()
            .password
            .as_stored()
            .to_string();

        update_profile(&conn, user.id, "Ana María", "Rojas", "ana@example.com", Some(""))
            .unwrap();

        let after = users::get_user(&conn, user.id).unwrap();
        assert_eq!(after.first_name, "Ana María");
        assert_eq!(after.password.as_stored(), stored_before);
        assert!(login(&conn, "ana@example.com", PASSWORD).is_ok());
    }

    #[test]
    fn profile_edit_with_new_password_rehashes() {
        let conn = open_memory_database().unwrap();
        let user = registered(&conn);

        update_profile(
            &conn,
            user.id,
            "Ana",
            "Rojas",
            "ana@example.com",
            Some("NEwpw456$a"),
        )
        .unwrap();
        assert!(login(&conn, "ana@example.com", "NEwpw456$a").is_ok());
    }
}
