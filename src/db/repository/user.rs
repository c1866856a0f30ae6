use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::auth::password::PasswordHash;
use crate::auth::verification::VerificationCode;
use crate::db::DatabaseError;
use crate::models::User;

use super::map_constraint;

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, email, first_name, last_name, password_hash, verification_code, verified)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id.to_string(),
            user.email,
            user.first_name,
            user.last_name,
            user.password.as_stored(),
            user.verification_code.as_ref().map(|c| c.as_str()),
            user.verified,
        ],
    )
    .map_err(|e| map_constraint(e, "email is already registered"))?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: Uuid) -> Result<User, DatabaseError> {
    user_by(conn, "id = ?1", &id.to_string())?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "User".into(),
        id: id.to_string(),
    })
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<User, DatabaseError> {
    user_by(conn, "email = ?1", email)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "User".into(),
        id: email.into(),
    })
}

/// Update profile fields and the hash reference. The password column only
/// ever receives an existing [`PasswordHash`] encoding, so saving a user
/// whose password was not changed leaves the stored hash byte-identical.
pub fn update_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE users SET email = ?2, first_name = ?3, last_name = ?4,
                    password_hash = ?5, verification_code = ?6, verified = ?7
             WHERE id = ?1",
            params![
                user.id.to_string(),
                user.email,
                user.first_name,
                user.last_name,
                user.password.as_stored(),
                user.verification_code.as_ref().map(|c| c.as_str()),
                user.verified,
            ],
        )
        .map_err(|e| map_constraint(e, "email is already registered"))?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: user.id.to_string(),
        });
    }
    Ok(())
}

/// Store a freshly issued verification code (or clear it with `None`).
pub fn set_verification_code(
    conn: &Connection,
    user_id: Uuid,
    code: Option<&VerificationCode>,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE users SET verification_code = ?2 WHERE id = ?1",
        params![user_id.to_string(), code.map(|c| c.as_str())],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: user_id.to_string(),
        });
    }
    Ok(())
}

/// Flip to verified and consume the pending code.
pub fn mark_verified(conn: &Connection, user_id: Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE users SET verified = 1, verification_code = NULL WHERE id = ?1",
        params![user_id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: user_id.to_string(),
        });
    }
    Ok(())
}

/// Overwrite the password hash and consume the reset code in one step.
pub fn set_password(
    conn: &Connection,
    user_id: Uuid,
    hash: &PasswordHash,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE users SET password_hash = ?2, verification_code = NULL WHERE id = ?1",
        params![user_id.to_string(), hash.as_stored()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: user_id.to_string(),
        });
    }
    Ok(())
}

pub fn count_users(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

type UserRow = (String, String, String, String, String, Option<String>, bool);

fn user_by(conn: &Connection, filter: &str, value: &str) -> Result<Option<User>, DatabaseError> {
    let sql = format!(
        "SELECT id, email, first_name, last_name, password_hash, verification_code, verified
         FROM users WHERE {filter}"
    );
    let row: Option<UserRow> = conn
        .query_row(&sql, params![value], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        })
        .optional()?;

    let Some((id, email, first_name, last_name, hash, code, verified)) = row else {
        return Ok(None);
    };
    Ok(Some(User {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        email,
        first_name,
        last_name,
        password: PasswordHash::from_stored(hash),
        verification_code: code.map(VerificationCode::from_stored),
        verified,
    }))
}
