pub mod analysis;
pub mod catalog;
pub mod patient;
pub mod user;
pub mod visit;

use crate::db::DatabaseError;

/// Map a SQLite UNIQUE/FOREIGN KEY failure to a constraint violation with
/// a message the form layer can surface; everything else passes through.
pub(crate) fn map_constraint(err: rusqlite::Error, what: &str) -> DatabaseError {
    match err {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(what.to_string())
        }
        other => other.into(),
    }
}
