//! Stable error codes for the console.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Db(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid number: {0:?}")]
    Parse(String),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "DB_ERROR",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Parse(_) => "PARSE_ERROR",
            Self::SessionClosed => "SESSION_CLOSED",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Errors the menu reports and then simply asks again.
    pub fn is_recoverable_input(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::NotFound(_) | Self::Validation(_))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            if err.code == rusqlite::ErrorCode::ConstraintViolation {
                return AppError::ConstraintViolation(e.to_string());
            }
        }
        match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(e.to_string()),
            other => AppError::Db(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_maps_to_not_found() {
        let err: AppError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn constraint_failure_maps_to_constraint_violation() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x TEXT NOT NULL)").unwrap();
        let err: AppError = conn
            .execute("INSERT INTO t (x) VALUES (NULL)", [])
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "CONSTRAINT_VIOLATION");
    }

    #[test]
    fn input_errors_are_recoverable() {
        assert!(AppError::Parse("abc".into()).is_recoverable_input());
        assert!(AppError::NotFound("department 9".into()).is_recoverable_input());
        assert!(!AppError::SessionClosed.is_recoverable_input());
        assert!(!AppError::ConstraintViolation("fk".into()).is_recoverable_input());
    }
}
