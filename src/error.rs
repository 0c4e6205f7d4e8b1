//! Error taxonomy shared by every store operation.

use thiserror::Error;

/// Failure kinds a store operation can report.
///
/// Only `Conflict` is worth retrying, and only after the caller has reloaded
/// the row it was editing.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested id does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A field or reference rule was violated. Nothing was written.
    #[error("{0}")]
    Validation(String),

    /// The row changed since the caller read it, or is still referenced.
    #[error("{0}")]
    Conflict(String),

    /// Anything else the database reported.
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        StoreError::NotFound(format!("{} {} not found", entity, id))
    }

    pub fn modified_concurrently(entity: &str) -> Self {
        StoreError::Conflict(format!(
            "The {} was modified by another user. Please refresh and try again.",
            entity
        ))
    }

    /// Whether the underlying database rejected the write on a foreign key.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            StoreError::Storage(sqlx::Error::Database(db_err)) => db_err.is_foreign_key_violation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_the_entity() {
        let err = StoreError::modified_concurrently("subcategory");
        assert_eq!(
            err.to_string(),
            "The subcategory was modified by another user. Please refresh and try again."
        );
    }

    #[test]
    fn storage_errors_carry_the_driver_message() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Database error: "));
        assert!(!err.is_foreign_key_violation());
    }
}
