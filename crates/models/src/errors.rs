use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    /// A unique index rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    /// A foreign key still points at the row being removed.
    #[error("row is still referenced: {0}")]
    Referenced(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ModelError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ModelError::Referenced(msg),
            _ => ModelError::Db(e.to_string()),
        }
    }
}
