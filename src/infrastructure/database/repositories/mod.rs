//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod customer_repository;
pub mod repository_provider;
pub mod user_repository;

pub use customer_repository::CustomerRepositoryImpl;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::UserRepository;

use sea_orm::{DbErr, SqlErr};
use tracing::error;

use crate::domain::DomainError;

pub(crate) fn db_err(e: DbErr) -> DomainError {
    error!(error = %e, "Database error");
    DomainError::Storage(e.to_string())
}

/// Like [`db_err`], but a unique-constraint violation becomes `Conflict`.
pub(crate) fn write_err(e: DbErr, conflict_message: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict(conflict_message.to_string())
        }
        _ => db_err(e),
    }
}
