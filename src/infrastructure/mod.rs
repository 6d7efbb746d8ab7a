//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod storage;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, DatabaseConfig};
pub use storage::{InMemoryCustomerRepository, InMemoryRepositoryProvider, InMemoryUserRepository};
