//! In-memory repository implementations

mod memory;

pub use memory::{InMemoryCustomerRepository, InMemoryRepositoryProvider, InMemoryUserRepository};
