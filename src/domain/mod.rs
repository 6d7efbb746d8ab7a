//! Domain layer: records, value types, repository contracts and the
//! pure calculations (solar estimate, dashboard helpers).

pub mod customer;
pub mod dashboard;
pub mod repositories;
pub mod solar;
pub mod user;

// Re-export commonly used types
pub use customer::{
    CreateCustomerDto, Customer, CustomerFilter, CustomerRepository, CustomerStatus, CustomerType,
    InstallationType, UpdateCustomerDto,
};
pub use repositories::RepositoryProvider;
pub use user::{CreateUserDto, UpdateUserDto, User, UserRepositoryInterface, UserRole};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, DomainResult};
