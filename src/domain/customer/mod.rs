//! Customer aggregate
//!
//! Contains the Customer record, its enumerations, DTOs, aggregate row
//! types and the repository interface.

pub mod aggregates;
pub mod model;
pub mod repository;

mod dto_create;
mod dto_filter;
mod dto_update;

// Re-export model types
pub use model::{Customer, CustomerStatus, CustomerType, InstallationType};

// Re-export DTOs
pub use dto_create::CreateCustomerDto;
pub use dto_filter::CustomerFilter;
pub use dto_update::UpdateCustomerDto;

// Re-export aggregate rows
pub use aggregates::{
    CityDistribution, InstallationEnergy, InstallationTypeCount, StateDistribution, StatusCount,
    TypeStatusCount,
};

// Re-export repository trait
pub use repository::CustomerRepository;
