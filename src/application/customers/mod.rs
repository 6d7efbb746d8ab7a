//! Customer use-cases: CRUD, statistics and solar-potential estimates.

pub mod service;

pub use service::{
    CustomerService, CustomerStatistics, InstallationTypeShare, StatusShare,
};
