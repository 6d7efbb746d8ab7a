//! Dashboard aggregation
//!
//! Stateless read-only reports recomputed from the customer store on every
//! call.

pub mod reports;
pub mod service;

pub use reports::*;
pub use service::DashboardService;
