//! Application layer: use-case services over the repository provider.

pub mod customers;
pub mod dashboard;
pub mod identity;

pub use customers::CustomerService;
pub use dashboard::DashboardService;
pub use identity::{AuthResult, UserService};
