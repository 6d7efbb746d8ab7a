//! Database entities module

pub mod customer;
pub mod user;

pub use customer::Entity as Customer;
pub use user::Entity as User;
