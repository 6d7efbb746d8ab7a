//! Identity module: user management & authentication
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: login, registration, token authentication, profile updates,
//! password changes and account activation.

pub mod service;

pub use service::{AuthResult, UserService, MIN_PASSWORD_LEN};
