//! # Solar CRM
//!
//! Customer management backend for a solar-energy sales team: customer
//! records, user accounts with roles, a solar-potential estimator and
//! dashboard reports, served as a JSON REST API.
//!
//! ## Architecture
//!
//! - **domain**: records, enums, repository contracts, pure calculations
//! - **application**: use-case services (identity, customers, dashboard)
//! - **infrastructure**: SeaORM persistence, in-memory stores, JWT and bcrypt
//! - **interfaces**: axum router, handlers, middleware, OpenAPI docs
//! - **config** / **server**: TOML configuration and the server runtime

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiDoc, RouterContext};
