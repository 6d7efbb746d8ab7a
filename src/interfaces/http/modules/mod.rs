//! HTTP API modules, one per resource

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod users;

pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
