//! Customer records, statistics and solar-potential estimates

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
