//! Dashboard helpers
//!
//! Reporting windows and bucketing rules used by the dashboard service.

mod buckets;
mod period;

pub use buckets::{bucket_consumption, ConsumptionRange};
pub use period::{day_key, start_of_month, SalesPeriod};
