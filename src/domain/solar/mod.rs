//! Solar-potential estimation
//!
//! Pure sizing and payback calculation from a customer's monthly consumption.

mod estimator;

pub use estimator::{
    estimate, CustomerSummary, FinancialEstimate, SolarEstimate, SolarSystemEstimate,
    DAYS_PER_MONTH, INSTALL_COST_PER_KW, PANEL_AREA_M2, PANEL_POWER_KW, SAVINGS_FACTOR,
    SUN_HOURS_PER_DAY, SYSTEM_EFFICIENCY, TARIFF_PER_KWH,
};
