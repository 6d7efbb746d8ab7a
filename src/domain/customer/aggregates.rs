//! Grouped aggregation rows produced by the customer repository.

use super::{CustomerStatus, InstallationType};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub status: CustomerStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstallationTypeCount {
    pub installation_type: InstallationType,
    pub count: u64,
}

/// Installation type × status cell
#[derive(Debug, Clone, PartialEq)]
pub struct TypeStatusCount {
    pub installation_type: InstallationType,
    pub status: CustomerStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityDistribution {
    pub city: String,
    pub state: String,
    pub count: u64,
    /// Average over customers with a known consumption; `None` if none have one
    pub avg_consumption: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateDistribution {
    pub state: String,
    pub count: u64,
}

/// Energy figures for one installation type, over customers with a known
/// consumption only.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallationEnergy {
    pub installation_type: InstallationType,
    pub avg_consumption: f64,
    pub total_consumption: f64,
    /// Average over the subset that also has a known bill
    pub avg_bill: Option<f64>,
    pub count: u64,
}
