//! Dashboard report shapes
//!
//! Rates are percentages rounded to one decimal. Fields backed by fixed or
//! random values instead of stored data sit next to a `simulated: true`
//! flag.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{CustomerStatus, InstallationType};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub total_customers: u64,
    pub active_clients: u64,
    pub total_leads: u64,
    pub total_prospects: u64,
    pub conversion_rate: f64,
    /// Sum of known monthly consumption (kWh)
    pub total_energy_potential: f64,
    pub total_monthly_bills: f64,
    pub new_customers_this_month: u64,
    pub average_ticket: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SalesDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub status: CustomerStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub period: String,
    pub timeline: Vec<SalesDay>,
    /// Annualized savings over open leads and prospects
    pub sales_potential: f64,
    /// Annualized savings over clients
    pub realized_sales: f64,
    pub conversion_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeStatusShare {
    pub installation_type: InstallationType,
    pub status: CustomerStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeadQuality {
    pub hot: u32,
    pub warm: u32,
    pub cold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub conversion_by_type: Vec<TypeStatusShare>,
    /// Days
    pub average_conversion_time: u32,
    pub response_rate: f64,
    pub lead_quality: LeadQuality,
    pub simulated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityShare {
    pub city: String,
    pub state: String,
    pub count: u64,
    pub avg_consumption: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StateShare {
    pub state: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeographicReport {
    pub by_city: Vec<CityShare>,
    pub by_state: Vec<StateShare>,
    pub top_cities: Vec<CityShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDay {
    pub date: String,
    pub new_customers: u64,
    pub contacts_made: u32,
    pub proposals_sent: u32,
    pub contracts_closed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary {
    pub total_new_customers: u64,
    pub total_contacts: u64,
    pub total_proposals: u64,
    pub total_contracts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TimelineReport {
    pub period: String,
    pub timeline: Vec<TimelineDay>,
    pub summary: TimelineSummary,
    pub simulated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Funnel {
    pub leads: u64,
    pub prospects: u64,
    pub clients: u64,
    pub inactive: u64,
}

impl Funnel {
    pub fn total(&self) -> u64 {
        self.leads + self.prospects + self.clients + self.inactive
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRates {
    pub lead_to_prospect: f64,
    pub prospect_to_client: f64,
    pub overall_conversion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub funnel: Funnel,
    pub conversion_rates: ConversionRates,
    pub lost_opportunities: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallationEnergyShare {
    pub installation_type: InstallationType,
    pub avg_consumption: f64,
    pub total_consumption: f64,
    pub avg_bill: Option<f64>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionBucket {
    /// One of `0-200`, `200-500`, `500-1000`, `1000-5000`, `5000+`
    pub consumption_range: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityImpact {
    pub co2_reduction_tons: f64,
    pub trees_equivalent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReport {
    pub by_installation_type: Vec<InstallationEnergyShare>,
    pub consumption_distribution: Vec<ConsumptionBucket>,
    pub total_savings_potential: f64,
    /// Years
    #[serde(rename = "averageROI")]
    pub average_roi: f64,
    pub sustainability_impact: SustainabilityImpact,
    pub simulated: bool,
}
