use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Customer, DomainError, DomainResult};
use crate::shared::round_to;

pub const DAYS_PER_MONTH: f64 = 30.0;
/// Peak sun hours per day
pub const SUN_HOURS_PER_DAY: f64 = 5.0;
pub const SYSTEM_EFFICIENCY: f64 = 0.75;
/// Nameplate power of one panel in kW
pub const PANEL_POWER_KW: f64 = 0.55;
/// Roof area taken by one panel in m²
pub const PANEL_AREA_M2: f64 = 2.0;
/// Energy tariff in currency per kWh
pub const TARIFF_PER_KWH: f64 = 0.75;
/// Share of the bill offset by generation
pub const SAVINGS_FACTOR: f64 = 0.9;
/// Installed cost per kW of system power
pub const INSTALL_COST_PER_KW: f64 = 5000.0;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub monthly_consumption: f64,
    pub available_roof_area: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolarSystemEstimate {
    /// kW
    pub required_power: f64,
    pub number_of_panels: u32,
    /// kW
    pub total_system_power: f64,
    /// m²
    pub required_area: f64,
    pub can_install: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEstimate {
    pub estimated_investment: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolarEstimate {
    pub customer: CustomerSummary,
    pub solar_system: SolarSystemEstimate,
    pub financial: FinancialEstimate,
}

/// Size a PV system for the customer and estimate its payback.
///
/// Fails with [`DomainError::InsufficientData`] when the customer has no
/// positive monthly consumption. Intermediate values are kept unrounded;
/// only the returned figures are rounded (2 decimals, payback 1 decimal).
pub fn estimate(customer: &Customer) -> DomainResult<SolarEstimate> {
    let monthly = match customer.monthly_energy_consumption {
        Some(value) if value > 0.0 => value,
        _ => {
            return Err(DomainError::InsufficientData(
                "monthly energy consumption is required to estimate solar potential".into(),
            ))
        }
    };

    let daily = monthly / DAYS_PER_MONTH;
    let required_power = daily / (SUN_HOURS_PER_DAY * SYSTEM_EFFICIENCY);
    let panels = (required_power / PANEL_POWER_KW).ceil();
    let total_system_power = panels * PANEL_POWER_KW;
    let required_area = panels * PANEL_AREA_M2;

    let monthly_savings = monthly * TARIFF_PER_KWH * SAVINGS_FACTOR;
    let annual_savings = monthly_savings * 12.0;
    let investment = total_system_power * INSTALL_COST_PER_KW;
    let payback_years = investment / annual_savings;

    let can_install = customer
        .available_roof_area
        .map_or(true, |area| area >= required_area);

    Ok(SolarEstimate {
        customer: CustomerSummary {
            id: customer.id.clone(),
            name: customer.name.clone(),
            monthly_consumption: monthly,
            available_roof_area: customer.available_roof_area,
        },
        solar_system: SolarSystemEstimate {
            required_power: round_to(required_power, 2),
            number_of_panels: panels as u32,
            total_system_power: round_to(total_system_power, 2),
            required_area: round_to(required_area, 2),
            can_install,
        },
        financial: FinancialEstimate {
            estimated_investment: round_to(investment, 2),
            monthly_savings: round_to(monthly_savings, 2),
            annual_savings: round_to(annual_savings, 2),
            payback_years: round_to(payback_years, 1),
        },
    })
}
