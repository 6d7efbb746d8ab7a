//! Customer domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Funnel stage of a customer.
///
/// The funnel reads lead → prospect → client, with `Inactive` as the exit
/// state. Transitions are not enforced: any status may be set to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Lead,
    Prospect,
    Client,
    Inactive,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 4] = [
        CustomerStatus::Lead,
        CustomerStatus::Prospect,
        CustomerStatus::Client,
        CustomerStatus::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Prospect => "prospect",
            Self::Client => "client",
            Self::Inactive => "inactive",
        }
    }
}

impl Default for CustomerStatus {
    fn default() -> Self {
        Self::Lead
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lead" => Ok(Self::Lead),
            "prospect" => Ok(Self::Prospect),
            "client" => Ok(Self::Client),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown customer status '{}'", other)),
        }
    }
}

/// Kind of site the installation is planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InstallationType {
    Residential,
    Commercial,
    Industrial,
    Rural,
}

impl InstallationType {
    pub const ALL: [InstallationType; 4] = [
        InstallationType::Residential,
        InstallationType::Commercial,
        InstallationType::Industrial,
        InstallationType::Rural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Rural => "rural",
        }
    }
}

impl Default for InstallationType {
    fn default() -> Self {
        Self::Residential
    }
}

impl fmt::Display for InstallationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "residential" => Ok(Self::Residential),
            "commercial" => Ok(Self::Commercial),
            "industrial" => Ok(Self::Industrial),
            "rural" => Ok(Self::Rural),
            other => Err(format!("unknown installation type '{}'", other)),
        }
    }
}

/// Whether the customer is expected to generate or only consume energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Generator,
    Consumer,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generator => "generator",
            Self::Consumer => "consumer",
        }
    }
}

impl Default for CustomerType {
    fn default() -> Self {
        Self::Consumer
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generator" => Ok(Self::Generator),
            "consumer" => Ok(Self::Consumer),
            other => Err(format!("unknown customer type '{}'", other)),
        }
    }
}

/// Customer record
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// CPF/CNPJ tax id
    pub cpf_cnpj: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub complement: Option<String>,
    pub installation_type: InstallationType,
    pub customer_type: CustomerType,
    /// Monthly consumption in kWh
    pub monthly_energy_consumption: Option<f64>,
    /// Monthly energy bill in currency units
    pub monthly_energy_bill: Option<f64>,
    pub roof_type: Option<String>,
    /// Available roof area in m²
    pub available_roof_area: Option<f64>,
    pub status: CustomerStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_contact_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Client".parse::<CustomerStatus>(), Ok(CustomerStatus::Client));
        assert_eq!("LEAD".parse::<CustomerStatus>(), Ok(CustomerStatus::Lead));
        assert!("won".parse::<CustomerStatus>().is_err());
    }

    #[test]
    fn defaults_match_schema_defaults() {
        assert_eq!(CustomerStatus::default(), CustomerStatus::Lead);
        assert_eq!(InstallationType::default(), InstallationType::Residential);
        assert_eq!(CustomerType::default(), CustomerType::Consumer);
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&InstallationType::Industrial).unwrap(),
            "\"industrial\""
        );
        assert_eq!(serde_json::to_string(&CustomerType::Generator).unwrap(), "\"generator\"");
        assert_eq!(CustomerStatus::Prospect.to_string(), "prospect");
    }
}
