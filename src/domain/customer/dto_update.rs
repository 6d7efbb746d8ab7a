use chrono::{DateTime, Utc};

use super::{CustomerStatus, CustomerType, InstallationType};

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cpf_cnpj: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub complement: Option<String>,
    pub installation_type: Option<InstallationType>,
    pub customer_type: Option<CustomerType>,
    pub monthly_energy_consumption: Option<f64>,
    pub monthly_energy_bill: Option<f64>,
    pub roof_type: Option<String>,
    pub available_roof_area: Option<f64>,
    pub status: Option<CustomerStatus>,
    pub notes: Option<String>,
    pub last_contact_date: Option<DateTime<Utc>>,
}
