use chrono::{DateTime, Utc};

use super::{CustomerStatus, CustomerType, InstallationType};

#[derive(Debug, Clone)]
pub struct CreateCustomerDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf_cnpj: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub complement: Option<String>,
    pub installation_type: InstallationType,
    pub customer_type: CustomerType,
    pub monthly_energy_consumption: Option<f64>,
    pub monthly_energy_bill: Option<f64>,
    pub roof_type: Option<String>,
    pub available_roof_area: Option<f64>,
    /// Defaults to `Lead` when absent
    pub status: Option<CustomerStatus>,
    pub notes: Option<String>,
    pub last_contact_date: Option<DateTime<Utc>>,
}
