//! Customer DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{
    CreateCustomerDto, Customer, CustomerFilter, CustomerStatus, CustomerType, InstallationType,
    UpdateCustomerDto,
};

/// Create customer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "phone is required"))]
    pub phone: String,
    #[validate(length(max = 18))]
    pub cpf_cnpj: Option<String>,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, max = 100, message = "city is required"))]
    pub city: String,
    #[validate(length(equal = 2, message = "state must have 2 characters"))]
    pub state: String,
    #[validate(length(min = 1, max = 10, message = "zipCode is required"))]
    pub zip_code: String,
    pub complement: Option<String>,
    #[serde(default)]
    pub installation_type: InstallationType,
    #[serde(default)]
    pub customer_type: CustomerType,
    #[validate(range(min = 0.0, message = "consumption cannot be negative"))]
    pub monthly_energy_consumption: Option<f64>,
    #[validate(range(min = 0.0, message = "bill cannot be negative"))]
    pub monthly_energy_bill: Option<f64>,
    pub roof_type: Option<String>,
    #[validate(range(min = 0.0, message = "roof area cannot be negative"))]
    pub available_roof_area: Option<f64>,
    pub status: Option<CustomerStatus>,
    pub notes: Option<String>,
    /// ISO 8601 timestamp
    pub last_contact_date: Option<DateTime<Utc>>,
}

impl From<CreateCustomerRequest> for CreateCustomerDto {
    fn from(r: CreateCustomerRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            phone: r.phone,
            cpf_cnpj: r.cpf_cnpj,
            address: r.address,
            city: r.city,
            state: r.state,
            zip_code: r.zip_code,
            complement: r.complement,
            installation_type: r.installation_type,
            customer_type: r.customer_type,
            monthly_energy_consumption: r.monthly_energy_consumption,
            monthly_energy_bill: r.monthly_energy_bill,
            roof_type: r.roof_type,
            available_roof_area: r.available_roof_area,
            status: r.status,
            notes: r.notes,
            last_contact_date: r.last_contact_date,
        }
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 20, message = "phone must not be empty"))]
    pub phone: Option<String>,
    #[validate(length(max = 18))]
    pub cpf_cnpj: Option<String>,
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100, message = "city must not be empty"))]
    pub city: Option<String>,
    #[validate(length(equal = 2, message = "state must have 2 characters"))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 10, message = "zipCode must not be empty"))]
    pub zip_code: Option<String>,
    pub complement: Option<String>,
    pub installation_type: Option<InstallationType>,
    pub customer_type: Option<CustomerType>,
    #[validate(range(min = 0.0, message = "consumption cannot be negative"))]
    pub monthly_energy_consumption: Option<f64>,
    #[validate(range(min = 0.0, message = "bill cannot be negative"))]
    pub monthly_energy_bill: Option<f64>,
    pub roof_type: Option<String>,
    #[validate(range(min = 0.0, message = "roof area cannot be negative"))]
    pub available_roof_area: Option<f64>,
    pub status: Option<CustomerStatus>,
    pub notes: Option<String>,
    pub last_contact_date: Option<DateTime<Utc>>,
}

impl From<UpdateCustomerRequest> for UpdateCustomerDto {
    fn from(r: UpdateCustomerRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            phone: r.phone,
            cpf_cnpj: r.cpf_cnpj,
            address: r.address,
            city: r.city,
            state: r.state,
            zip_code: r.zip_code,
            complement: r.complement,
            installation_type: r.installation_type,
            customer_type: r.customer_type,
            monthly_energy_consumption: r.monthly_energy_consumption,
            monthly_energy_bill: r.monthly_energy_bill,
            roof_type: r.roof_type,
            available_roof_area: r.available_roof_area,
            status: r.status,
            notes: r.notes,
            last_contact_date: r.last_contact_date,
        }
    }
}

/// Listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    pub status: Option<CustomerStatus>,
    pub installation_type: Option<InstallationType>,
    pub customer_type: Option<CustomerType>,
    /// Exact city, case-insensitive
    pub city: Option<String>,
    /// Exact state code, case-insensitive
    pub state: Option<String>,
    /// Substring of name or email, case-insensitive
    pub search: Option<String>,
}

impl From<CustomerQuery> for CustomerFilter {
    fn from(q: CustomerQuery) -> Self {
        // Blank query values (`?city=`) mean "no filter"
        fn non_blank(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }

        Self {
            status: q.status,
            installation_type: q.installation_type,
            customer_type: q.customer_type,
            city: non_blank(q.city),
            state: non_blank(q.state),
            search: non_blank(q.search),
        }
    }
}

/// Customer API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
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
    pub status: CustomerStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_contact_date: Option<DateTime<Utc>>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            cpf_cnpj: c.cpf_cnpj,
            address: c.address,
            city: c.city,
            state: c.state,
            zip_code: c.zip_code,
            complement: c.complement,
            installation_type: c.installation_type,
            customer_type: c.customer_type,
            monthly_energy_consumption: c.monthly_energy_consumption,
            monthly_energy_bill: c.monthly_energy_bill,
            roof_type: c.roof_type,
            available_roof_area: c.available_roof_area,
            status: c.status,
            notes: c.notes,
            created_at: c.created_at,
            updated_at: c.updated_at,
            last_contact_date: c.last_contact_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Maria Souza",
            "email": "maria@example.com",
            "phone": "11999990000",
            "address": "Rua A, 10",
            "city": "Campinas",
            "state": "SP",
            "zipCode": "13000-000",
            "monthlyEnergyConsumption": 350.0
        })
    }

    #[test]
    fn create_request_applies_enum_defaults() {
        let req: CreateCustomerRequest = serde_json::from_value(valid_body()).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.installation_type, InstallationType::Residential);
        assert_eq!(req.customer_type, CustomerType::Consumer);
        assert!(req.status.is_none());
    }

    #[test]
    fn create_request_rejects_long_state_and_bad_email() {
        let mut body = valid_body();
        body["state"] = "SAO".into();
        body["email"] = "not-an-email".into();
        let req: CreateCustomerRequest = serde_json::from_value(body).unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("state"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn unknown_status_does_not_deserialize() {
        let mut body = valid_body();
        body["status"] = "won".into();
        assert!(serde_json::from_value::<CreateCustomerRequest>(body).is_err());
    }

    #[test]
    fn update_request_only_checks_present_fields() {
        let req: UpdateCustomerRequest =
            serde_json::from_value(serde_json::json!({"status": "client"})).unwrap();
        assert!(req.validate().is_ok());
        let dto = UpdateCustomerDto::from(req);
        assert_eq!(dto.status, Some(CustomerStatus::Client));
        assert!(dto.name.is_none());
    }

    #[test]
    fn blank_query_values_are_ignored() {
        let filter = CustomerFilter::from(CustomerQuery {
            city: Some("  ".into()),
            search: Some("ana".into()),
            ..Default::default()
        });
        assert!(filter.city.is_none());
        assert_eq!(filter.search.as_deref(), Some("ana"));
    }
}
