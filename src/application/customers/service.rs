use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::solar::{estimate, SolarEstimate};
use crate::domain::{
    CreateCustomerDto, Customer, CustomerFilter, CustomerStatus, DomainError, DomainResult,
    InstallationType, RepositoryProvider, UpdateCustomerDto,
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusShare {
    pub status: CustomerStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallationTypeShare {
    pub installation_type: InstallationType,
    pub count: u64,
}

/// Customer-base summary. Averages cover known values only and are 0
/// when nothing is known.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStatistics {
    pub total_customers: u64,
    pub status_distribution: Vec<StatusShare>,
    pub installation_type_distribution: Vec<InstallationTypeShare>,
    pub average_monthly_consumption: f64,
    pub average_monthly_bill: f64,
}

pub struct CustomerService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CustomerService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, dto: CreateCustomerDto) -> DomainResult<Customer> {
        let customers = self.repos.customers();
        if customers.find_by_email(&dto.email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Customer with email {} already exists",
                dto.email
            )));
        }

        let customer = customers.create(dto).await?;
        info!(customer_id = %customer.id, status = %customer.status, "Customer created");
        Ok(customer)
    }

    pub async fn list(&self, filter: CustomerFilter) -> DomainResult<Vec<Customer>> {
        self.repos.customers().find_all(filter).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Customer> {
        self.repos
            .customers()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found_by_id("Customer", id))
    }

    /// Partial update. The email uniqueness check only runs when the
    /// email actually changes.
    pub async fn update(&self, id: &str, dto: UpdateCustomerDto) -> DomainResult<Customer> {
        let customers = self.repos.customers();
        let current = self.get(id).await?;

        if let Some(email) = dto.email.as_deref() {
            if email != current.email && customers.find_by_email(email).await?.is_some() {
                return Err(DomainError::Conflict(format!(
                    "Customer with email {} already exists",
                    email
                )));
            }
        }

        let updated = customers
            .update(id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found_by_id("Customer", id))?;

        info!(customer_id = %id, status = %updated.status, "Customer updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.customers().delete(id).await?;
        info!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    pub async fn statistics(&self) -> DomainResult<CustomerStatistics> {
        let customers = self.repos.customers();

        let status_distribution = customers
            .count_by_status()
            .await?
            .into_iter()
            .map(|row| StatusShare {
                status: row.status,
                count: row.count,
            })
            .collect();
        let installation_type_distribution = customers
            .count_by_installation_type()
            .await?
            .into_iter()
            .map(|row| InstallationTypeShare {
                installation_type: row.installation_type,
                count: row.count,
            })
            .collect();

        Ok(CustomerStatistics {
            total_customers: customers.count(None).await?,
            status_distribution,
            installation_type_distribution,
            average_monthly_consumption: customers.average_consumption().await?.unwrap_or(0.0),
            average_monthly_bill: customers.average_bill().await?.unwrap_or(0.0),
        })
    }

    /// Solar sizing for one customer. NotFound and InsufficientData are
    /// kept distinct.
    pub async fn solar_potential(&self, id: &str) -> DomainResult<SolarEstimate> {
        let customer = self.get(id).await?;
        estimate(&customer)
    }
}
