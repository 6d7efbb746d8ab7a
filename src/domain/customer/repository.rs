use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    CityDistribution, CreateCustomerDto, Customer, CustomerFilter, CustomerStatus,
    InstallationEnergy, InstallationTypeCount, StateDistribution, StatusCount, TypeStatusCount,
    UpdateCustomerDto,
};
use crate::domain::DomainResult;

/// Persistence contract for customers.
///
/// Besides row CRUD it exposes the grouped queries the dashboard is built
/// from. Sums and averages skip null values; they never count a missing
/// value as zero.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, dto: CreateCustomerDto) -> DomainResult<Customer>;
    async fn find_all(&self, filter: CustomerFilter) -> DomainResult<Vec<Customer>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Customer>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Customer>>;
    async fn update(&self, id: &str, dto: UpdateCustomerDto) -> DomainResult<Option<Customer>>;
    /// Fails with `NotFound` when no row was deleted.
    async fn delete(&self, id: &str) -> DomainResult<()>;

    // ── Aggregation ─────────────────────────────────────────────

    /// Count customers, optionally restricted to one status.
    async fn count(&self, status: Option<CustomerStatus>) -> DomainResult<u64>;
    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64>;
    /// Sum of known monthly consumption.
    async fn sum_consumption(&self) -> DomainResult<f64>;
    /// Sum of known monthly bills over the given statuses (all when empty).
    async fn sum_bills(&self, statuses: &[CustomerStatus]) -> DomainResult<f64>;
    async fn average_consumption(&self) -> DomainResult<Option<f64>>;
    async fn average_bill(&self) -> DomainResult<Option<f64>>;
    async fn count_by_status(&self) -> DomainResult<Vec<StatusCount>>;
    async fn count_by_installation_type(&self) -> DomainResult<Vec<InstallationTypeCount>>;
    async fn count_by_type_and_status(&self) -> DomainResult<Vec<TypeStatusCount>>;
    /// Customers created at or after `since`, oldest first.
    async fn created_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<Customer>>;
    async fn distribution_by_city(&self) -> DomainResult<Vec<CityDistribution>>;
    async fn distribution_by_state(&self) -> DomainResult<Vec<StateDistribution>>;
    async fn energy_by_installation_type(&self) -> DomainResult<Vec<InstallationEnergy>>;
    /// All known monthly consumption values.
    async fn consumption_values(&self) -> DomainResult<Vec<f64>>;
}
