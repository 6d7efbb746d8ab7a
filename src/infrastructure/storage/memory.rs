//! In-memory storage for development and testing
//!
//! Mirrors the SeaORM repositories: unique emails, NULL-skipping
//! aggregates, newest-first listings.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::customer::{
    CityDistribution, InstallationEnergy, InstallationTypeCount, StateDistribution, StatusCount,
    TypeStatusCount,
};
use crate::domain::{
    CreateCustomerDto, CreateUserDto, Customer, CustomerFilter, CustomerRepository,
    CustomerStatus, DomainError, DomainResult, RepositoryProvider, UpdateCustomerDto,
    UpdateUserDto, User, UserRepositoryInterface,
};

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0u64), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Reserve `email` for `id`, failing if another record holds it.
fn reserve_email(index: &DashMap<String, String>, email: &str, id: &str) -> DomainResult<()> {
    match index.entry(email.to_string()) {
        Entry::Occupied(owner) if owner.get() != id => Err(DomainError::Conflict(format!(
            "Email {} already registered",
            email
        ))),
        Entry::Occupied(_) => Ok(()),
        Entry::Vacant(slot) => {
            slot.insert(id.to_string());
            Ok(())
        }
    }
}

// ── Customers ───────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: DashMap<String, Customer>,
    emails: DashMap<String, String>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fully-formed record as is, keeping its timestamps.
    pub fn insert(&self, customer: Customer) -> DomainResult<()> {
        reserve_email(&self.emails, &customer.email, &customer.id)?;
        self.customers.insert(customer.id.clone(), customer);
        Ok(())
    }

    fn snapshot(&self) -> Vec<Customer> {
        self.customers.iter().map(|c| c.value().clone()).collect()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, dto: CreateCustomerDto) -> DomainResult<Customer> {
        let now = Utc::now();
        let customer = Customer {
            id: uuid::Uuid::new_v4().to_string(),
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            cpf_cnpj: dto.cpf_cnpj,
            address: dto.address,
            city: dto.city,
            state: dto.state,
            zip_code: dto.zip_code,
            complement: dto.complement,
            installation_type: dto.installation_type,
            customer_type: dto.customer_type,
            monthly_energy_consumption: dto.monthly_energy_consumption,
            monthly_energy_bill: dto.monthly_energy_bill,
            roof_type: dto.roof_type,
            available_roof_area: dto.available_roof_area,
            status: dto.status.unwrap_or_default(),
            notes: dto.notes,
            created_at: now,
            updated_at: now,
            last_contact_date: dto.last_contact_date,
        };
        self.insert(customer.clone())?;
        Ok(customer)
    }

    async fn find_all(&self, filter: CustomerFilter) -> DomainResult<Vec<Customer>> {
        let mut customers: Vec<Customer> = self
            .customers
            .iter()
            .filter(|c| filter.matches(c.value()))
            .map(|c| c.value().clone())
            .collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customers)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Customer>> {
        Ok(self.customers.get(id).map(|c| c.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Customer>> {
        let Some(id) = self.emails.get(email).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        self.find_by_id(&id).await
    }

    async fn update(&self, id: &str, dto: UpdateCustomerDto) -> DomainResult<Option<Customer>> {
        let Some(mut entry) = self.customers.get_mut(id) else {
            return Ok(None);
        };
        let customer = entry.value_mut();

        if let Some(email) = dto.email {
            if email != customer.email {
                reserve_email(&self.emails, &email, id)?;
                self.emails.remove(&customer.email);
                customer.email = email;
            }
        }
        if let Some(name) = dto.name {
            customer.name = name;
        }
        if let Some(phone) = dto.phone {
            customer.phone = phone;
        }
        if dto.cpf_cnpj.is_some() {
            customer.cpf_cnpj = dto.cpf_cnpj;
        }
        if let Some(address) = dto.address {
            customer.address = address;
        }
        if let Some(city) = dto.city {
            customer.city = city;
        }
        if let Some(state) = dto.state {
            customer.state = state;
        }
        if let Some(zip_code) = dto.zip_code {
            customer.zip_code = zip_code;
        }
        if dto.complement.is_some() {
            customer.complement = dto.complement;
        }
        if let Some(kind) = dto.installation_type {
            customer.installation_type = kind;
        }
        if let Some(kind) = dto.customer_type {
            customer.customer_type = kind;
        }
        if dto.monthly_energy_consumption.is_some() {
            customer.monthly_energy_consumption = dto.monthly_energy_consumption;
        }
        if dto.monthly_energy_bill.is_some() {
            customer.monthly_energy_bill = dto.monthly_energy_bill;
        }
        if dto.roof_type.is_some() {
            customer.roof_type = dto.roof_type;
        }
        if dto.available_roof_area.is_some() {
            customer.available_roof_area = dto.available_roof_area;
        }
        if let Some(status) = dto.status {
            customer.status = status;
        }
        if dto.notes.is_some() {
            customer.notes = dto.notes;
        }
        if dto.last_contact_date.is_some() {
            customer.last_contact_date = dto.last_contact_date;
        }
        customer.updated_at = Utc::now();

        Ok(Some(customer.clone()))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        match self.customers.remove(id) {
            Some((_, removed)) => {
                self.emails.remove(&removed.email);
                Ok(())
            }
            None => Err(DomainError::not_found_by_id("Customer", id)),
        }
    }

    // ── Aggregation ─────────────────────────────────────────────

    async fn count(&self, status: Option<CustomerStatus>) -> DomainResult<u64> {
        Ok(self
            .customers
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .count() as u64)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        Ok(self.customers.iter().filter(|c| c.created_at >= since).count() as u64)
    }

    async fn sum_consumption(&self) -> DomainResult<f64> {
        Ok(self
            .customers
            .iter()
            .filter_map(|c| c.monthly_energy_consumption)
            .sum())
    }

    async fn sum_bills(&self, statuses: &[CustomerStatus]) -> DomainResult<f64> {
        Ok(self
            .customers
            .iter()
            .filter(|c| statuses.is_empty() || statuses.contains(&c.status))
            .filter_map(|c| c.monthly_energy_bill)
            .sum())
    }

    async fn average_consumption(&self) -> DomainResult<Option<f64>> {
        Ok(average(
            self.customers.iter().filter_map(|c| c.monthly_energy_consumption),
        ))
    }

    async fn average_bill(&self) -> DomainResult<Option<f64>> {
        Ok(average(self.customers.iter().filter_map(|c| c.monthly_energy_bill)))
    }

    async fn count_by_status(&self) -> DomainResult<Vec<StatusCount>> {
        let mut counts = BTreeMap::new();
        for c in self.customers.iter() {
            *counts.entry(c.status).or_insert(0u64) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    async fn count_by_installation_type(&self) -> DomainResult<Vec<InstallationTypeCount>> {
        let mut counts = BTreeMap::new();
        for c in self.customers.iter() {
            *counts.entry(c.installation_type).or_insert(0u64) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(installation_type, count)| InstallationTypeCount {
                installation_type,
                count,
            })
            .collect())
    }

    async fn count_by_type_and_status(&self) -> DomainResult<Vec<TypeStatusCount>> {
        let mut counts = BTreeMap::new();
        for c in self.customers.iter() {
            *counts.entry((c.installation_type, c.status)).or_insert(0u64) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|((installation_type, status), count)| TypeStatusCount {
                installation_type,
                status,
                count,
            })
            .collect())
    }

    async fn created_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<Customer>> {
        let mut customers: Vec<Customer> = self
            .snapshot()
            .into_iter()
            .filter(|c| c.created_at >= since)
            .collect();
        customers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(customers)
    }

    async fn distribution_by_city(&self) -> DomainResult<Vec<CityDistribution>> {
        let mut groups: BTreeMap<(String, String), (u64, Vec<f64>)> = BTreeMap::new();
        for c in self.customers.iter() {
            let group = groups
                .entry((c.city.clone(), c.state.clone()))
                .or_insert((0, Vec::new()));
            group.0 += 1;
            group.1.extend(c.monthly_energy_consumption);
        }

        let mut cities: Vec<CityDistribution> = groups
            .into_iter()
            .map(|((city, state), (count, values))| CityDistribution {
                city,
                state,
                count,
                avg_consumption: average(values.into_iter()),
            })
            .collect();
        cities.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.city.cmp(&b.city)));
        Ok(cities)
    }

    async fn distribution_by_state(&self) -> DomainResult<Vec<StateDistribution>> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for c in self.customers.iter() {
            *counts.entry(c.state.clone()).or_insert(0) += 1;
        }

        let mut states: Vec<StateDistribution> = counts
            .into_iter()
            .map(|(state, count)| StateDistribution { state, count })
            .collect();
        states.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.state.cmp(&b.state)));
        Ok(states)
    }

    async fn energy_by_installation_type(&self) -> DomainResult<Vec<InstallationEnergy>> {
        let mut groups = BTreeMap::new();
        for c in self.customers.iter() {
            let Some(consumption) = c.monthly_energy_consumption else {
                continue;
            };
            let group = groups
                .entry(c.installation_type)
                .or_insert((Vec::new(), Vec::new()));
            group.0.push(consumption);
            group.1.extend(c.monthly_energy_bill);
        }

        Ok(groups
            .into_iter()
            .map(|(installation_type, (consumption, bills))| InstallationEnergy {
                installation_type,
                avg_consumption: average(consumption.iter().copied()).unwrap_or(0.0),
                total_consumption: consumption.iter().sum(),
                avg_bill: average(bills.into_iter()),
                count: consumption.len() as u64,
            })
            .collect())
    }

    async fn consumption_values(&self) -> DomainResult<Vec<f64>> {
        Ok(self
            .customers
            .iter()
            .filter_map(|c| c.monthly_energy_consumption)
            .collect())
    }
}

// ── Users ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    emails: DashMap<String, String>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: dto.name,
            email: dto.email,
            password_hash: dto.password_hash,
            role: dto.role.unwrap_or_default(),
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        reserve_email(&self.emails, &user.email, &user.id)?;
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        self.get_user_by_id(&id).await
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let Some(mut entry) = self.users.get_mut(id) else {
            return Ok(None);
        };
        let user = entry.value_mut();

        if let Some(email) = dto.email {
            if email != user.email {
                reserve_email(&self.emails, &email, id)?;
                self.emails.remove(&user.email);
                user.email = email;
            }
        }
        if let Some(name) = dto.name {
            user.name = name;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found_by_id("User", id))?;
        user.password_hash = new_password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_active(&self, id: &str, is_active: bool) -> DomainResult<Option<User>> {
        Ok(self.users.get_mut(id).map(|mut user| {
            user.is_active = is_active;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found_by_id("User", id))?;
        user.last_login = Some(at);
        Ok(())
    }
}

// ── Provider ────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    pub customers: InMemoryCustomerRepository,
    pub users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerType, InstallationType};

    fn sample_dto(email: &str, consumption: Option<f64>) -> CreateCustomerDto {
        CreateCustomerDto {
            name: "Test".into(),
            email: email.into(),
            phone: "1".into(),
            cpf_cnpj: None,
            address: "Rua 1".into(),
            city: "Recife".into(),
            state: "PE".into(),
            zip_code: "50000-000".into(),
            complement: None,
            installation_type: InstallationType::Rural,
            customer_type: CustomerType::Generator,
            monthly_energy_consumption: consumption,
            monthly_energy_bill: None,
            roof_type: None,
            available_roof_area: None,
            status: None,
            notes: None,
            last_contact_date: None,
        }
    }

    #[tokio::test]
    async fn email_moves_with_update() {
        let repo = InMemoryCustomerRepository::new();
        let a = repo.create(sample_dto("a@x.com", None)).await.unwrap();
        repo.create(sample_dto("b@x.com", None)).await.unwrap();

        let clash = repo
            .update(
                &a.id,
                UpdateCustomerDto {
                    email: Some("b@x.com".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(clash, Err(DomainError::Conflict(_))));

        repo.update(
            &a.id,
            UpdateCustomerDto {
                email: Some("c@x.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(repo.find_by_email("a@x.com").await.unwrap().is_none());
        assert_eq!(repo.find_by_email("c@x.com").await.unwrap().unwrap().id, a.id);
        // the old address is free again
        repo.create(sample_dto("a@x.com", None)).await.unwrap();
    }

    #[tokio::test]
    async fn energy_groups_skip_missing_consumption() {
        let repo = InMemoryCustomerRepository::new();
        repo.create(sample_dto("a@x.com", Some(100.0))).await.unwrap();
        repo.create(sample_dto("b@x.com", Some(300.0))).await.unwrap();
        repo.create(sample_dto("c@x.com", None)).await.unwrap();

        let energy = repo.energy_by_installation_type().await.unwrap();
        assert_eq!(energy.len(), 1);
        assert_eq!(energy[0].count, 2);
        assert_eq!(energy[0].avg_consumption, 200.0);
        assert_eq!(energy[0].avg_bill, None);
        assert_eq!(repo.average_consumption().await.unwrap(), Some(200.0));
    }

    #[tokio::test]
    async fn user_toggle_and_missing_ids() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create_user(CreateUserDto {
                name: "Root".into(),
                email: "root@x.com".into(),
                password_hash: "h".into(),
                role: None,
            })
            .await
            .unwrap();

        let toggled = repo.set_active(&user.id, false).await.unwrap().unwrap();
        assert!(!toggled.is_active);
        assert!(repo.set_active("nope", true).await.unwrap().is_none());
        assert!(repo.touch_last_login("nope", Utc::now()).await.is_err());
    }
}
