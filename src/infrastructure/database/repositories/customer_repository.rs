//! SeaORM customer repository
//!
//! CRUD plus the grouped queries behind the dashboard. Aggregates run in
//! SQL (`COUNT`/`SUM`/`AVG` with `GROUP BY`); SQL aggregates ignore NULLs,
//! so missing energy figures never count as zero.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::{db_err, write_err};
use crate::domain::customer::{
    CityDistribution, InstallationEnergy, InstallationTypeCount, StateDistribution, StatusCount,
    TypeStatusCount,
};
use crate::domain::{
    CreateCustomerDto, Customer, CustomerFilter, CustomerRepository, CustomerStatus, CustomerType,
    DomainError, DomainResult, InstallationType, UpdateCustomerDto,
};
use crate::infrastructure::database::entities::customer;

const EMAIL_TAKEN: &str = "Email already registered for another customer";

pub struct CustomerRepositoryImpl {
    db: DatabaseConnection,
}

impl CustomerRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: &str) -> DomainResult<Option<customer::Model>> {
        customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn total(&self, query: Select<customer::Entity>) -> DomainResult<Option<f64>> {
        let row = query
            .into_model::<TotalRow>()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.and_then(|r| r.total))
    }
}

// ── Query rows ──────────────────────────────────────────────────

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: Option<f64>,
}

#[derive(Debug, FromQueryResult)]
struct StatusRow {
    status: customer::CustomerStatus,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct InstallationRow {
    installation_type: customer::InstallationType,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct TypeStatusRow {
    installation_type: customer::InstallationType,
    status: customer::CustomerStatus,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct CityRow {
    city: String,
    state: String,
    count: i64,
    avg_consumption: Option<f64>,
}

#[derive(Debug, FromQueryResult)]
struct StateRow {
    state: String,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct EnergyRow {
    installation_type: customer::InstallationType,
    avg_consumption: Option<f64>,
    total_consumption: Option<f64>,
    avg_bill: Option<f64>,
    count: i64,
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_domain(status: customer::CustomerStatus) -> CustomerStatus {
    match status {
        customer::CustomerStatus::Lead => CustomerStatus::Lead,
        customer::CustomerStatus::Prospect => CustomerStatus::Prospect,
        customer::CustomerStatus::Client => CustomerStatus::Client,
        customer::CustomerStatus::Inactive => CustomerStatus::Inactive,
    }
}

fn status_to_entity(status: CustomerStatus) -> customer::CustomerStatus {
    match status {
        CustomerStatus::Lead => customer::CustomerStatus::Lead,
        CustomerStatus::Prospect => customer::CustomerStatus::Prospect,
        CustomerStatus::Client => customer::CustomerStatus::Client,
        CustomerStatus::Inactive => customer::CustomerStatus::Inactive,
    }
}

fn installation_to_domain(kind: customer::InstallationType) -> InstallationType {
    match kind {
        customer::InstallationType::Residential => InstallationType::Residential,
        customer::InstallationType::Commercial => InstallationType::Commercial,
        customer::InstallationType::Industrial => InstallationType::Industrial,
        customer::InstallationType::Rural => InstallationType::Rural,
    }
}

fn installation_to_entity(kind: InstallationType) -> customer::InstallationType {
    match kind {
        InstallationType::Residential => customer::InstallationType::Residential,
        InstallationType::Commercial => customer::InstallationType::Commercial,
        InstallationType::Industrial => customer::InstallationType::Industrial,
        InstallationType::Rural => customer::InstallationType::Rural,
    }
}

fn customer_type_to_domain(kind: customer::CustomerType) -> CustomerType {
    match kind {
        customer::CustomerType::Generator => CustomerType::Generator,
        customer::CustomerType::Consumer => CustomerType::Consumer,
    }
}

fn customer_type_to_entity(kind: CustomerType) -> customer::CustomerType {
    match kind {
        CustomerType::Generator => customer::CustomerType::Generator,
        CustomerType::Consumer => customer::CustomerType::Consumer,
    }
}

fn customer_model_to_domain(model: customer::Model) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        cpf_cnpj: model.cpf_cnpj,
        address: model.address,
        city: model.city,
        state: model.state,
        zip_code: model.zip_code,
        complement: model.complement,
        installation_type: installation_to_domain(model.installation_type),
        customer_type: customer_type_to_domain(model.customer_type),
        monthly_energy_consumption: model.monthly_energy_consumption,
        monthly_energy_bill: model.monthly_energy_bill,
        roof_type: model.roof_type,
        available_roof_area: model.available_roof_area,
        status: status_to_domain(model.status),
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_contact_date: model.last_contact_date,
    }
}

fn avg(column: customer::Column) -> SimpleExpr {
    Func::avg(Expr::col((customer::Entity, column))).into()
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl CustomerRepository for CustomerRepositoryImpl {
    async fn create(&self, dto: CreateCustomerDto) -> DomainResult<Customer> {
        let now = Utc::now();

        let new_customer = customer::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(dto.name),
            email: Set(dto.email),
            phone: Set(dto.phone),
            cpf_cnpj: Set(dto.cpf_cnpj),
            address: Set(dto.address),
            city: Set(dto.city),
            state: Set(dto.state),
            zip_code: Set(dto.zip_code),
            complement: Set(dto.complement),
            installation_type: Set(installation_to_entity(dto.installation_type)),
            customer_type: Set(customer_type_to_entity(dto.customer_type)),
            monthly_energy_consumption: Set(dto.monthly_energy_consumption),
            monthly_energy_bill: Set(dto.monthly_energy_bill),
            roof_type: Set(dto.roof_type),
            available_roof_area: Set(dto.available_roof_area),
            status: Set(status_to_entity(dto.status.unwrap_or_default())),
            notes: Set(dto.notes),
            created_at: Set(now),
            updated_at: Set(now),
            last_contact_date: Set(dto.last_contact_date),
        };

        let model = new_customer
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, EMAIL_TAKEN))?;

        Ok(customer_model_to_domain(model))
    }

    async fn find_all(&self, filter: CustomerFilter) -> DomainResult<Vec<Customer>> {
        let mut query = customer::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(customer::Column::Status.eq(status_to_entity(status)));
        }
        if let Some(kind) = filter.installation_type {
            query = query.filter(customer::Column::InstallationType.eq(installation_to_entity(kind)));
        }
        if let Some(kind) = filter.customer_type {
            query = query.filter(customer::Column::CustomerType.eq(customer_type_to_entity(kind)));
        }

        let models = query
            .order_by_desc(customer::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        // SQLite's LOWER/LIKE fold ASCII only; text filters use Unicode lowercase.
        Ok(models
            .into_iter()
            .map(customer_model_to_domain)
            .filter(|c| filter.matches(c))
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Customer>> {
        Ok(self.find_model(id).await?.map(customer_model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Customer>> {
        let model = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(customer_model_to_domain))
    }

    async fn update(&self, id: &str, dto: UpdateCustomerDto) -> DomainResult<Option<Customer>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: customer::ActiveModel = existing.into();

        if let Some(name) = dto.name {
            active.name = Set(name);
        }
        if let Some(email) = dto.email {
            active.email = Set(email);
        }
        if let Some(phone) = dto.phone {
            active.phone = Set(phone);
        }
        if let Some(cpf_cnpj) = dto.cpf_cnpj {
            active.cpf_cnpj = Set(Some(cpf_cnpj));
        }
        if let Some(address) = dto.address {
            active.address = Set(address);
        }
        if let Some(city) = dto.city {
            active.city = Set(city);
        }
        if let Some(state) = dto.state {
            active.state = Set(state);
        }
        if let Some(zip_code) = dto.zip_code {
            active.zip_code = Set(zip_code);
        }
        if let Some(complement) = dto.complement {
            active.complement = Set(Some(complement));
        }
        if let Some(kind) = dto.installation_type {
            active.installation_type = Set(installation_to_entity(kind));
        }
        if let Some(kind) = dto.customer_type {
            active.customer_type = Set(customer_type_to_entity(kind));
        }
        if let Some(consumption) = dto.monthly_energy_consumption {
            active.monthly_energy_consumption = Set(Some(consumption));
        }
        if let Some(bill) = dto.monthly_energy_bill {
            active.monthly_energy_bill = Set(Some(bill));
        }
        if let Some(roof_type) = dto.roof_type {
            active.roof_type = Set(Some(roof_type));
        }
        if let Some(area) = dto.available_roof_area {
            active.available_roof_area = Set(Some(area));
        }
        if let Some(status) = dto.status {
            active.status = Set(status_to_entity(status));
        }
        if let Some(notes) = dto.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(contacted) = dto.last_contact_date {
            active.last_contact_date = Set(Some(contacted));
        }

        active.updated_at = Set(Utc::now());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, EMAIL_TAKEN))?;

        Ok(Some(customer_model_to_domain(updated)))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = customer::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found_by_id("Customer", id));
        }

        Ok(())
    }

    // ── Aggregation ─────────────────────────────────────────────

    async fn count(&self, status: Option<CustomerStatus>) -> DomainResult<u64> {
        let mut query = customer::Entity::find();
        if let Some(status) = status {
            query = query.filter(customer::Column::Status.eq(status_to_entity(status)));
        }
        query.count(&self.db).await.map_err(db_err)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        customer::Entity::find()
            .filter(customer::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn sum_consumption(&self) -> DomainResult<f64> {
        let query = customer::Entity::find()
            .select_only()
            .column_as(customer::Column::MonthlyEnergyConsumption.sum(), "total");
        Ok(self.total(query).await?.unwrap_or(0.0))
    }

    async fn sum_bills(&self, statuses: &[CustomerStatus]) -> DomainResult<f64> {
        let mut query = customer::Entity::find()
            .select_only()
            .column_as(customer::Column::MonthlyEnergyBill.sum(), "total");
        if !statuses.is_empty() {
            query = query.filter(
                customer::Column::Status.is_in(statuses.iter().copied().map(status_to_entity)),
            );
        }
        Ok(self.total(query).await?.unwrap_or(0.0))
    }

    async fn average_consumption(&self) -> DomainResult<Option<f64>> {
        let query = customer::Entity::find()
            .select_only()
            .column_as(avg(customer::Column::MonthlyEnergyConsumption), "total");
        self.total(query).await
    }

    async fn average_bill(&self) -> DomainResult<Option<f64>> {
        let query = customer::Entity::find()
            .select_only()
            .column_as(avg(customer::Column::MonthlyEnergyBill), "total");
        self.total(query).await
    }

    async fn count_by_status(&self) -> DomainResult<Vec<StatusCount>> {
        let rows = customer::Entity::find()
            .select_only()
            .column(customer::Column::Status)
            .column_as(customer::Column::Id.count(), "count")
            .group_by(customer::Column::Status)
            .into_model::<StatusRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| StatusCount {
                status: status_to_domain(r.status),
                count: r.count as u64,
            })
            .collect())
    }

    async fn count_by_installation_type(&self) -> DomainResult<Vec<InstallationTypeCount>> {
        let rows = customer::Entity::find()
            .select_only()
            .column(customer::Column::InstallationType)
            .column_as(customer::Column::Id.count(), "count")
            .group_by(customer::Column::InstallationType)
            .into_model::<InstallationRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| InstallationTypeCount {
                installation_type: installation_to_domain(r.installation_type),
                count: r.count as u64,
            })
            .collect())
    }

    async fn count_by_type_and_status(&self) -> DomainResult<Vec<TypeStatusCount>> {
        let rows = customer::Entity::find()
            .select_only()
            .column(customer::Column::InstallationType)
            .column(customer::Column::Status)
            .column_as(customer::Column::Id.count(), "count")
            .group_by(customer::Column::InstallationType)
            .group_by(customer::Column::Status)
            .into_model::<TypeStatusRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| TypeStatusCount {
                installation_type: installation_to_domain(r.installation_type),
                status: status_to_domain(r.status),
                count: r.count as u64,
            })
            .collect())
    }

    async fn created_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<Customer>> {
        let models = customer::Entity::find()
            .filter(customer::Column::CreatedAt.gte(since))
            .order_by_asc(customer::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(customer_model_to_domain).collect())
    }

    async fn distribution_by_city(&self) -> DomainResult<Vec<CityDistribution>> {
        let rows = customer::Entity::find()
            .select_only()
            .column(customer::Column::City)
            .column(customer::Column::State)
            .column_as(customer::Column::Id.count(), "count")
            .column_as(avg(customer::Column::MonthlyEnergyConsumption), "avg_consumption")
            .group_by(customer::Column::City)
            .group_by(customer::Column::State)
            .into_model::<CityRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut cities: Vec<CityDistribution> = rows
            .into_iter()
            .map(|r| CityDistribution {
                city: r.city,
                state: r.state,
                count: r.count as u64,
                avg_consumption: r.avg_consumption,
            })
            .collect();
        cities.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.city.cmp(&b.city)));
        Ok(cities)
    }

    async fn distribution_by_state(&self) -> DomainResult<Vec<StateDistribution>> {
        let rows = customer::Entity::find()
            .select_only()
            .column(customer::Column::State)
            .column_as(customer::Column::Id.count(), "count")
            .group_by(customer::Column::State)
            .into_model::<StateRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut states: Vec<StateDistribution> = rows
            .into_iter()
            .map(|r| StateDistribution {
                state: r.state,
                count: r.count as u64,
            })
            .collect();
        states.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.state.cmp(&b.state)));
        Ok(states)
    }

    async fn energy_by_installation_type(&self) -> DomainResult<Vec<InstallationEnergy>> {
        let rows = customer::Entity::find()
            .select_only()
            .column(customer::Column::InstallationType)
            .column_as(avg(customer::Column::MonthlyEnergyConsumption), "avg_consumption")
            .column_as(customer::Column::MonthlyEnergyConsumption.sum(), "total_consumption")
            .column_as(avg(customer::Column::MonthlyEnergyBill), "avg_bill")
            .column_as(customer::Column::Id.count(), "count")
            .filter(customer::Column::MonthlyEnergyConsumption.is_not_null())
            .group_by(customer::Column::InstallationType)
            .into_model::<EnergyRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| InstallationEnergy {
                installation_type: installation_to_domain(r.installation_type),
                avg_consumption: r.avg_consumption.unwrap_or(0.0),
                total_consumption: r.total_consumption.unwrap_or(0.0),
                avg_bill: r.avg_bill,
                count: r.count as u64,
            })
            .collect())
    }

    async fn consumption_values(&self) -> DomainResult<Vec<f64>> {
        customer::Entity::find()
            .select_only()
            .column(customer::Column::MonthlyEnergyConsumption)
            .filter(customer::Column::MonthlyEnergyConsumption.is_not_null())
            .into_tuple::<f64>()
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}
