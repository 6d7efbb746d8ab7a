//! Migration to create customers table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Customers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Customers::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Customers::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Customers::CpfCnpj).string_len(18).null())
                    .col(ColumnDef::new(Customers::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Customers::City).string_len(100).not_null())
                    .col(ColumnDef::new(Customers::State).string_len(2).not_null())
                    .col(ColumnDef::new(Customers::ZipCode).string_len(10).not_null())
                    .col(ColumnDef::new(Customers::Complement).string_len(100).null())
                    .col(
                        ColumnDef::new(Customers::InstallationType)
                            .string_len(20)
                            .not_null()
                            .default("residential"),
                    )
                    .col(
                        ColumnDef::new(Customers::CustomerType)
                            .string_len(20)
                            .not_null()
                            .default("consumer"),
                    )
                    .col(ColumnDef::new(Customers::MonthlyEnergyConsumption).double().null())
                    .col(ColumnDef::new(Customers::MonthlyEnergyBill).double().null())
                    .col(ColumnDef::new(Customers::RoofType).string_len(50).null())
                    .col(ColumnDef::new(Customers::AvailableRoofArea).double().null())
                    .col(
                        ColumnDef::new(Customers::Status)
                            .string_len(20)
                            .not_null()
                            .default("lead"),
                    )
                    .col(ColumnDef::new(Customers::Notes).text().null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::LastContactDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_email")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_status")
                    .table(Customers::Table)
                    .col(Customers::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_created_at")
                    .table(Customers::Table)
                    .col(Customers::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    CpfCnpj,
    Address,
    City,
    State,
    ZipCode,
    Complement,
    InstallationType,
    CustomerType,
    MonthlyEnergyConsumption,
    MonthlyEnergyBill,
    RoofType,
    AvailableRoofArea,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
    LastContactDate,
}
