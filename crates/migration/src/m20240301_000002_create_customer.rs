//! Create `customer` table with FK to `company`.
//!
//! A company that still owns customers cannot be removed (RESTRICT).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(uuid(Customer::CompanyId).not_null())
                    .col(string_len(Customer::Name, 128).not_null())
                    .col(ColumnDef::new(Customer::Email).string_len(255).null())
                    .col(ColumnDef::new(Customer::Phone).string_len(32).null())
                    .col(ColumnDef::new(Customer::Address).string_len(255).null())
                    .col(ColumnDef::new(Customer::City).string_len(128).null())
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customer::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_company")
                            .from(Customer::Table, Customer::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer { Table, Id, CompanyId, Name, Email, Phone, Address, City, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Company { Table, Id }
