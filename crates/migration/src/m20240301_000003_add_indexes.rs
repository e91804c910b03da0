use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Customer: FK lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_company")
                    .table(Customer::Table)
                    .col(Customer::CompanyId)
                    .to_owned(),
            )
            .await?;

        // Customer: list sort keys
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_name")
                    .table(Customer::Table)
                    .col(Customer::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customer_created_at")
                    .table(Customer::Table)
                    .col(Customer::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_customer_created_at", "idx_customer_name", "idx_customer_company"] {
            manager
                .drop_index(Index::drop().name(name).table(Customer::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Customer { Table, CompanyId, Name, CreatedAt }
