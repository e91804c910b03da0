use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect, TransactionTrait};
use uuid::Uuid;

use models::{company, customer::{self, CustomerFields}};
use crate::customer::repository::{CompanyRepository, CustomerRepository};
use crate::errors::ServiceError;

/// Every write runs in its own transaction; dropping it on an early return rolls back.
pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn list(&self) -> Result<Vec<customer::Model>, ServiceError> {
        customer::Entity::find().all(&self.db).await.map_err(ServiceError::db)
    }

    async fn get(&self, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
        customer::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::db)
    }

    async fn insert(&self, fields: CustomerFields) -> Result<customer::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db)?;
        let created = customer::create(&txn, fields).await?;
        txn.commit().await.map_err(ServiceError::db)?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, fields: CustomerFields) -> Result<Option<customer::Model>, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db)?;
        let current = customer::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db)?;
        let Some(existing) = current else { return Ok(None); };
        let updated = customer::overwrite(&txn, existing, fields).await?;
        txn.commit().await.map_err(ServiceError::db)?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db)?;
        let res = customer::Entity::delete_by_id(id).exec(&txn).await.map_err(ServiceError::db)?;
        txn.commit().await.map_err(ServiceError::db)?;
        Ok(res.rows_affected > 0)
    }
}

pub struct SeaOrmCompanyRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn list(&self) -> Result<Vec<company::Model>, ServiceError> {
        company::Entity::find().all(&self.db).await.map_err(ServiceError::db)
    }

    async fn get(&self, id: Uuid) -> Result<Option<company::Model>, ServiceError> {
        company::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::db)
    }
}
