use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{company, errors};

pub const NAME_MAX_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Company }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::belongs_to(company::Entity)
                .from(Column::CompanyId)
                .to(company::Column::Id)
                .into(),
        }
    }
}

impl Related<company::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Writable columns of a customer. Create sets them, update overwrites all of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerFields {
    pub company_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl CustomerFields {
    /// Trim text and turn blank optional values into `None`.
    pub fn normalized(self) -> Self {
        fn opt(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            company_id: self.company_id,
            name: self.name.trim().to_string(),
            email: opt(self.email),
            phone: opt(self.phone),
            address: opt(self.address),
            city: opt(self.city),
        }
    }

    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validate_name(&self.name)?;
        validate_email(self.email.as_deref())?;
        Ok(())
    }
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("name too long (<={NAME_MAX_LEN})")));
    }
    Ok(())
}

pub fn validate_email(email: Option<&str>) -> Result<(), errors::ModelError> {
    match email {
        Some(e) if !e.contains('@') => Err(errors::ModelError::Validation("invalid email".into())),
        _ => Ok(()),
    }
}

/// Insert a new customer. Runs on a connection or an open transaction.
pub async fn create<C: ConnectionTrait>(db: &C, fields: CustomerFields) -> Result<Model, errors::ModelError> {
    let fields = fields.normalized();
    fields.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(fields.company_id),
        name: Set(fields.name),
        email: Set(fields.email),
        phone: Set(fields.phone),
        address: Set(fields.address),
        city: Set(fields.city),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Replace every writable column of `existing`; `created_at` is kept.
pub async fn overwrite<C: ConnectionTrait>(db: &C, existing: Model, fields: CustomerFields) -> Result<Model, errors::ModelError> {
    let fields = fields.normalized();
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.company_id = Set(fields.company_id);
    am.name = Set(fields.name);
    am.email = Set(fields.email);
    am.phone = Set(fields.phone);
    am.address = Set(fields.address);
    am.city = Set(fields.city);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
