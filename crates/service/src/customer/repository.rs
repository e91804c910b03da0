use async_trait::async_trait;
use uuid::Uuid;

use models::{company, customer::{self, CustomerFields}};
use crate::errors::ServiceError;

/// Persistence operations for customers. Each write commits on its own.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<customer::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<customer::Model>, ServiceError>;
    async fn insert(&self, fields: CustomerFields) -> Result<customer::Model, ServiceError>;
    /// Overwrite all writable fields; `Ok(None)` when the row is gone.
    async fn update(&self, id: Uuid, fields: CustomerFields) -> Result<Option<customer::Model>, ServiceError>;
    /// Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// Read-only company lookups.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<company::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<company::Model>, ServiceError>;
}

/// Simple in-memory mock repositories for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Keeps insertion order; can be told to fail every call.
    #[derive(Default)]
    pub struct MockCustomerRepository {
        rows: Mutex<Vec<customer::Model>>,
        writes: AtomicUsize,
        failure: Mutex<Option<String>>,
        vanish: AtomicBool,
    }

    impl MockCustomerRepository {
        pub fn with_rows(rows: Vec<customer::Model>) -> Self {
            Self { rows: Mutex::new(rows), ..Self::default() }
        }

        /// Number of successful insert/update/delete calls.
        pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

        /// Make every following call return `ServiceError::Db(msg)`.
        pub fn fail_with(&self, msg: impl Into<String>) {
            *self.failure.lock().unwrap() = Some(msg.into());
        }

        /// The next update or delete finds its target row already gone,
        /// as if another writer removed it after the service's lookup.
        pub fn vanish_before_next_write(&self) {
            self.vanish.store(true, Ordering::SeqCst);
        }

        fn take_vanished(&self, id: Uuid) {
            if self.vanish.swap(false, Ordering::SeqCst) {
                self.rows.lock().unwrap().retain(|c| c.id != id);
            }
        }

        fn check(&self) -> Result<(), ServiceError> {
            match self.failure.lock().unwrap().as_ref() {
                Some(msg) => Err(ServiceError::Db(msg.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl CustomerRepository for MockCustomerRepository {
        async fn list(&self) -> Result<Vec<customer::Model>, ServiceError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn get(&self, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
        }

        async fn insert(&self, fields: CustomerFields) -> Result<customer::Model, ServiceError> {
            self.check()?;
            let fields = fields.normalized();
            fields.validate()?;
            let now = Utc::now().into();
            let row = customer::Model {
                id: Uuid::new_v4(),
                company_id: fields.company_id,
                name: fields.name,
                email: fields.email,
                phone: fields.phone,
                address: fields.address,
                city: fields.city,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(row.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(row)
        }

        async fn update(&self, id: Uuid, fields: CustomerFields) -> Result<Option<customer::Model>, ServiceError> {
            self.check()?;
            let fields = fields.normalized();
            fields.validate()?;
            self.take_vanished(id);
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|c| c.id == id) else { return Ok(None); };
            row.company_id = fields.company_id;
            row.name = fields.name;
            row.email = fields.email;
            row.phone = fields.phone;
            row.address = fields.address;
            row.city = fields.city;
            row.updated_at = Utc::now().into();
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            self.check()?;
            self.take_vanished(id);
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| c.id != id);
            let deleted = rows.len() < before;
            if deleted { self.writes.fetch_add(1, Ordering::SeqCst); }
            Ok(deleted)
        }
    }

    #[derive(Default)]
    pub struct MockCompanyRepository {
        rows: Mutex<Vec<company::Model>>,
    }

    impl MockCompanyRepository {
        pub fn add(&self, name: &str) -> company::Model {
            let row = company::Model { id: Uuid::new_v4(), name: name.to_string(), created_at: Utc::now().into() };
            self.rows.lock().unwrap().push(row.clone());
            row
        }
    }

    #[async_trait]
    impl CompanyRepository for MockCompanyRepository {
        async fn list(&self) -> Result<Vec<company::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn get(&self, id: Uuid) -> Result<Option<company::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
        }
    }
}
