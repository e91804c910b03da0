use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use models::company;
use super::domain::{CustomerDetail, CustomerListItem, CustomerUpdate, NewCustomer, SortOrder};
use super::errors::{CustomerError, ADD_CUSTOMER, DELETE_CUSTOMER, GET_CUSTOMER, LIST_CUSTOMERS, UPDATE_CUSTOMER};
use super::repository::{CompanyRepository, CustomerRepository};
use crate::errors::ServiceError;

/// Service wired with boxed repositories, as shared by the HTTP layer.
pub type DynCustomerService = CustomerService<dyn CustomerRepository, dyn CompanyRepository>;

/// Customer business service independent of web framework
pub struct CustomerService<C: ?Sized, P: ?Sized> {
    customers: Arc<C>,
    companies: Arc<P>,
}

fn repo_failure(action: &'static str) -> impl Fn(ServiceError) -> CustomerError {
    move |e| {
        let err = CustomerError::from_repository(action, e);
        if let CustomerError::Unexpected { source, .. } = &err {
            error!(action, error = %source, "customer operation failed");
        }
        err
    }
}

impl<C, P> CustomerService<C, P>
where
    C: CustomerRepository + ?Sized,
    P: CompanyRepository + ?Sized,
{
    pub fn new(customers: Arc<C>, companies: Arc<P>) -> Self { Self { customers, companies } }

    /// List customers with their company names, optionally sorted.
    ///
    /// An empty table is a success with an empty list.
    #[instrument(skip(self))]
    pub async fn list(&self, sort: Option<SortOrder>) -> Result<Vec<CustomerListItem>, CustomerError> {
        let rows = self.customers.list().await.map_err(repo_failure(LIST_CUSTOMERS))?;
        let companies = self.companies.list().await.map_err(repo_failure(LIST_CUSTOMERS))?;
        let names: HashMap<Uuid, String> = companies.into_iter().map(|c| (c.id, c.name)).collect();

        let mut items: Vec<CustomerListItem> = rows
            .iter()
            .map(|c| CustomerListItem::from_model(c).with_company_name(names.get(&c.company_id).cloned()))
            .collect();
        if let Some(order) = sort {
            order.apply(&mut items);
        }
        debug!(count = items.len(), "customers listed");
        Ok(items)
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<CustomerDetail, CustomerError> {
        let found = self.customers
            .get(id)
            .await
            .map_err(repo_failure(GET_CUSTOMER))?
            .ok_or_else(|| CustomerError::customer_not_found(id))?;
        let company = self.companies.get(found.company_id).await.map_err(repo_failure(GET_CUSTOMER))?;
        Ok(CustomerDetail::from_model(&found).with_company_name(company.map(|c| c.name)))
    }

    /// Create a customer under an existing company.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::customer::{CustomerService, NewCustomer};
    /// use service::customer::repository::mock::{MockCompanyRepository, MockCustomerRepository};
    /// let companies = Arc::new(MockCompanyRepository::default());
    /// let group = companies.add("Acme Group");
    /// let svc = CustomerService::new(Arc::new(MockCustomerRepository::default()), companies);
    /// let input = NewCustomer { company_id: group.id, name: "Acme".into(), email: None, phone: None, address: None, city: None };
    /// let created = tokio_test::block_on(svc.add(input)).unwrap();
    /// assert_eq!(created.name, "Acme");
    /// assert_eq!(created.company_name.as_deref(), Some("Acme Group"));
    /// ```
    #[instrument(skip(self, input), fields(company_id = %input.company_id))]
    pub async fn add(&self, input: NewCustomer) -> Result<CustomerDetail, CustomerError> {
        let fields = input.into_fields().normalized();
        fields.validate().map_err(ServiceError::from).map_err(repo_failure(ADD_CUSTOMER))?;
        let company = self.require_company(fields.company_id, ADD_CUSTOMER).await?;

        let created = self.customers.insert(fields).await.map_err(repo_failure(ADD_CUSTOMER))?;
        info!(customer_id = %created.id, company_id = %created.company_id, "customer_created");
        Ok(CustomerDetail::from_model(&created).with_company_name(Some(company.name)))
    }

    /// Overwrite every writable field of an existing customer.
    #[instrument(skip(self, input), fields(customer_id = %input.id, company_id = %input.company_id))]
    pub async fn update(&self, input: CustomerUpdate) -> Result<CustomerDetail, CustomerError> {
        let id = input.id;
        self.customers
            .get(id)
            .await
            .map_err(repo_failure(UPDATE_CUSTOMER))?
            .ok_or_else(|| CustomerError::customer_not_found(id))?;

        let fields = input.into_fields().normalized();
        fields.validate().map_err(ServiceError::from).map_err(repo_failure(UPDATE_CUSTOMER))?;
        let company = self.require_company(fields.company_id, UPDATE_CUSTOMER).await?;

        let updated = self.customers
            .update(id, fields)
            .await
            .map_err(repo_failure(UPDATE_CUSTOMER))?
            .ok_or_else(|| CustomerError::customer_not_found(id))?;
        info!(customer_id = %updated.id, company_id = %updated.company_id, "customer_updated");
        Ok(CustomerDetail::from_model(&updated).with_company_name(Some(company.name)))
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), CustomerError> {
        self.customers
            .get(id)
            .await
            .map_err(repo_failure(DELETE_CUSTOMER))?
            .ok_or_else(|| CustomerError::customer_not_found(id))?;
        // the row may disappear between the lookup and the delete
        if !self.customers.delete(id).await.map_err(repo_failure(DELETE_CUSTOMER))? {
            return Err(CustomerError::customer_not_found(id));
        }
        info!(customer_id = %id, "customer_deleted");
        Ok(())
    }

    async fn require_company(&self, company_id: Uuid, action: &'static str) -> Result<company::Model, CustomerError> {
        match self.companies.get(company_id).await.map_err(repo_failure(action))? {
            Some(c) => Ok(c),
            None => {
                warn!(action, %company_id, "rejected write referencing unknown company");
                Err(CustomerError::invalid_company(company_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::repository::mock::{MockCompanyRepository, MockCustomerRepository};
    use chrono::{Duration, TimeZone, Utc};
    use models::customer;
    use std::collections::HashSet;
    use std::error::Error as _;

    struct Fixture {
        customers: Arc<MockCustomerRepository>,
        companies: Arc<MockCompanyRepository>,
        svc: CustomerService<MockCustomerRepository, MockCompanyRepository>,
    }

    fn fixture(rows: Vec<customer::Model>, companies: Arc<MockCompanyRepository>) -> Fixture {
        let customers = Arc::new(MockCustomerRepository::with_rows(rows));
        let svc = CustomerService::new(customers.clone(), companies.clone());
        Fixture { customers, companies, svc }
    }

    fn row(name: &str, company_id: Uuid, minutes: i64) -> customer::Model {
        let at = (Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap() + Duration::minutes(minutes)).into();
        customer::Model {
            id: Uuid::new_v4(),
            company_id,
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            city: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn new_customer(company_id: Uuid, name: &str) -> NewCustomer {
        NewCustomer {
            company_id,
            name: name.into(),
            email: Some("buyer@acme.test".into()),
            phone: Some("555-0100".into()),
            address: Some("1 Rue de la Paix".into()),
            city: Some("Paris".into()),
        }
    }

    /// Three customers across one known and one unknown company.
    fn seeded() -> (Fixture, Uuid) {
        let companies = Arc::new(MockCompanyRepository::default());
        let known = companies.add("Northwind");
        let rows = vec![
            row("delta", known.id, 20),
            row("Bravo", Uuid::new_v4(), 5),
            row("charlie", known.id, 10),
        ];
        (fixture(rows, companies), known.id)
    }

    fn names(items: &[CustomerListItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[tokio::test]
    async fn list_without_sort_keeps_repository_order() {
        let (f, _) = seeded();
        let items = f.svc.list(None).await.unwrap();
        assert_eq!(names(&items), ["delta", "Bravo", "charlie"]);
    }

    #[tokio::test]
    async fn list_sorts_by_each_order() {
        let (f, _) = seeded();
        let cases = [
            (SortOrder::Date, ["Bravo", "charlie", "delta"]),
            (SortOrder::DateDesc, ["delta", "charlie", "Bravo"]),
            (SortOrder::Alphabetical, ["Bravo", "charlie", "delta"]),
            (SortOrder::AlphabeticalDesc, ["delta", "charlie", "Bravo"]),
        ];
        for (order, expected) in cases {
            let items = f.svc.list(Some(order)).await.unwrap();
            assert_eq!(names(&items), expected, "order {:?}", order);
        }
    }

    #[tokio::test]
    async fn list_returns_same_set_for_every_order() {
        let (f, _) = seeded();
        let all: HashSet<Uuid> = f.svc.list(None).await.unwrap().into_iter().map(|i| i.id).collect();
        let orders = [None, Some(SortOrder::Date), Some(SortOrder::DateDesc), Some(SortOrder::Alphabetical), Some(SortOrder::AlphabeticalDesc), SortOrder::parse("bogus")];
        for order in orders {
            let items = f.svc.list(order).await.unwrap();
            assert_eq!(items.len(), all.len());
            let ids: HashSet<Uuid> = items.into_iter().map(|i| i.id).collect();
            assert_eq!(ids, all);
        }
    }

    #[tokio::test]
    async fn list_fills_company_name_only_for_known_companies() {
        let (f, known) = seeded();
        for item in f.svc.list(None).await.unwrap() {
            if item.company_id == known {
                assert_eq!(item.company_name.as_deref(), Some("Northwind"));
            } else {
                assert_eq!(item.company_name, None);
            }
        }
    }

    #[tokio::test]
    async fn list_of_empty_table_is_empty_success() {
        let f = fixture(Vec::new(), Arc::new(MockCompanyRepository::default()));
        assert!(f.svc.list(Some(SortOrder::Date)).await.unwrap().is_empty());
        assert!(f.svc.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_enriches_with_company_name() {
        let (f, known) = seeded();
        let items = f.svc.list(None).await.unwrap();
        let with_company = items.iter().find(|i| i.company_id == known).unwrap();
        let orphan = items.iter().find(|i| i.company_id != known).unwrap();

        let detail = f.svc.get(with_company.id).await.unwrap();
        assert_eq!(detail.company_name.as_deref(), Some("Northwind"));
        let detail = f.svc.get(orphan.id).await.unwrap();
        assert_eq!(detail.company_name, None);
    }

    #[tokio::test]
    async fn missing_customer_is_not_found_everywhere() {
        let (f, known) = seeded();
        let ghost = Uuid::new_v4();
        assert!(matches!(f.svc.get(ghost).await, Err(CustomerError::NotFound(_))));
        assert!(matches!(f.svc.delete(ghost).await, Err(CustomerError::NotFound(_))));
        let upd = CustomerUpdate::with_id(ghost, new_customer(known, "Ghost"));
        assert!(matches!(f.svc.update(upd).await, Err(CustomerError::NotFound(_))));
        assert_eq!(f.customers.writes(), 0);
    }

    #[tokio::test]
    async fn add_with_unknown_company_writes_nothing() {
        let f = fixture(Vec::new(), Arc::new(MockCompanyRepository::default()));
        let res = f.svc.add(new_customer(Uuid::new_v4(), "Acme")).await;
        assert!(matches!(res, Err(CustomerError::Validation(_))));
        assert_eq!(f.customers.writes(), 0);
        assert!(f.svc.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_rejects_blank_name_before_lookup() {
        let companies = Arc::new(MockCompanyRepository::default());
        let c = companies.add("Contoso");
        let f = fixture(Vec::new(), companies);
        let res = f.svc.add(new_customer(c.id, "   ")).await;
        assert!(matches!(res, Err(CustomerError::Validation(ref m)) if m == "name required"));
        assert_eq!(f.customers.writes(), 0);
    }

    #[tokio::test]
    async fn add_then_get_round_trips_fields() {
        let companies = Arc::new(MockCompanyRepository::default());
        let c = companies.add("Contoso");
        let f = fixture(Vec::new(), companies);
        let input = new_customer(c.id, "Acme");

        let created = f.svc.add(input.clone()).await.unwrap();
        let fetched = f.svc.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, input.name);
        assert_eq!(fetched.email, input.email);
        assert_eq!(fetched.phone, input.phone);
        assert_eq!(fetched.address, input.address);
        assert_eq!(fetched.city, input.city);
        assert_eq!(fetched.company_id, c.id);
        assert_eq!(fetched.company_name.as_deref(), Some("Contoso"));
    }

    #[tokio::test]
    async fn added_customer_is_listed_alphabetically() {
        let (f, _) = seeded();
        let c1 = f.companies.add("C1");
        let created = f.svc.add(NewCustomer { company_id: c1.id, name: "Acme".into(), email: None, phone: None, address: None, city: None }).await.unwrap();
        assert_eq!(created.name, "Acme");
        assert_eq!(created.company_id, c1.id);

        let items = f.svc.list(Some(SortOrder::Alphabetical)).await.unwrap();
        assert_eq!(names(&items), ["Acme", "Bravo", "charlie", "delta"]);
        assert_eq!(items[0].company_name.as_deref(), Some("C1"));
    }

    #[tokio::test]
    async fn update_overwrites_all_fields() {
        let companies = Arc::new(MockCompanyRepository::default());
        let first = companies.add("First");
        let second = companies.add("Second");
        let f = fixture(Vec::new(), companies);
        let created = f.svc.add(new_customer(first.id, "Acme")).await.unwrap();

        let upd = CustomerUpdate {
            id: created.id,
            company_id: second.id,
            name: "Acme Holdings".into(),
            email: None,
            phone: None,
            address: None,
            city: Some("Berlin".into()),
        };
        let updated = f.svc.update(upd).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Acme Holdings");
        assert_eq!(updated.email, None);
        assert_eq!(updated.phone, None);
        assert_eq!(updated.city.as_deref(), Some("Berlin"));
        assert_eq!(updated.company_name.as_deref(), Some("Second"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_with_unknown_company_is_rejected() {
        let companies = Arc::new(MockCompanyRepository::default());
        let c = companies.add("Contoso");
        let f = fixture(Vec::new(), companies);
        let created = f.svc.add(new_customer(c.id, "Acme")).await.unwrap();

        let upd = CustomerUpdate::with_id(created.id, new_customer(Uuid::new_v4(), "Acme"));
        assert!(matches!(f.svc.update(upd).await, Err(CustomerError::Validation(_))));
        assert_eq!(f.customers.writes(), 1);
        assert_eq!(f.svc.get(created.id).await.unwrap().company_id, c.id);
    }

    #[tokio::test]
    async fn update_rejects_blank_name_without_writing() {
        let companies = Arc::new(MockCompanyRepository::default());
        let c = companies.add("Contoso");
        let f = fixture(Vec::new(), companies);
        let created = f.svc.add(new_customer(c.id, "Acme")).await.unwrap();

        let upd = CustomerUpdate::with_id(created.id, new_customer(c.id, " "));
        assert!(matches!(f.svc.update(upd).await, Err(CustomerError::Validation(ref m)) if m == "name required"));
        assert_eq!(f.customers.writes(), 1);
        assert_eq!(f.svc.get(created.id).await.unwrap().name, "Acme");
    }

    #[tokio::test]
    async fn update_of_customer_removed_after_lookup_is_not_found() {
        let companies = Arc::new(MockCompanyRepository::default());
        let c = companies.add("Contoso");
        let f = fixture(Vec::new(), companies);
        let created = f.svc.add(new_customer(c.id, "Acme")).await.unwrap();

        f.customers.vanish_before_next_write();
        let upd = CustomerUpdate::with_id(created.id, new_customer(c.id, "Acme Holdings"));
        let err = f.svc.update(upd).await.unwrap_err();
        assert!(matches!(err, CustomerError::NotFound(_)));
        assert_eq!(err.to_string(), format!("customer {} not found", created.id));
        assert_eq!(f.customers.writes(), 1);
    }

    #[tokio::test]
    async fn delete_of_customer_removed_after_lookup_is_not_found() {
        let (f, _) = seeded();
        let target = f.svc.list(None).await.unwrap()[0].id;

        f.customers.vanish_before_next_write();
        let err = f.svc.delete(target).await.unwrap_err();
        assert!(matches!(err, CustomerError::NotFound(_)));
        assert_eq!(f.customers.writes(), 0);
        assert_eq!(f.svc.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_customer() {
        let (f, _) = seeded();
        let target = f.svc.list(None).await.unwrap()[0].id;
        f.svc.delete(target).await.unwrap();
        assert!(matches!(f.svc.get(target).await, Err(CustomerError::NotFound(_))));
        assert_eq!(f.svc.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn repository_failures_become_unexpected_with_cause() {
        let (f, known) = seeded();
        f.customers.fail_with("connection reset by peer");

        let err = f.svc.list(None).await.unwrap_err();
        assert_eq!(err.to_string(), "list customers failed");
        assert!(err.source().unwrap().to_string().contains("connection reset by peer"));

        let err = f.svc.add(new_customer(known, "Acme")).await.unwrap_err();
        assert!(matches!(err, CustomerError::Unexpected { action: ADD_CUSTOMER, .. }));
        assert!(matches!(f.svc.delete(Uuid::new_v4()).await, Err(CustomerError::Unexpected { .. })));
    }

    #[tokio::test]
    async fn works_behind_trait_objects() {
        let companies = Arc::new(MockCompanyRepository::default());
        let c = companies.add("Contoso");
        let svc: DynCustomerService = CustomerService::new(
            Arc::new(MockCustomerRepository::default()) as Arc<dyn CustomerRepository>,
            companies as Arc<dyn CompanyRepository>,
        );
        let created = svc.add(new_customer(c.id, "Acme")).await.unwrap();
        assert_eq!(svc.get(created.id).await.unwrap().name, "Acme");
    }
}
