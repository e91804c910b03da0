use std::sync::Arc;

use service::customer::{
    repository::{CompanyRepository, CustomerRepository},
    CustomerService, DynCustomerService,
};

#[derive(Clone)]
pub struct ServerState {
    pub customers: Arc<DynCustomerService>,
}

impl ServerState {
    pub fn new(customers: Arc<dyn CustomerRepository>, companies: Arc<dyn CompanyRepository>) -> Self {
        Self { customers: Arc::new(CustomerService::new(customers, companies)) }
    }
}
