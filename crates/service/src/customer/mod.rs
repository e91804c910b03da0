//! Customer module: three-layer architecture (domain, repository, service).
//!
//! The service validates company references, joins company names onto
//! transfer objects and turns every failure into a `CustomerError`.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{CustomerDetail, CustomerListItem, CustomerUpdate, NewCustomer, SortOrder};
pub use errors::CustomerError;
pub use service::{CustomerService, DynCustomerService};
