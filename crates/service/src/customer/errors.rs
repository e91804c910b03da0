use thiserror::Error;
use uuid::Uuid;

use models::errors::ModelError;
use crate::errors::ServiceError;

pub const LIST_CUSTOMERS: &str = "list customers";
pub const GET_CUSTOMER: &str = "get customer";
pub const ADD_CUSTOMER: &str = "add customer";
pub const UPDATE_CUSTOMER: &str = "update customer";
pub const DELETE_CUSTOMER: &str = "delete customer";

/// Business errors for customer workflows.
///
/// `Unexpected` keeps a stable message (`"<action> failed"`) and carries the
/// underlying repository error as its source.
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{action} failed")]
    Unexpected {
        action: &'static str,
        #[source]
        source: ServiceError,
    },
}

impl CustomerError {
    pub fn customer_not_found(id: Uuid) -> Self { Self::NotFound(format!("customer {} not found", id)) }

    pub fn invalid_company(company_id: Uuid) -> Self {
        Self::Validation(format!("company {} does not exist", company_id))
    }

    /// Classify a repository failure raised while performing `action`.
    pub fn from_repository(action: &'static str, err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => Self::Validation(msg),
            ServiceError::NotFound(msg) => Self::NotFound(msg),
            source => Self::Unexpected { action, source },
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            CustomerError::NotFound(_) => 2001,
            CustomerError::Validation(_) => 2002,
            CustomerError::Unexpected { .. } => 2100,
        }
    }
}
