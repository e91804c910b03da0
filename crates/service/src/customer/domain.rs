use std::cmp::Reverse;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::customer::{self, CustomerFields};

/// Create request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCustomer {
    pub company_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl NewCustomer {
    pub fn into_fields(self) -> CustomerFields {
        CustomerFields {
            company_id: self.company_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
        }
    }
}

/// Update request; every writable field is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerUpdate {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl CustomerUpdate {
    /// Target `id` with the same field set a create request carries.
    pub fn with_id(id: Uuid, body: NewCustomer) -> Self {
        Self {
            id,
            company_id: body.company_id,
            name: body.name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            city: body.city,
        }
    }

    pub fn into_fields(self) -> CustomerFields {
        CustomerFields {
            company_id: self.company_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
        }
    }
}

/// List view row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerListItem {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_id: Uuid,
    /// Filled from the company table; `None` when the company is missing.
    pub company_name: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl CustomerListItem {
    pub fn from_model(m: &customer::Model) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            email: m.email.clone(),
            phone: m.phone.clone(),
            company_id: m.company_id,
            company_name: None,
            created_at: m.created_at,
        }
    }

    pub fn with_company_name(mut self, name: Option<String>) -> Self {
        self.company_name = name;
        self
    }
}

/// Detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerDetail {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl CustomerDetail {
    pub fn from_model(m: &customer::Model) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            email: m.email.clone(),
            phone: m.phone.clone(),
            address: m.address.clone(),
            city: m.city.clone(),
            company_id: m.company_id,
            company_name: None,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    pub fn with_company_name(mut self, name: Option<String>) -> Self {
        self.company_name = name;
        self
    }
}

/// Ordering applied to the customer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    Date,
    DateDesc,
    /// Name, case-insensitive
    Alphabetical,
    AlphabeticalDesc,
}

impl SortOrder {
    /// Lenient parse for query strings. Unknown keys yield `None` so the
    /// caller keeps repository order instead of failing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "datedesc" | "date_desc" => Some(Self::DateDesc),
            "alphabetical" => Some(Self::Alphabetical),
            "alphabeticaldesc" | "alphabetical_desc" => Some(Self::AlphabeticalDesc),
            _ => None,
        }
    }

    /// Stable in-place sort.
    pub fn apply(self, items: &mut [CustomerListItem]) {
        match self {
            Self::Date => items.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            Self::DateDesc => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::Alphabetical => items.sort_by_cached_key(name_key),
            Self::AlphabeticalDesc => items.sort_by_cached_key(|i| Reverse(name_key(i))),
        }
    }
}

/// Computed once per item; the exact name breaks ties between case variants.
fn name_key(item: &CustomerListItem) -> (String, String) {
    (item.name.to_lowercase(), item.name.clone())
}
