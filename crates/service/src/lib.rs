//! Service layer providing business-oriented customer operations on top of models.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Maps persistence rows to transfer objects explicitly.

pub mod errors;
pub mod customer;
#[cfg(test)]
pub mod test_support;
