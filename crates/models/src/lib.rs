//! Persistence entities (sea-orm) and model-level validation.

pub mod errors;
pub mod db;
pub mod company;
pub mod customer;

#[cfg(test)]
mod tests;
