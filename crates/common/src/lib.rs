//! Shared building blocks used by every layer: response envelope, health
//! payload and logging setup.

pub mod types;
pub mod utils;
