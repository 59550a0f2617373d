//! Shared building blocks for the customer API crates.

pub mod types;
pub mod utils;
