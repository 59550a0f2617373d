//! Persistence models: SeaORM entities, value validation and connection helpers.

pub mod errors;
pub mod db;
pub mod customer;
