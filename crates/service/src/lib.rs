//! Service layer providing the customer CRUD operations on top of models.
//! - Separates business rules (uniqueness, immutable code) from data access.
//! - Reuses entity definitions in the `models` crate.
//! - Persistence is reached only through the `CustomerRepository` abstraction.

pub mod errors;
pub mod pagination;
pub mod customer;
#[cfg(test)]
pub mod test_support;

pub use customer::CustomerService;
