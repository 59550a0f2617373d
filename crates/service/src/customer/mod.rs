//! Customer module: three-layer architecture (dto, repository, service).
//!
//! The service owns uniqueness rules and DTO mapping; stores only persist and query.

pub mod dto;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::CustomerService;
