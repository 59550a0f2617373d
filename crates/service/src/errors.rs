use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn customer_not_found(id: i64) -> Self {
        Self::NotFound(format!("Customer not found with id: {id}"))
    }

    pub fn invalid_status(text: &str) -> Self {
        Self::NotFound(format!("Invalid status: {text}"))
    }

    pub fn duplicate_code(code: &str) -> Self {
        Self::Duplicate(format!("Customer code already exists: {code}"))
    }

    pub fn duplicate_email(email: &str) -> Self {
        Self::Duplicate(format!("Email already exists: {email}"))
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        // unique indexes are the backstop for racing creates/updates
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Duplicate(detail),
            _ => Self::Db(e.to_string()),
        }
    }
}
