use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const CUSTOMER_CODE_MAX_LEN: usize = 32;
pub const FULL_NAME_MAX_LEN: usize = 128;
pub const EMAIL_MAX_LEN: usize = 255;
pub const PHONE_MAX_LEN: usize = 32;
pub const ADDRESS_MAX_LEN: usize = 512;

/// Lifecycle status of a customer, stored as its upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
    #[sea_orm(string_value = "SUSPENDED")]
    Suspended,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [CustomerStatus::Active, CustomerStatus::Inactive, CustomerStatus::Suspended];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "ACTIVE",
            CustomerStatus::Inactive => "INACTIVE",
            CustomerStatus::Suspended => "SUSPENDED",
        }
    }

    /// Case-insensitive exact match against the variant names.
    ///
    /// Returns `None` for anything else, surrounding whitespace included; callers decide
    /// whether that is an error or simply "no status".
    pub fn parse(text: &str) -> Option<Self> {
        let up = text.to_ascii_uppercase();
        Self::ALL.into_iter().find(|s| s.as_str() == up)
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub customer_code: String,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), errors::ModelError> {
    if value.chars().count() > max {
        return Err(errors::ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

fn check_required(field: &str, value: &str, max: usize) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} is required")));
    }
    check_len(field, value, max)
}

pub fn validate_customer_code(code: &str) -> Result<(), errors::ModelError> {
    check_required("customer_code", code, CUSTOMER_CODE_MAX_LEN)
}

pub fn validate_full_name(name: &str) -> Result<(), errors::ModelError> {
    check_required("full_name", name, FULL_NAME_MAX_LEN)
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    check_required("email", email, EMAIL_MAX_LEN)?;
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), errors::ModelError> {
    check_len("phone", phone, PHONE_MAX_LEN)
}

pub fn validate_address(address: &str) -> Result<(), errors::ModelError> {
    check_len("address", address, ADDRESS_MAX_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_ignores_case() {
        assert_eq!(CustomerStatus::parse("active"), Some(CustomerStatus::Active));
        assert_eq!(CustomerStatus::parse("InActive"), Some(CustomerStatus::Inactive));
        assert_eq!(CustomerStatus::parse("SUSPENDED"), Some(CustomerStatus::Suspended));
    }

    #[test]
    fn parse_status_rejects_unknown_and_padded() {
        assert_eq!(CustomerStatus::parse("bogus"), None);
        assert_eq!(CustomerStatus::parse(""), None);
        assert_eq!(CustomerStatus::parse(" active"), None);
    }

    #[test]
    fn status_text_matches_stored_value() {
        for s in CustomerStatus::ALL {
            assert_eq!(s.to_string(), s.to_value());
            assert_eq!(CustomerStatus::parse(&s.to_string()), Some(s));
        }
    }

    #[test]
    fn status_serializes_upper_case() {
        let v = serde_json::to_value(CustomerStatus::Inactive).unwrap();
        assert_eq!(v, "INACTIVE");
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("ax.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a b@x.com").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("  ").is_err());
    }

    #[test]
    fn required_fields_and_lengths() {
        assert!(validate_customer_code("C001").is_ok());
        assert!(validate_customer_code(" ").is_err());
        assert!(validate_customer_code(&"x".repeat(CUSTOMER_CODE_MAX_LEN + 1)).is_err());
        assert!(validate_full_name("Jane Doe").is_ok());
        assert!(validate_full_name("").is_err());
        assert!(validate_phone("").is_ok());
        assert!(validate_phone(&"1".repeat(PHONE_MAX_LEN + 1)).is_err());
        assert!(validate_address(&"a".repeat(ADDRESS_MAX_LEN)).is_ok());
    }
}
