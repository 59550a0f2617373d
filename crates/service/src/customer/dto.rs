use chrono::{DateTime, FixedOffset};
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use models::customer;
use models::errors::ModelError;

/// Create input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub customer_code: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Full update input; every mutable field is overwritten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Partial update input; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatchRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Output shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i64,
    pub customer_code: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
}

fn validate_optional(value: Option<&str>, check: fn(&str) -> Result<(), ModelError>) -> Result<(), ModelError> {
    value.map_or(Ok(()), check)
}

impl CustomerRequest {
    pub fn validate(&self) -> Result<(), ModelError> {
        customer::validate_customer_code(&self.customer_code)?;
        customer::validate_full_name(&self.full_name)?;
        customer::validate_email(&self.email)?;
        validate_optional(self.phone.as_deref(), customer::validate_phone)?;
        validate_optional(self.address.as_deref(), customer::validate_address)
    }
}

impl CustomerUpdateRequest {
    pub fn validate(&self) -> Result<(), ModelError> {
        customer::validate_full_name(&self.full_name)?;
        customer::validate_email(&self.email)?;
        validate_optional(self.phone.as_deref(), customer::validate_phone)?;
        validate_optional(self.address.as_deref(), customer::validate_address)
    }
}

impl CustomerPatchRequest {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_optional(self.full_name.as_deref(), customer::validate_full_name)?;
        validate_optional(self.email.as_deref(), customer::validate_email)?;
        validate_optional(self.phone.as_deref(), customer::validate_phone)?;
        validate_optional(self.address.as_deref(), customer::validate_address)
    }
}

impl From<customer::Model> for CustomerResponse {
    fn from(c: customer::Model) -> Self {
        Self {
            id: c.id,
            customer_code: c.customer_code,
            full_name: c.full_name,
            email: c.email,
            phone: c.phone,
            address: c.address,
            status: c.status.to_string(),
            created_at: c.created_at,
        }
    }
}

/// Only the five settable fields; id, status and created_at come from the store.
impl From<CustomerRequest> for customer::ActiveModel {
    fn from(r: CustomerRequest) -> Self {
        customer::ActiveModel {
            id: NotSet,
            customer_code: Set(r.customer_code),
            full_name: Set(r.full_name),
            email: Set(r.email),
            phone: Set(r.phone),
            address: Set(r.address),
            status: NotSet,
            created_at: NotSet,
        }
    }
}
