use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequestDoc {
    #[schema(max_length = 32)]
    pub customer_code: String,
    #[schema(max_length = 128)]
    pub full_name: String,
    #[schema(max_length = 255)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateRequestDoc {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatchRequestDoc {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponseDoc {
    pub id: i64,
    pub customer_code: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[schema(example = "ACTIVE")]
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPageDoc {
    pub content: Vec<CustomerResponseDoc>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub error: String, pub message: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::customers::list,
        crate::routes::customers::get,
        crate::routes::customers::create,
        crate::routes::customers::update,
        crate::routes::customers::patch,
        crate::routes::customers::delete,
        crate::routes::customers::search,
        crate::routes::customers::list_by_status,
        crate::routes::customers::advanced_search,
    ),
    components(
        schemas(
            HealthResponse,
            CustomerRequestDoc,
            CustomerUpdateRequestDoc,
            CustomerPatchRequestDoc,
            CustomerResponseDoc,
            CustomerPageDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "customers")
    )
)]
pub struct ApiDoc;
