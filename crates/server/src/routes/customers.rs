use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use service::customer::dto::{CustomerPatchRequest, CustomerRequest, CustomerResponse, CustomerUpdateRequest};
use service::pagination::Page;

use crate::{errors::JsonApiError, routes::AppState};

fn default_size() -> u64 { 10 }
fn default_sort_by() -> String { "id".to_string() }
fn default_sort_dir() -> String { "asc".to_string() }

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
    /// Entity field name, e.g. `fullName` or `created_at`
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// `asc`, anything else sorts descending
    #[serde(default = "default_sort_dir")]
    pub sort_dir: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub keyword: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdvancedSearchQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Unknown values are ignored
    pub status: Option<String>,
}

#[utoipa::path(
    get, path = "/api/customers", tag = "customers",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of customers", body = crate::openapi::CustomerPageDoc),
        (status = 500, description = "Unknown sort field or store failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Result<Json<Page<CustomerResponse>>, JsonApiError> {
    let page = state.customers.list(q.page, q.size, &q.sort_by, &q.sort_dir).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = crate::openapi::CustomerResponseDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<CustomerResponse>, JsonApiError> {
    Ok(Json(state.customers.get_by_id(id).await?))
}

#[utoipa::path(
    post, path = "/api/customers", tag = "customers",
    request_body = crate::openapi::CustomerRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CustomerResponseDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Duplicate customer code or email", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), JsonApiError> {
    input.validate()?;
    info!(customer_code = %input.customer_code, "customer_create_request");
    let created = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = crate::openapi::CustomerUpdateRequestDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CustomerResponseDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Email already in use", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CustomerUpdateRequest>,
) -> Result<Json<CustomerResponse>, JsonApiError> {
    input.validate()?;
    Ok(Json(state.customers.update(id, input).await?))
}

#[utoipa::path(
    patch, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = crate::openapi::CustomerPatchRequestDoc,
    responses(
        (status = 200, description = "Patched", body = crate::openapi::CustomerResponseDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Email already in use", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CustomerPatchRequest>,
) -> Result<Json<CustomerResponse>, JsonApiError> {
    input.validate()?;
    Ok(Json(state.customers.partial_update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, JsonApiError> {
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/customers/search", tag = "customers",
    params(SearchQuery),
    responses((status = 200, description = "Customers whose name, email or code contain the keyword", body = [crate::openapi::CustomerResponseDoc]))
)]
pub async fn search(State(state): State<AppState>, Query(q): Query<SearchQuery>) -> Result<Json<Vec<CustomerResponse>>, JsonApiError> {
    Ok(Json(state.customers.search(&q.keyword).await?))
}

#[utoipa::path(
    get, path = "/api/customers/status/{status}", tag = "customers",
    params(("status" = String, Path, description = "ACTIVE, INACTIVE or SUSPENDED, any case")),
    responses(
        (status = 200, description = "Customers with the status", body = [crate::openapi::CustomerResponseDoc]),
        (status = 404, description = "Invalid status", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list_by_status(State(state): State<AppState>, Path(status): Path<String>) -> Result<Json<Vec<CustomerResponse>>, JsonApiError> {
    Ok(Json(state.customers.list_by_status(&status).await?))
}

#[utoipa::path(
    get, path = "/api/customers/advanced-search", tag = "customers",
    params(AdvancedSearchQuery),
    responses((status = 200, description = "Customers matching every given filter", body = [crate::openapi::CustomerResponseDoc]))
)]
pub async fn advanced_search(
    State(state): State<AppState>,
    Query(q): Query<AdvancedSearchQuery>,
) -> Result<Json<Vec<CustomerResponse>>, JsonApiError> {
    let found = state
        .customers
        .advanced_search(q.name.as_deref(), q.email.as_deref(), q.status.as_deref())
        .await?;
    Ok(Json(found))
}
