use std::sync::Arc;

use sea_orm::Set;
use tracing::{debug, info, instrument};

use models::customer::{self, CustomerStatus};

use super::dto::{CustomerPatchRequest, CustomerRequest, CustomerResponse, CustomerUpdateRequest};
use super::repository::{CustomerFilter, CustomerRepository, CustomerStore};
use crate::errors::ServiceError;
use crate::pagination::{Direction, Page, PageRequest, Sort};

/// Customer business service independent of web framework.
///
/// Every operation opens one unit of work on the repository and commits it only on success;
/// early returns drop the unit of work, which rolls it back.
pub struct CustomerService<R: CustomerRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CustomerRepository + ?Sized> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Page through all customers.
    ///
    /// `sort_dir` selects ascending only when it equals `asc` ignoring case. The sort field is
    /// passed through unchecked; the store rejects names it does not know.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, size: u64, sort_field: &str, sort_dir: &str) -> Result<Page<CustomerResponse>, ServiceError> {
        let req = PageRequest::of(page, size, Sort::new(sort_field, Direction::from_param(sort_dir)));
        let tx = self.repo.begin().await?;
        let found = tx.find_all(&req).await?;
        tx.commit().await?;
        Ok(found.map(CustomerResponse::from))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<CustomerResponse, ServiceError> {
        let tx = self.repo.begin().await?;
        let found = tx.find_by_id(id).await?.ok_or_else(|| ServiceError::customer_not_found(id))?;
        tx.commit().await?;
        Ok(found.into())
    }

    /// Create a customer. Code uniqueness is checked before email uniqueness.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{dto::CustomerRequest, repository::mock::InMemoryCustomerRepository, CustomerService};
    /// use std::sync::Arc;
    /// let svc = CustomerService::new(Arc::new(InMemoryCustomerRepository::new()));
    /// let req = CustomerRequest {
    ///     customer_code: "C001".into(),
    ///     full_name: "Jane Doe".into(),
    ///     email: "jane@example.com".into(),
    ///     phone: None,
    ///     address: None,
    /// };
    /// let created = tokio_test::block_on(svc.create(req.clone())).unwrap();
    /// assert_eq!(created.customer_code, "C001");
    /// assert_eq!(created.status, "ACTIVE");
    /// assert!(tokio_test::block_on(svc.create(req)).is_err());
    /// ```
    #[instrument(skip(self, req), fields(customer_code = %req.customer_code))]
    pub async fn create(&self, req: CustomerRequest) -> Result<CustomerResponse, ServiceError> {
        let tx = self.repo.begin().await?;
        if tx.exists_by_customer_code(&req.customer_code).await? {
            return Err(ServiceError::duplicate_code(&req.customer_code));
        }
        if tx.exists_by_email(&req.email).await? {
            return Err(ServiceError::duplicate_email(&req.email));
        }
        let saved = tx.save(customer::ActiveModel::from(req)).await?;
        tx.commit().await?;
        info!(customer_id = saved.id, customer_code = %saved.customer_code, "customer_created");
        Ok(saved.into())
    }

    /// Overwrite name, email, phone and address. The customer code never changes.
    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: CustomerUpdateRequest) -> Result<CustomerResponse, ServiceError> {
        let tx = self.repo.begin().await?;
        let existing = tx.find_by_id(id).await?.ok_or_else(|| ServiceError::customer_not_found(id))?;
        if existing.email != req.email && tx.exists_by_email(&req.email).await? {
            return Err(ServiceError::duplicate_email(&req.email));
        }
        let mut am: customer::ActiveModel = existing.into();
        am.full_name = Set(req.full_name);
        am.email = Set(req.email);
        am.phone = Set(req.phone);
        am.address = Set(req.address);
        let saved = tx.save(am).await?;
        tx.commit().await?;
        info!(customer_id = saved.id, "customer_updated");
        Ok(saved.into())
    }

    /// Apply only the fields present, in the order full name, email, phone, address.
    ///
    /// Nothing is written until every check has passed, so a rejected email leaves the
    /// stored row exactly as it was.
    #[instrument(skip(self, req))]
    pub async fn partial_update(&self, id: i64, req: CustomerPatchRequest) -> Result<CustomerResponse, ServiceError> {
        let tx = self.repo.begin().await?;
        let existing = tx.find_by_id(id).await?.ok_or_else(|| ServiceError::customer_not_found(id))?;
        let current_email = existing.email.clone();
        let mut am: customer::ActiveModel = existing.into();

        if let Some(full_name) = req.full_name {
            am.full_name = Set(full_name);
        }
        if let Some(email) = req.email {
            if email != current_email && tx.exists_by_email(&email).await? {
                return Err(ServiceError::duplicate_email(&email));
            }
            am.email = Set(email);
        }
        if let Some(phone) = req.phone {
            am.phone = Set(Some(phone));
        }
        if let Some(address) = req.address {
            am.address = Set(Some(address));
        }

        let saved = tx.save(am).await?;
        tx.commit().await?;
        info!(customer_id = saved.id, "customer_patched");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let tx = self.repo.begin().await?;
        if !tx.exists_by_id(id).await? {
            return Err(ServiceError::customer_not_found(id));
        }
        tx.delete_by_id(id).await?;
        tx.commit().await?;
        info!(customer_id = id, "customer_deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn search(&self, keyword: &str) -> Result<Vec<CustomerResponse>, ServiceError> {
        let tx = self.repo.begin().await?;
        let rows = tx.search_customers(keyword).await?;
        tx.commit().await?;
        debug!(count = rows.len(), "customer_search");
        Ok(rows.into_iter().map(CustomerResponse::from).collect())
    }

    /// Strict: an unknown status is reported as `NotFound`.
    #[instrument(skip(self))]
    pub async fn list_by_status(&self, status: &str) -> Result<Vec<CustomerResponse>, ServiceError> {
        let parsed = CustomerStatus::parse(status).ok_or_else(|| ServiceError::invalid_status(status))?;
        let tx = self.repo.begin().await?;
        let rows = tx.find_by_status(parsed).await?;
        tx.commit().await?;
        Ok(rows.into_iter().map(CustomerResponse::from).collect())
    }

    /// Lenient: a blank or unknown status drops the status filter instead of failing.
    /// This intentionally differs from [`Self::list_by_status`].
    #[instrument(skip(self))]
    pub async fn advanced_search(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<CustomerResponse>, ServiceError> {
        let parsed = status.filter(|s| !s.trim().is_empty()).and_then(CustomerStatus::parse);
        if status.is_some() && parsed.is_none() {
            debug!(status = ?status, "ignoring unrecognised status filter");
        }
        let filter = CustomerFilter { name: name.map(str::to_owned), email: email.map(str::to_owned), status: parsed };
        let tx = self.repo.begin().await?;
        let rows = tx.advanced_search(&filter).await?;
        tx.commit().await?;
        Ok(rows.into_iter().map(CustomerResponse::from).collect())
    }
}
