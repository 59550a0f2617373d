use async_trait::async_trait;
use models::customer::{self, CustomerStatus};

use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};

/// Optional, AND-combined filters for advanced search.
/// `name` and `email` are case-insensitive substring matches; `status` is equality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<CustomerStatus>,
}

/// Query and persistence operations available inside one unit of work.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<customer::Model>, ServiceError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
    async fn exists_by_customer_code(&self, code: &str) -> Result<bool, ServiceError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError>;

    /// Sorted page; an unknown sort field is a store error.
    async fn find_all(&self, req: &PageRequest) -> Result<Page<customer::Model>, ServiceError>;
    async fn find_by_status(&self, status: CustomerStatus) -> Result<Vec<customer::Model>, ServiceError>;
    /// Case-insensitive substring match over full name, email and customer code.
    async fn search_customers(&self, keyword: &str) -> Result<Vec<customer::Model>, ServiceError>;
    async fn advanced_search(&self, filter: &CustomerFilter) -> Result<Vec<customer::Model>, ServiceError>;

    /// Insert when `id` is not set, update otherwise. Returns the stored row.
    async fn save(&self, customer: customer::ActiveModel) -> Result<customer::Model, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;
}

/// A store bound to an open transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait CustomerUnitOfWork: CustomerStore {
    async fn commit(self: Box<Self>) -> Result<(), ServiceError>;
}

/// Repository abstraction: hands out one unit of work per service operation.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn CustomerUnitOfWork>, ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::cmp::Ordering;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use sea_orm::{Set, TryIntoModel};
    use tokio::sync::{Mutex as Gate, OwnedMutexGuard};

    use crate::pagination::Direction;

    // same spellings the SeaORM column parser accepts
    const SORTABLE: [&str; 11] = [
        "id", "customer_code", "customerCode", "full_name", "fullName", "email", "phone",
        "address", "status", "created_at", "createdAt",
    ];

    #[derive(Debug, Clone, Default)]
    struct Table {
        rows: BTreeMap<i64, customer::Model>,
        next_id: i64,
    }

    /// Rows live behind a shared lock; each unit of work edits a private copy
    /// that replaces the shared table on commit.
    ///
    /// Units of work are serialized: `begin` waits until the previous one has been
    /// committed or dropped, so a snapshot never goes stale before it is written back.
    #[derive(Clone, Default)]
    pub struct InMemoryCustomerRepository {
        table: Arc<Mutex<Table>>,
        gate: Arc<Gate<()>>,
    }

    impl InMemoryCustomerRepository {
        pub fn new() -> Self { Self::default() }

        /// Committed rows ordered by id.
        pub fn rows(&self) -> Vec<customer::Model> {
            self.table.lock().unwrap().rows.values().cloned().collect()
        }

        pub fn get(&self, id: i64) -> Option<customer::Model> {
            self.table.lock().unwrap().rows.get(&id).cloned()
        }

        /// Status is never changed by the service; tests seed it directly.
        pub fn set_status(&self, id: i64, status: CustomerStatus) {
            if let Some(row) = self.table.lock().unwrap().rows.get_mut(&id) {
                row.status = status;
            }
        }
    }

    #[async_trait]
    impl CustomerRepository for InMemoryCustomerRepository {
        async fn begin(&self) -> Result<Box<dyn CustomerUnitOfWork>, ServiceError> {
            let turn = Arc::clone(&self.gate).lock_owned().await;
            let work = self.table.lock().unwrap().clone();
            Ok(Box::new(InMemoryUnitOfWork { shared: Arc::clone(&self.table), work: Mutex::new(work), _turn: turn }))
        }
    }

    pub struct InMemoryUnitOfWork {
        shared: Arc<Mutex<Table>>,
        work: Mutex<Table>,
        // released on commit or drop
        _turn: OwnedMutexGuard<()>,
    }

    impl InMemoryUnitOfWork {
        fn select(&self, pred: impl Fn(&customer::Model) -> bool) -> Vec<customer::Model> {
            self.work.lock().unwrap().rows.values().filter(|c| pred(*c)).cloned().collect()
        }
    }

    fn contains_ci(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    fn compare(field: &str, a: &customer::Model, b: &customer::Model) -> Ordering {
        match field {
            "customer_code" | "customerCode" => a.customer_code.cmp(&b.customer_code),
            "full_name" | "fullName" => a.full_name.cmp(&b.full_name),
            "email" => a.email.cmp(&b.email),
            "phone" => a.phone.cmp(&b.phone),
            "address" => a.address.cmp(&b.address),
            "status" => a.status.as_str().cmp(b.status.as_str()),
            "created_at" | "createdAt" => a.created_at.cmp(&b.created_at),
            _ => a.id.cmp(&b.id),
        }
    }

    #[async_trait]
    impl CustomerStore for InMemoryUnitOfWork {
        async fn find_by_id(&self, id: i64) -> Result<Option<customer::Model>, ServiceError> {
            Ok(self.work.lock().unwrap().rows.get(&id).cloned())
        }

        async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
            Ok(self.work.lock().unwrap().rows.contains_key(&id))
        }

        async fn exists_by_customer_code(&self, code: &str) -> Result<bool, ServiceError> {
            Ok(!self.select(|c| c.customer_code == code).is_empty())
        }

        async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
            Ok(!self.select(|c| c.email == email).is_empty())
        }

        async fn find_all(&self, req: &PageRequest) -> Result<Page<customer::Model>, ServiceError> {
            let field = req.sort.field.as_str();
            if !SORTABLE.contains(&field) {
                return Err(ServiceError::Db(format!("unknown sort field: {field}")));
            }
            let mut all = self.select(|_| true);
            all.sort_by(|a, b| {
                let ord = match req.sort.direction {
                    Direction::Asc => compare(field, a, b),
                    Direction::Desc => compare(field, b, a),
                };
                ord.then(a.id.cmp(&b.id))
            });
            let total = all.len() as u64;
            let content = all
                .into_iter()
                .skip(usize::try_from(req.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(req.size).unwrap_or(usize::MAX))
                .collect();
            Ok(Page::new(content, req, total))
        }

        async fn find_by_status(&self, status: CustomerStatus) -> Result<Vec<customer::Model>, ServiceError> {
            Ok(self.select(|c| c.status == status))
        }

        async fn search_customers(&self, keyword: &str) -> Result<Vec<customer::Model>, ServiceError> {
            Ok(self.select(|c| {
                contains_ci(&c.full_name, keyword) || contains_ci(&c.email, keyword) || contains_ci(&c.customer_code, keyword)
            }))
        }

        async fn advanced_search(&self, filter: &CustomerFilter) -> Result<Vec<customer::Model>, ServiceError> {
            Ok(self.select(|c| {
                filter.name.as_deref().map_or(true, |n| contains_ci(&c.full_name, n))
                    && filter.email.as_deref().map_or(true, |e| contains_ci(&c.email, e))
                    && filter.status.map_or(true, |s| c.status == s)
            }))
        }

        async fn save(&self, mut am: customer::ActiveModel) -> Result<customer::Model, ServiceError> {
            let mut table = self.work.lock().unwrap();
            if am.id.is_not_set() {
                table.next_id += 1;
                am.id = Set(table.next_id);
                if am.status.is_not_set() { am.status = Set(CustomerStatus::Active); }
                if am.created_at.is_not_set() { am.created_at = Set(Utc::now().into()); }
            }
            let model = am.try_into_model()?;
            let clash = table.rows.values().find(|c| {
                c.id != model.id && (c.customer_code == model.customer_code || c.email == model.email)
            });
            if let Some(other) = clash {
                let key = if other.customer_code == model.customer_code { "customer_code" } else { "email" };
                return Err(ServiceError::Duplicate(format!("duplicate key value violates unique constraint on {key}")));
            }
            table.rows.insert(model.id, model.clone());
            Ok(model)
        }

        async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
            self.work.lock().unwrap().rows.remove(&id);
            Ok(())
        }
    }

    #[async_trait]
    impl CustomerUnitOfWork for InMemoryUnitOfWork {
        async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
            let this = *self;
            let work = this.work.into_inner().unwrap();
            *this.shared.lock().unwrap() = work;
            drop(this._turn);
            Ok(())
        }
    }
}
