use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, TryIntoModel,
};
use tracing::debug;

use models::customer::{self, CustomerStatus, Entity as CustomerEntity};

use crate::customer::repository::{CustomerFilter, CustomerRepository, CustomerStore, CustomerUnitOfWork};
use crate::errors::ServiceError;
use crate::pagination::{Direction, Page, PageRequest};

/// SeaORM-backed repository; every unit of work is a database transaction.
pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn begin(&self) -> Result<Box<dyn CustomerUnitOfWork>, ServiceError> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmUnitOfWork { txn }))
    }
}

/// Open transaction; SeaORM rolls it back when dropped uncommitted.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

const LIKE_ESCAPE: char = '\\';

/// Keyword text with `%`, `_` and the escape char itself matched literally.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// `LOWER(customer.<col>) LIKE '%needle%' ESCAPE '\'` with the needle lower-cased up front.
fn lower_like(col: customer::Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((CustomerEntity, col)))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

async fn exists<C: ConnectionTrait>(db: &C, cond: Condition) -> Result<bool, ServiceError> {
    let n = CustomerEntity::find().filter(cond).count(db).await?;
    Ok(n > 0)
}

pub async fn find_page<C: ConnectionTrait>(db: &C, req: &PageRequest) -> Result<Page<customer::Model>, ServiceError> {
    let column = customer::Column::from_str(&req.sort.field)
        .map_err(|_| ServiceError::Db(format!("unknown sort field: {}", req.sort.field)))?;
    let order = match req.sort.direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    };
    let paginator = CustomerEntity::find()
        .order_by(column, order)
        .order_by_asc(customer::Column::Id)
        .paginate(db, req.size);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(req.page).await?;
    debug!(page = req.page, size = req.size, total, "customer page fetched");
    Ok(Page::new(rows, req, total))
}

pub async fn search<C: ConnectionTrait>(db: &C, keyword: &str) -> Result<Vec<customer::Model>, ServiceError> {
    let cond = Condition::any()
        .add(lower_like(customer::Column::FullName, keyword))
        .add(lower_like(customer::Column::Email, keyword))
        .add(lower_like(customer::Column::CustomerCode, keyword));
    let rows = CustomerEntity::find()
        .filter(cond)
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn filter<C: ConnectionTrait>(db: &C, f: &CustomerFilter) -> Result<Vec<customer::Model>, ServiceError> {
    let cond = Condition::all()
        .add_option(f.name.as_deref().map(|n| lower_like(customer::Column::FullName, n)))
        .add_option(f.email.as_deref().map(|e| lower_like(customer::Column::Email, e)))
        .add_option(f.status.map(|s| customer::Column::Status.eq(s)));
    let rows = CustomerEntity::find()
        .filter(cond)
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn save<C: ConnectionTrait>(db: &C, am: customer::ActiveModel) -> Result<customer::Model, ServiceError> {
    if am.id.is_not_set() {
        return Ok(am.insert(db).await?);
    }
    if !am.is_changed() {
        // nothing to write; UPDATE with an empty SET list is not valid SQL
        return Ok(am.try_into_model()?);
    }
    Ok(am.update(db).await?)
}

#[async_trait]
impl CustomerStore for SeaOrmUnitOfWork {
    async fn find_by_id(&self, id: i64) -> Result<Option<customer::Model>, ServiceError> {
        Ok(CustomerEntity::find_by_id(id).one(&self.txn).await?)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        exists(&self.txn, Condition::all().add(customer::Column::Id.eq(id))).await
    }

    async fn exists_by_customer_code(&self, code: &str) -> Result<bool, ServiceError> {
        exists(&self.txn, Condition::all().add(customer::Column::CustomerCode.eq(code))).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        exists(&self.txn, Condition::all().add(customer::Column::Email.eq(email))).await
    }

    async fn find_all(&self, req: &PageRequest) -> Result<Page<customer::Model>, ServiceError> {
        find_page(&self.txn, req).await
    }

    async fn find_by_status(&self, status: CustomerStatus) -> Result<Vec<customer::Model>, ServiceError> {
        let rows = CustomerEntity::find()
            .filter(customer::Column::Status.eq(status))
            .order_by_asc(customer::Column::Id)
            .all(&self.txn)
            .await?;
        Ok(rows)
    }

    async fn search_customers(&self, keyword: &str) -> Result<Vec<customer::Model>, ServiceError> {
        search(&self.txn, keyword).await
    }

    async fn advanced_search(&self, f: &CustomerFilter) -> Result<Vec<customer::Model>, ServiceError> {
        filter(&self.txn, f).await
    }

    async fn save(&self, customer: customer::ActiveModel) -> Result<customer::Model, ServiceError> {
        save(&self.txn, customer).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        CustomerEntity::delete_by_id(id).exec(&self.txn).await?;
        Ok(())
    }
}

#[async_trait]
impl CustomerUnitOfWork for SeaOrmUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
        self.txn.commit().await?;
        Ok(())
    }
}
