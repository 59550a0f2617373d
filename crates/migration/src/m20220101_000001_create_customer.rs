//! Create `customer` table.
//!
//! `customer_code` and `email` carry unique constraints; `status` and `created_at`
//! are filled by column defaults on insert.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(big_integer(Customer::Id).auto_increment().primary_key())
                    .col(string_len(Customer::CustomerCode, 32).unique_key().not_null())
                    .col(string_len(Customer::FullName, 128).not_null())
                    .col(string_len(Customer::Email, 255).unique_key().not_null())
                    .col(string_len_null(Customer::Phone, 32))
                    .col(string_len_null(Customer::Address, 512))
                    .col(string_len(Customer::Status, 16).not_null().default("ACTIVE"))
                    .col(
                        timestamp_with_time_zone(Customer::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
    CustomerCode,
    FullName,
    Email,
    Phone,
    Address,
    Status,
    CreatedAt,
}
