//! Create `advertisement` table with FKs to `category` and `user`.
//!
//! Deleting a referenced category or user is refused while advertisements
//! still point at it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Advertisement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Advertisement::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Advertisement::Title, 255).not_null())
                    .col(text(Advertisement::Description).not_null())
                    .col(big_integer(Advertisement::Price).not_null())
                    .col(string_len(Advertisement::Currency, 8).not_null())
                    .col(big_integer(Advertisement::CategoryId).not_null())
                    .col(big_integer(Advertisement::UserId).not_null())
                    .col(timestamp_with_time_zone(Advertisement::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Advertisement::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_advertisement_category")
                            .from(Advertisement::Table, Advertisement::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_advertisement_user")
                            .from(Advertisement::Table, Advertisement::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Advertisement::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Advertisement {
    Table,
    Id,
    Title,
    Description,
    Price,
    Currency,
    CategoryId,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
