use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Advertisement: lookups by referenced category and owner
        manager
            .create_index(
                Index::create()
                    .name("idx_advertisement_category")
                    .table(Advertisement::Table)
                    .col(Advertisement::CategoryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_advertisement_user")
                    .table(Advertisement::Table)
                    .col(Advertisement::UserId)
                    .to_owned(),
            )
            .await?;

        // Title search
        manager
            .create_index(
                Index::create()
                    .name("idx_advertisement_title")
                    .table(Advertisement::Table)
                    .col(Advertisement::Title)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_advertisement_title", "idx_advertisement_user", "idx_advertisement_category"] {
            manager
                .drop_index(Index::drop().name(name).table(Advertisement::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Advertisement { Table, CategoryId, UserId, Title }
