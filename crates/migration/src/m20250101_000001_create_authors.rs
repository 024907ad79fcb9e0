//! Create `authors` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Authors::Table)
                    .if_not_exists()
                    .col(big_integer(Authors::Id).auto_increment().primary_key())
                    .col(string_len(Authors::FirstName, 100).not_null())
                    .col(string_len(Authors::LastName, 100).not_null())
                    .col(text_null(Authors::Bio))
                    .col(timestamp_with_time_zone(Authors::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Authors::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Authors::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Authors { Table, Id, FirstName, LastName, Bio, CreatedAt, UpdatedAt }
