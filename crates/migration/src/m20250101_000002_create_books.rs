//! Create `books` table.
//!
//! `version` backs optimistic locking; ISBN uniqueness is enforced by
//! `idx_books_isbn` so the constraint name is stable.
use sea_orm_migration::{prelude::*, schema::*};

use crate::constraints;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(big_integer(Books::Id).auto_increment().primary_key())
                    .col(string_len(Books::Title, 255).not_null())
                    .col(string_len(Books::Isbn, 13).not_null())
                    .col(text_null(Books::Description))
                    .col(integer_null(Books::PublishedYear))
                    .col(integer(Books::Version).not_null().default(0))
                    .col(timestamp_with_time_zone(Books::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Books::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(constraints::BOOKS_ISBN)
                    .table(Books::Table)
                    .col(Books::Isbn)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Books::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Books { Table, Id, Title, Isbn, Description, PublishedYear, Version, CreatedAt, UpdatedAt }
