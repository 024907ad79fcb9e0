use sea_orm_migration::prelude::*;

use crate::constraints;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // BookAuthors: reverse lookup author -> books
        manager
            .create_index(
                Index::create()
                    .name("idx_book_authors_author")
                    .table(BookAuthors::Table)
                    .col(BookAuthors::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_book")
                    .table(Reservations::Table)
                    .col(Reservations::BookId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user_name")
                    .table(Reservations::Table)
                    .col(Reservations::UserName)
                    .to_owned(),
            )
            .await?;
        // Expiry sweep scans ACTIVE rows by expires_at
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_status_expires")
                    .table(Reservations::Table)
                    .col(Reservations::Status)
                    .col(Reservations::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        // At most one ACTIVE reservation per book. Partial index, raw SQL.
        let sql = format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON reservations (book_id) WHERE status = 'ACTIVE'",
            constraints::RESERVATIONS_ACTIVE_BOOK
        );
        manager.get_connection().execute_unprepared(&sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS {}", constraints::RESERVATIONS_ACTIVE_BOOK))
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reservations_status_expires").table(Reservations::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reservations_user_name").table(Reservations::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reservations_book").table(Reservations::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_book_authors_author").table(BookAuthors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BookAuthors { Table, AuthorId }

#[derive(DeriveIden)]
enum Reservations { Table, BookId, UserName, Status, ExpiresAt }
