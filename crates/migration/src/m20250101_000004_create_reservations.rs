//! Create `reservations` table with FK to `books`.
//!
//! Books with reservation history cannot be deleted, hence `Restrict`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(big_integer(Reservations::Id).auto_increment().primary_key())
                    .col(big_integer(Reservations::BookId).not_null())
                    .col(string_len(Reservations::UserName, 100).not_null())
                    .col(string_len(Reservations::Status, 20).not_null())
                    .col(timestamp_with_time_zone(Reservations::ReservedAt).not_null())
                    .col(timestamp_with_time_zone(Reservations::ExpiresAt).not_null())
                    .col(timestamp_with_time_zone_null(Reservations::CancelledAt))
                    .col(integer(Reservations::Version).not_null().default(0))
                    .col(timestamp_with_time_zone(Reservations::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Reservations::UpdatedAt).not_null())
                    .check(Expr::col(Reservations::Status).is_in(["ACTIVE", "CANCELLED", "EXPIRED"]))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_book")
                            .from(Reservations::Table, Reservations::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reservations::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reservations {
    Table,
    Id,
    BookId,
    UserName,
    Status,
    ReservedAt,
    ExpiresAt,
    CancelledAt,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Books { Table, Id }
