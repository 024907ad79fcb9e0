//! Migrator registering catalog migrations in dependency order.
//! Search vector and indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_authors;
mod m20250101_000002_create_books;
mod m20250101_000003_create_book_authors;
mod m20250101_000004_create_reservations;
mod m20250101_000005_add_book_search_vector;
mod m20250101_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_authors::Migration),
            Box::new(m20250101_000002_create_books::Migration),
            Box::new(m20250101_000003_create_book_authors::Migration),
            Box::new(m20250101_000004_create_reservations::Migration),
            Box::new(m20250101_000005_add_book_search_vector::Migration),
            Box::new(m20250101_000006_add_indexes::Migration),
        ]
    }
}

/// Names of constraints the service layer maps to specific conflicts.
pub mod constraints {
    pub const BOOKS_ISBN: &str = "idx_books_isbn";
    pub const RESERVATIONS_ACTIVE_BOOK: &str = "idx_reservations_active_book";
}
