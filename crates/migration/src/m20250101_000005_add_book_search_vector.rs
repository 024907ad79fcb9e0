//! Add the generated `books.search_vector` column and its GIN index.
//!
//! Title is weighted A, description B. Generated columns are not expressible
//! through the schema builder, so this one is raw SQL.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const UP: [&str; 2] = [
    r#"ALTER TABLE books
        ADD COLUMN IF NOT EXISTS search_vector tsvector
        GENERATED ALWAYS AS (
            setweight(to_tsvector('english', coalesce(title, '')), 'A') ||
            setweight(to_tsvector('english', coalesce(description, '')), 'B')
        ) STORED"#,
    "CREATE INDEX IF NOT EXISTS idx_books_search_vector ON books USING GIN (search_vector)",
];

const DOWN: [&str; 2] = [
    "DROP INDEX IF EXISTS idx_books_search_vector",
    "ALTER TABLE books DROP COLUMN IF EXISTS search_vector",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for sql in UP {
            db.execute_unprepared(sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for sql in DOWN {
            db.execute_unprepared(sql).await?;
        }
        Ok(())
    }
}
