//! Join rows between books and authors. Owned by the book side: the author
//! list of a book is replaced wholesale, never edited through an author.
use std::collections::HashMap;

use sea_orm::{entity::prelude::*, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{author, book};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book_authors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub book_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub author_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Book, Author }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Book => Entity::belongs_to(book::Entity).from(Column::BookId).to(book::Column::Id).into(),
            Relation::Author => Entity::belongs_to(author::Entity).from(Column::AuthorId).to(author::Column::Id).into(),
        }
    }
}

impl Related<book::Entity> for Entity {
    fn to() -> RelationDef { Relation::Book.def() }
}

impl Related<author::Entity> for Entity {
    fn to() -> RelationDef { Relation::Author.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Replace the author set of `book_id`.
pub async fn replace_for_book<C: ConnectionTrait>(db: &C, book_id: i64, author_ids: &[i64]) -> Result<(), DbErr> {
    Entity::delete_many().filter(Column::BookId.eq(book_id)).exec(db).await?;
    if author_ids.is_empty() {
        return Ok(());
    }
    let rows = author_ids.iter().map(|&author_id| ActiveModel { book_id: Set(book_id), author_id: Set(author_id) });
    Entity::insert_many(rows).exec_without_returning(db).await?;
    Ok(())
}

/// Authors of each book in `book_ids`, ordered by author id. Books without
/// authors are absent from the map.
pub async fn authors_by_book<C: ConnectionTrait>(db: &C, book_ids: &[i64]) -> Result<HashMap<i64, Vec<author::Model>>, DbErr> {
    let mut out: HashMap<i64, Vec<author::Model>> = HashMap::new();
    if book_ids.is_empty() {
        return Ok(out);
    }
    let rows = Entity::find()
        .filter(Column::BookId.is_in(book_ids.iter().copied()))
        .order_by_asc(Column::AuthorId)
        .find_also_related(author::Entity)
        .all(db)
        .await?;
    for (link, author) in rows {
        if let Some(a) = author {
            out.entry(link.book_id).or_default().push(a);
        }
    }
    Ok(out)
}

/// Books of each author in `author_ids`, ordered by book id.
pub async fn books_by_author<C: ConnectionTrait>(db: &C, author_ids: &[i64]) -> Result<HashMap<i64, Vec<book::Model>>, DbErr> {
    let mut out: HashMap<i64, Vec<book::Model>> = HashMap::new();
    if author_ids.is_empty() {
        return Ok(out);
    }
    let rows = Entity::find()
        .filter(Column::AuthorId.is_in(author_ids.iter().copied()))
        .order_by_asc(Column::BookId)
        .find_also_related(book::Entity)
        .all(db)
        .await?;
    for (link, book) in rows {
        if let Some(b) = book {
            out.entry(link.author_id).or_default().push(b);
        }
    }
    Ok(out)
}

/// Number of authors attached to `book_id`.
pub async fn count_authors<C: ConnectionTrait>(db: &C, book_id: i64) -> Result<u64, DbErr> {
    Entity::find().filter(Column::BookId.eq(book_id)).count(db).await
}
