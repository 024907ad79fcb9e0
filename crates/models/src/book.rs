use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{author, book_author, reservation, timestamps};

/// The generated `search_vector` column is maintained by the database and
/// is deliberately not mapped here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(unique)]
    pub isbn: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    BookAuthor,
    Reservation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::BookAuthor => Entity::has_many(book_author::Entity).into(),
            Relation::Reservation => Entity::has_many(reservation::Entity).into(),
        }
    }
}

impl Related<book_author::Entity> for Entity {
    fn to() -> RelationDef { Relation::BookAuthor.def() }
}

impl Related<reservation::Entity> for Entity {
    fn to() -> RelationDef { Relation::Reservation.def() }
}

impl Related<author::Entity> for Entity {
    fn to() -> RelationDef { book_author::Relation::Author.def() }
    fn via() -> Option<RelationDef> { Some(book_author::Relation::Book.def().rev()) }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        timestamps::touch(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}

pub async fn find_by_isbn<C: ConnectionTrait>(db: &C, isbn: &str) -> Result<Option<Model>, DbErr> {
    Entity::find().filter(Column::Isbn.eq(isbn)).one(db).await
}
