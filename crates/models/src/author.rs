use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{book, book_author, timestamps};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { BookAuthor }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::BookAuthor => Entity::has_many(book_author::Entity).into() }
    }
}

impl Related<book_author::Entity> for Entity {
    fn to() -> RelationDef { Relation::BookAuthor.def() }
}

impl Related<book::Entity> for Entity {
    fn to() -> RelationDef { book_author::Relation::Book.def() }
    fn via() -> Option<RelationDef> { Some(book_author::Relation::Author.def().rev()) }
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
