use chrono::Duration;
use configs::MAX_LOAN_DAYS;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{book, errors::ModelError, timestamps};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "ACTIVE",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(ReservationStatus::Active),
            "CANCELLED" => Some(ReservationStatus::Cancelled),
            "EXPIRED" => Some(ReservationStatus::Expired),
            _ => None,
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::Validation(format!("Invalid value '{}' for parameter 'status'", s)))
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub book_id: i64,
    pub user_name: String,
    pub status: ReservationStatus,
    pub reserved_at: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Still marked ACTIVE but past its loan period.
    pub fn is_overdue(&self, now: DateTimeWithTimeZone) -> bool {
        self.status == ReservationStatus::Active && self.expires_at < now
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Book }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Book => Entity::belongs_to(book::Entity).from(Column::BookId).to(book::Column::Id).into() }
    }
}

impl Related<book::Entity> for Entity {
    fn to() -> RelationDef { Relation::Book.def() }
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

/// New ACTIVE reservation starting at `now`, expiring `loan_days` later.
/// The loan period is held to `1..=MAX_LOAN_DAYS`.
pub fn new_active(book_id: i64, user_name: &str, now: DateTimeWithTimeZone, loan_days: i64) -> ActiveModel {
    let loan_days = loan_days.clamp(1, MAX_LOAN_DAYS);
    ActiveModel {
        book_id: Set(book_id),
        user_name: Set(user_name.to_string()),
        status: Set(ReservationStatus::Active),
        reserved_at: Set(now),
        expires_at: Set(now + Duration::days(loan_days)),
        cancelled_at: Set(None),
        version: Set(0),
        ..Default::default()
    }
}

/// The ACTIVE reservation of a book, if any.
pub async fn find_active_for_book<C: ConnectionTrait>(db: &C, book_id: i64) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::BookId.eq(book_id))
        .filter(Column::Status.eq(ReservationStatus::Active))
        .one(db)
        .await
}

pub async fn exists_for_book<C: ConnectionTrait>(db: &C, book_id: i64) -> Result<bool, DbErr> {
    Ok(Entity::find().filter(Column::BookId.eq(book_id)).count(db).await? > 0)
}

/// Moves every overdue ACTIVE reservation to EXPIRED; returns rows touched.
pub async fn expire_overdue<C: ConnectionTrait>(db: &C, now: DateTimeWithTimeZone) -> Result<u64, DbErr> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(ReservationStatus::Expired.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Status.eq(ReservationStatus::Active))
        .filter(Column::ExpiresAt.lt(now))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
