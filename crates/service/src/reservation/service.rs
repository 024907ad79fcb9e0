use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use configs::ReservationConfig;
use migration::constraints;
use models::reservation::{self, ReservationStatus};
use models::{book, timestamps};

use super::domain::{CreateReservationRequest, ReservationFilter, ReservationResponse};
use crate::errors::{violates, ServiceError, ServiceResult};
use crate::pagination::{self, Page, PageParams};

const SORTABLE: &[(&str, reservation::Column)] = &[
    ("id", reservation::Column::Id),
    ("bookId", reservation::Column::BookId),
    ("userName", reservation::Column::UserName),
    ("status", reservation::Column::Status),
    ("reservedAt", reservation::Column::ReservedAt),
    ("expiresAt", reservation::Column::ExpiresAt),
    ("createdAt", reservation::Column::CreatedAt),
];

/// Loan period and row-lock wait applied to new reservations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationPolicy {
    pub loan_days: i64,
    pub lock_timeout_ms: u64,
}

impl Default for ReservationPolicy {
    fn default() -> Self { Self { loan_days: 14, lock_timeout_ms: 5000 } }
}

impl From<&ReservationConfig> for ReservationPolicy {
    fn from(cfg: &ReservationConfig) -> Self {
        Self { loan_days: cfg.loan_days, lock_timeout_ms: cfg.lock_timeout_ms }
    }
}

#[derive(Clone)]
pub struct ReservationService {
    db: Arc<DatabaseConnection>,
    policy: ReservationPolicy,
}

impl ReservationService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, policy: ReservationPolicy) -> Self { Self { db: db.into(), policy } }

    /// Reserve a book for `loan_days`.
    ///
    /// The book row is locked for the rest of the transaction so concurrent
    /// requests for the same book queue up behind each other; a request that
    /// waits longer than `lock_timeout_ms` fails with a conflict. An ACTIVE
    /// reservation past its expiry is retired on the spot. The partial unique
    /// index on active reservations backs this up if the lock is bypassed.
    #[instrument(skip(self, req), fields(book_id = ?req.book_id))]
    pub async fn create(&self, req: CreateReservationRequest) -> ServiceResult<ReservationResponse> {
        req.validate()?;
        let book_id = req.book_id.unwrap_or_default();
        let user_name = req.user_name.unwrap_or_default();

        let txn = self.db.begin().await?;
        txn.execute_unprepared(&format!("SET LOCAL lock_timeout = '{}ms'", self.policy.lock_timeout_ms))
            .await?;
        let locked = book::Entity::find_by_id(book_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Book", book_id))?;

        let now = timestamps::now();
        if let Some(active) = reservation::find_active_for_book(&txn, book_id).await? {
            if !active.is_overdue(now) {
                return Err(ServiceError::BookAlreadyReserved(book_id));
            }
            expire(&txn, &active).await?;
            info!(reservation_id = active.id, book_id, "expired overdue reservation");
        }

        let created = reservation::new_active(book_id, &user_name, now, self.policy.loan_days)
            .insert(&txn)
            .await
            .map_err(|e| {
                if violates(&e, constraints::RESERVATIONS_ACTIVE_BOOK) {
                    ServiceError::BookAlreadyReserved(book_id)
                } else {
                    e.into()
                }
            })?;
        txn.commit().await?;
        info!(reservation_id = created.id, book_id, user = %created.user_name, "reservation created");
        Ok(ReservationResponse::from_model(created, locked.title))
    }

    /// ACTIVE -> CANCELLED; the row is kept as history.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: i64) -> ServiceResult<ReservationResponse> {
        let existing = reservation::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Reservation", id))?;
        if existing.status != ReservationStatus::Active {
            return Err(ServiceError::InvalidReservationState { id, status: existing.status });
        }

        let now = timestamps::now();
        let am = reservation::ActiveModel {
            status: Set(ReservationStatus::Cancelled),
            cancelled_at: Set(Some(now)),
            version: Set(existing.version + 1),
            updated_at: Set(now),
            ..Default::default()
        };
        let res = reservation::Entity::update_many()
            .set(am)
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Version.eq(existing.version))
            .exec(self.db.as_ref())
            .await?;
        if res.rows_affected == 0 {
            warn!(reservation_id = id, "reservation changed during cancel");
            return Err(ServiceError::StaleVersion);
        }
        info!(reservation_id = id, book_id = existing.book_id, "reservation cancelled");
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> ServiceResult<ReservationResponse> {
        let (r, b) = reservation::Entity::find_by_id(id)
            .find_also_related(book::Entity)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Reservation", id))?;
        Ok(ReservationResponse::from_model(r, b.map(|b| b.title).unwrap_or_default()))
    }

    pub async fn list(&self, filter: &ReservationFilter, params: &PageParams) -> ServiceResult<Page<ReservationResponse>> {
        let p = params.pagination();
        let sort: Option<(reservation::Column, Order)> = pagination::parse_sort(params.sort.as_deref(), SORTABLE)?;
        let mut select = reservation::Entity::find();
        if let Some(book_id) = filter.book_id {
            select = select.filter(reservation::Column::BookId.eq(book_id));
        }
        if let Some(user) = filter.user_name.as_deref() {
            select = select.filter(reservation::Column::UserName.eq(user));
        }
        if let Some(status) = filter.status()? {
            select = select.filter(reservation::Column::Status.eq(status));
        }
        let select = pagination::apply_sort(select, sort, reservation::Column::Id);
        let (rows, total) = pagination::fetch_page(self.db.as_ref(), select, p).await?;

        let titles = book_titles(self.db.as_ref(), rows.iter().map(|r| r.book_id)).await?;
        let content = rows
            .into_iter()
            .map(|r| {
                let title = titles.get(&r.book_id).cloned().unwrap_or_default();
                ReservationResponse::from_model(r, title)
            })
            .collect();
        Ok(Page::new(content, p, total))
    }

    /// Expire every overdue ACTIVE reservation.
    pub async fn expire_overdue(&self) -> ServiceResult<u64> {
        let n = reservation::expire_overdue(self.db.as_ref(), timestamps::now()).await?;
        if n > 0 {
            info!(expired = n, "expired overdue reservations");
        } else {
            debug!("no overdue reservations");
        }
        Ok(n)
    }
}

async fn expire<C: ConnectionTrait>(db: &C, r: &reservation::Model) -> ServiceResult<()> {
    let am = reservation::ActiveModel {
        status: Set(ReservationStatus::Expired),
        version: Set(r.version + 1),
        updated_at: Set(timestamps::now()),
        ..Default::default()
    };
    reservation::Entity::update_many()
        .set(am)
        .filter(reservation::Column::Id.eq(r.id))
        .filter(reservation::Column::Status.eq(ReservationStatus::Active))
        .exec(db)
        .await?;
    Ok(())
}

async fn book_titles<C: ConnectionTrait>(db: &C, ids: impl Iterator<Item = i64>) -> ServiceResult<HashMap<i64, String>> {
    let mut ids: Vec<i64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let books = book::Entity::find().filter(book::Column::Id.is_in(ids)).all(db).await?;
    Ok(books.into_iter().map(|b| (b.id, b.title)).collect())
}
