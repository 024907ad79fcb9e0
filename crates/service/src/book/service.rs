use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use migration::constraints;
use models::{author, book, book_author, reservation, timestamps};

use super::domain::{dedup_ids, BookResponse, CreateBookRequest, UpdateBookRequest};
use crate::errors::{violates, ServiceError, ServiceResult};
use crate::pagination::{self, Page, PageParams};

const SORTABLE: &[(&str, book::Column)] = &[
    ("id", book::Column::Id),
    ("title", book::Column::Title),
    ("isbn", book::Column::Isbn),
    ("publishedYear", book::Column::PublishedYear),
    ("createdAt", book::Column::CreatedAt),
    ("updatedAt", book::Column::UpdatedAt),
];

/// Book use cases; author links are owned by the book.
#[derive(Clone)]
pub struct BookService {
    db: Arc<DatabaseConnection>,
}

impl BookService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self { Self { db: db.into() } }

    pub async fn list(&self, params: &PageParams) -> ServiceResult<Page<BookResponse>> {
        let p = params.pagination();
        let sort: Option<(book::Column, Order)> = pagination::parse_sort(params.sort.as_deref(), SORTABLE)?;
        let select = pagination::apply_sort(book::Entity::find(), sort, book::Column::Id);
        let (rows, total) = pagination::fetch_page(self.db.as_ref(), select, p).await?;

        let ids: Vec<i64> = rows.iter().map(|b| b.id).collect();
        let mut authors = book_author::authors_by_book(self.db.as_ref(), &ids).await?;
        let content = rows
            .into_iter()
            .map(|b| {
                let owned = authors.remove(&b.id).unwrap_or_default();
                BookResponse::from_model(b, &owned)
            })
            .collect();
        Ok(Page::new(content, p, total))
    }

    pub async fn get(&self, id: i64) -> ServiceResult<BookResponse> {
        let found = book::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Book", id))?;
        respond(self.db.as_ref(), found).await
    }

    #[instrument(skip(self, req))]
    pub async fn create(&self, req: CreateBookRequest) -> ServiceResult<BookResponse> {
        req.validate()?;
        let isbn = req.isbn.unwrap_or_default();
        let author_ids = dedup_ids(&req.author_ids.unwrap_or_default());

        let txn = self.db.begin().await?;
        if book::find_by_isbn(&txn, &isbn).await?.is_some() {
            return Err(ServiceError::DuplicateIsbn(isbn));
        }
        resolve_authors(&txn, &author_ids).await?;

        let am = book::ActiveModel {
            title: Set(req.title.unwrap_or_default()),
            isbn: Set(isbn.clone()),
            description: Set(req.description),
            published_year: Set(req.published_year),
            version: Set(0),
            ..Default::default()
        };
        let created = am.insert(&txn).await.map_err(|e| isbn_conflict(e, &isbn))?;
        book_author::replace_for_book(&txn, created.id, &author_ids).await?;
        let resp = respond(&txn, created).await?;
        txn.commit().await?;
        info!(book_id = resp.id, isbn = %resp.isbn, authors = resp.authors.len(), "book created");
        Ok(resp)
    }

    /// Version-checked partial update.
    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: UpdateBookRequest) -> ServiceResult<BookResponse> {
        req.validate()?;
        let txn = self.db.begin().await?;
        let existing = book::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Book", id))?;

        if let Some(isbn) = req.isbn.as_deref().filter(|i| *i != existing.isbn) {
            if book::find_by_isbn(&txn, isbn).await?.is_some_and(|other| other.id != id) {
                return Err(ServiceError::DuplicateIsbn(isbn.to_string()));
            }
        }
        let author_ids = req.author_ids.as_deref().map(dedup_ids);
        if let Some(ids) = &author_ids {
            resolve_authors(&txn, ids).await?;
        }

        let mut am = book::ActiveModel {
            version: Set(existing.version + 1),
            updated_at: Set(timestamps::now()),
            ..Default::default()
        };
        if let Some(v) = req.title { am.title = Set(v); }
        if let Some(v) = req.isbn.clone() { am.isbn = Set(v); }
        if let Some(v) = req.description { am.description = Set(Some(v)); }
        if let Some(v) = req.published_year { am.published_year = Set(Some(v)); }

        let res = book::Entity::update_many()
            .set(am)
            .filter(book::Column::Id.eq(id))
            .filter(book::Column::Version.eq(existing.version))
            .exec(&txn)
            .await
            .map_err(|e| isbn_conflict(e, req.isbn.as_deref().unwrap_or(&existing.isbn)))?;
        if res.rows_affected == 0 {
            warn!(book_id = id, version = existing.version, "stale book version");
            return Err(ServiceError::StaleVersion);
        }
        if let Some(ids) = &author_ids {
            book_author::replace_for_book(&txn, id, ids).await?;
        }

        let updated = book::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Book", id))?;
        let resp = respond(&txn, updated).await?;
        txn.commit().await?;
        info!(book_id = id, "book updated");
        Ok(resp)
    }

    /// Refuses once any reservation, past or present, references the book.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let txn = self.db.begin().await?;
        book::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Book", id))?;
        if reservation::exists_for_book(&txn, id).await? {
            return Err(ServiceError::Conflict("Cannot delete a book with reservation history".into()));
        }
        book::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        info!(book_id = id, "book deleted");
        Ok(())
    }
}

async fn respond<C: ConnectionTrait>(db: &C, b: book::Model) -> ServiceResult<BookResponse> {
    let authors = book_author::authors_by_book(db, &[b.id]).await?.remove(&b.id).unwrap_or_default();
    Ok(BookResponse::from_model(b, &authors))
}

/// Every id must name an existing author; reports the first missing one.
async fn resolve_authors<C: ConnectionTrait>(db: &C, ids: &[i64]) -> ServiceResult<Vec<author::Model>> {
    let found = author::Entity::find().filter(author::Column::Id.is_in(ids.iter().copied())).all(db).await?;
    if let Some(missing) = ids.iter().find(|id| !found.iter().any(|a| a.id == **id)) {
        return Err(ServiceError::not_found("Author", *missing));
    }
    Ok(found)
}

fn isbn_conflict(err: sea_orm::DbErr, isbn: &str) -> ServiceError {
    if violates(&err, constraints::BOOKS_ISBN) {
        ServiceError::DuplicateIsbn(isbn.to_string())
    } else {
        err.into()
    }
}
