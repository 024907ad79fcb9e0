use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Order, Set, TransactionTrait};
use tracing::{info, instrument};
use validator::Validate;

use models::{author, book_author};

use super::domain::{AuthorResponse, CreateAuthorRequest, UpdateAuthorRequest};
use crate::errors::{ServiceError, ServiceResult};
use crate::pagination::{self, Page, PageParams};

const SORTABLE: &[(&str, author::Column)] = &[
    ("id", author::Column::Id),
    ("firstName", author::Column::FirstName),
    ("lastName", author::Column::LastName),
    ("createdAt", author::Column::CreatedAt),
    ("updatedAt", author::Column::UpdatedAt),
];

/// Author use cases over a pooled connection.
#[derive(Clone)]
pub struct AuthorService {
    db: Arc<DatabaseConnection>,
}

impl AuthorService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self { Self { db: db.into() } }

    pub async fn list(&self, params: &PageParams) -> ServiceResult<Page<AuthorResponse>> {
        let p = params.pagination();
        let sort: Option<(author::Column, Order)> = pagination::parse_sort(params.sort.as_deref(), SORTABLE)?;
        let select = pagination::apply_sort(author::Entity::find(), sort, author::Column::Id);
        let (rows, total) = pagination::fetch_page(self.db.as_ref(), select, p).await?;

        let ids: Vec<i64> = rows.iter().map(|a| a.id).collect();
        let mut books = book_author::books_by_author(self.db.as_ref(), &ids).await?;
        let content = rows
            .into_iter()
            .map(|a| {
                let owned = books.remove(&a.id).unwrap_or_default();
                AuthorResponse::from_model(a, &owned)
            })
            .collect();
        Ok(Page::new(content, p, total))
    }

    pub async fn get(&self, id: i64) -> ServiceResult<AuthorResponse> {
        let found = author::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Author", id))?;
        self.respond(found).await
    }

    #[instrument(skip(self, req))]
    pub async fn create(&self, req: CreateAuthorRequest) -> ServiceResult<AuthorResponse> {
        req.validate()?;
        let am = author::ActiveModel {
            first_name: Set(req.first_name.unwrap_or_default()),
            last_name: Set(req.last_name.unwrap_or_default()),
            bio: Set(req.bio),
            ..Default::default()
        };
        let created = am.insert(self.db.as_ref()).await?;
        info!(author_id = created.id, "author created");
        Ok(AuthorResponse::from_model(created, &[]))
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: UpdateAuthorRequest) -> ServiceResult<AuthorResponse> {
        req.validate()?;
        let found = author::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Author", id))?;
        let mut am: author::ActiveModel = found.into();
        if let Some(v) = req.first_name { am.first_name = Set(v); }
        if let Some(v) = req.last_name { am.last_name = Set(v); }
        if let Some(v) = req.bio { am.bio = Set(Some(v)); }
        let updated = am.update(self.db.as_ref()).await?;
        info!(author_id = id, "author updated");
        self.respond(updated).await
    }

    /// Refuses while the author is the only author of any book.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let txn = self.db.begin().await?;
        author::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Author", id))?;

        let books = book_author::books_by_author(&txn, &[id]).await?.remove(&id).unwrap_or_default();
        for b in &books {
            if book_author::count_authors(&txn, b.id).await? == 1 {
                return Err(ServiceError::Conflict(format!("Cannot delete author: sole author of book '{}'", b.title)));
            }
        }

        author::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        info!(author_id = id, "author deleted");
        Ok(())
    }

    async fn respond(&self, a: author::Model) -> ServiceResult<AuthorResponse> {
        let books = book_author::books_by_author(self.db.as_ref(), &[a.id]).await?.remove(&a.id).unwrap_or_default();
        Ok(AuthorResponse::from_model(a, &books))
    }
}
