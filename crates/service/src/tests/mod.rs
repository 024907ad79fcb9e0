//! Service tests against a real PostgreSQL (see `test_support`).
mod reservation_flow;

use crate::author::domain::CreateAuthorRequest;
use crate::book::domain::CreateBookRequest;
use crate::test_support::unique_isbn;
use crate::{AuthorService, BookService};

pub(crate) async fn seed_author(svc: &AuthorService, first: &str, last: &str) -> anyhow::Result<i64> {
    let a = svc
        .create(CreateAuthorRequest { first_name: Some(first.into()), last_name: Some(last.into()), bio: None })
        .await?;
    Ok(a.id)
}

pub(crate) async fn seed_book(svc: &BookService, title: &str, author_ids: Vec<i64>) -> anyhow::Result<i64> {
    let b = svc
        .create(CreateBookRequest {
            title: Some(title.into()),
            isbn: Some(unique_isbn()),
            description: None,
            published_year: Some(2001),
            author_ids: Some(author_ids),
        })
        .await?;
    Ok(b.id)
}
