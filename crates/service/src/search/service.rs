use std::sync::Arc;

use sea_orm::{DatabaseBackend, DatabaseConnection, FromQueryResult, Statement};
use tracing::{debug, instrument};

use configs::SearchConfig;
use models::book_author;

use super::domain::{SearchParams, SearchResultResponse};
use crate::book::domain::AuthorSummary;
use crate::errors::{ServiceError, ServiceResult};
use crate::pagination::{Page, Pagination};

/// Books matched by their own text or by any author's full name. Matching
/// books are found first (the book side through the GIN index on
/// `search_vector`), then ranked: the best of the book rank and its authors'
/// ranks is the book's relevance, so a book appears once however many
/// authors it has.
pub(crate) const MATCHES_CTE: &str = r#"
WITH hits AS (
    SELECT b.id AS book_id
    FROM books b
    WHERE b.search_vector @@ plainto_tsquery('english', $1)
    UNION
    SELECT ba.book_id
    FROM book_authors ba
    JOIN authors a ON a.id = ba.author_id
    WHERE to_tsvector('english', a.first_name || ' ' || a.last_name) @@ plainto_tsquery('english', $1)
),
matches AS (
    SELECT h.book_id,
           GREATEST(
               MAX(ts_rank(b.search_vector, plainto_tsquery('english', $1))),
               COALESCE(MAX(ts_rank(to_tsvector('english', a.first_name || ' ' || a.last_name),
                                    plainto_tsquery('english', $1))), 0)
           )::float8 AS relevance
    FROM hits h
    JOIN books b ON b.id = h.book_id
    LEFT JOIN book_authors ba ON ba.book_id = h.book_id
    LEFT JOIN authors a ON a.id = ba.author_id
    GROUP BY h.book_id
)"#;

#[derive(Debug, FromQueryResult)]
struct MatchRow {
    id: i64,
    title: String,
    isbn: String,
    published_year: Option<i32>,
    relevance: f64,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

/// Trim, cap at `max_len` characters, drop control characters other than
/// tab and newline, then trim again.
pub fn sanitize_query(raw: &str, max_len: usize) -> String {
    raw.trim()
        .chars()
        .take(max_len)
        .filter(|c| *c == '\t' || *c == '\n' || !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

#[derive(Clone)]
pub struct SearchService {
    db: Arc<DatabaseConnection>,
    cfg: SearchConfig,
}

impl SearchService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, cfg: SearchConfig) -> Self { Self { db: db.into(), cfg } }

    #[instrument(skip(self, params))]
    pub async fn search(&self, params: &SearchParams) -> ServiceResult<Page<SearchResultResponse>> {
        let raw = params
            .q
            .as_deref()
            .ok_or_else(|| ServiceError::BadRequest("Required parameter 'q' is missing".into()))?;
        let q = sanitize_query(raw, self.cfg.max_query_length);
        if q.is_empty() {
            return Err(ServiceError::BadRequest("Search query must not be blank".into()));
        }
        let p = Pagination::from_raw(params.page, params.size, self.cfg.max_page_size);

        let count_sql = format!("{MATCHES_CTE}\nSELECT COUNT(*) AS total FROM matches");
        let total = CountRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            count_sql,
            [q.clone().into()],
        ))
        .one(self.db.as_ref())
        .await?
        .map(|r| r.total.max(0) as u64)
        .unwrap_or(0);
        debug!(query = %q, total, "search matches counted");
        if total == 0 {
            return Ok(Page::empty(p));
        }

        let page_sql = format!(
            "{MATCHES_CTE}\nSELECT b.id, b.title, b.isbn, b.published_year, m.relevance \
             FROM matches m JOIN books b ON b.id = m.book_id \
             ORDER BY m.relevance DESC, b.id ASC LIMIT $2 OFFSET $3"
        );
        let rows = MatchRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            page_sql,
            [q.into(), (p.size as i64).into(), i64::try_from(p.offset()).unwrap_or(i64::MAX).into()],
        ))
        .all(self.db.as_ref())
        .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut authors = book_author::authors_by_book(self.db.as_ref(), &ids).await?;
        let content = rows
            .into_iter()
            .map(|r| SearchResultResponse {
                authors: authors.remove(&r.id).unwrap_or_default().iter().map(AuthorSummary::from).collect(),
                id: r.id,
                title: r.title,
                isbn: r.isbn,
                published_year: r.published_year,
                relevance_score: r.relevance,
            })
            .collect();
        Ok(Page::new(content, p, total))
    }
}
