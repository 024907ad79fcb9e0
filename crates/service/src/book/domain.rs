use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use models::validation::{isbn13, not_blank};
use models::{author, book};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[validate(
        required(message = "Title must not be blank"),
        custom(function = "not_blank", message = "Title must not be blank"),
        length(max = 255, message = "Title must not exceed 255 characters")
    )]
    pub title: Option<String>,
    /// 13 digits, no hyphens
    #[validate(
        required(message = "ISBN must not be blank"),
        custom(function = "isbn13", message = "ISBN must be exactly 13 digits")
    )]
    #[schema(example = "9780134685991")]
    pub isbn: Option<String>,
    #[validate(length(max = 10000, message = "Description must not exceed 10000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1000, max = 2100, message = "Published year must be between 1000 and 2100"))]
    pub published_year: Option<i32>,
    #[validate(
        required(message = "Author ID list must not be null"),
        length(min = 1, message = "At least one author ID is required")
    )]
    pub author_ids: Option<Vec<i64>>,
}

/// Partial book update. A supplied `authorIds` replaces the author set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[validate(
        custom(function = "not_blank", message = "Title must not be blank"),
        length(max = 255, message = "Title must not exceed 255 characters")
    )]
    pub title: Option<String>,
    #[validate(custom(function = "isbn13", message = "ISBN must be exactly 13 digits"))]
    pub isbn: Option<String>,
    #[validate(length(max = 10000, message = "Description must not exceed 10000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1000, max = 2100, message = "Published year must be between 1000 and 2100"))]
    pub published_year: Option<i32>,
    #[validate(length(min = 1, message = "Author list must contain at least one author ID if provided"))]
    pub author_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<&author::Model> for AuthorSummary {
    fn from(a: &author::Model) -> Self {
        Self { id: a.id, first_name: a.first_name.clone(), last_name: a.last_name.clone() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub authors: Vec<AuthorSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookResponse {
    pub fn from_model(b: book::Model, authors: &[author::Model]) -> Self {
        Self {
            id: b.id,
            title: b.title,
            isbn: b.isbn,
            description: b.description,
            published_year: b.published_year,
            authors: authors.iter().map(AuthorSummary::from).collect(),
            created_at: b.created_at.with_timezone(&Utc),
            updated_at: b.updated_at.with_timezone(&Utc),
        }
    }
}

/// Drops repeated ids, keeping first occurrences in order.
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut out: Vec<i64> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
