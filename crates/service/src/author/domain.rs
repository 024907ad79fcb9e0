use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use models::validation::not_blank;
use models::{author, book};

/// Author creation input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorRequest {
    #[validate(
        required(message = "First name must not be blank"),
        custom(function = "not_blank", message = "First name must not be blank"),
        length(max = 100, message = "First name must not exceed 100 characters")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "Last name must not be blank"),
        custom(function = "not_blank", message = "Last name must not be blank"),
        length(max = 100, message = "Last name must not exceed 100 characters")
    )]
    pub last_name: Option<String>,
    #[validate(length(max = 5000, message = "Bio must not exceed 5000 characters"))]
    pub bio: Option<String>,
}

/// Partial author update; absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorRequest {
    #[validate(
        custom(function = "not_blank", message = "First name must not be blank"),
        length(max = 100, message = "First name must not exceed 100 characters")
    )]
    pub first_name: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "Last name must not be blank"),
        length(max = 100, message = "Last name must not exceed 100 characters")
    )]
    pub last_name: Option<String>,
    #[validate(length(max = 5000, message = "Bio must not exceed 5000 characters"))]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
}

impl From<&book::Model> for BookSummary {
    fn from(b: &book::Model) -> Self { Self { id: b.id, title: b.title.clone() } }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub books: Vec<BookSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthorResponse {
    pub fn from_model(a: author::Model, books: &[book::Model]) -> Self {
        Self {
            id: a.id,
            first_name: a.first_name,
            last_name: a.last_name,
            bio: a.bio,
            books: books.iter().map(BookSummary::from).collect(),
            created_at: a.created_at.with_timezone(&Utc),
            updated_at: a.updated_at.with_timezone(&Utc),
        }
    }
}
