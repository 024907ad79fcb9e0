use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::book::domain::AuthorSummary;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free text matched against titles, descriptions and author names
    pub q: Option<String>,
    /// Zero-based page index (default 0)
    pub page: Option<i64>,
    /// Page size, capped at 100 (default 20)
    pub size: Option<i64>,
    /// Accepted for compatibility; results are always ordered by relevance
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultResponse {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub published_year: Option<i32>,
    pub authors: Vec<AuthorSummary>,
    pub relevance_score: f64,
}
