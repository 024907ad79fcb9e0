use axum::{extract::State, Json};
use service::pagination::{Page, SearchResultPage};
use service::search::domain::{SearchParams, SearchResultResponse};

use crate::errors::{ErrorResponse, JsonApiError};
use crate::extract::ApiQuery;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/v1/search", tag = "Search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching books by relevance", body = SearchResultPage),
        (status = 400, description = "Missing or blank query", body = ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Page<SearchResultResponse>>, JsonApiError> {
    Ok(Json(state.search.search(&params).await?))
}
