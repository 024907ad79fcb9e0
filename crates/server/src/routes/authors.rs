use axum::{extract::State, http::StatusCode, Json};
use service::author::domain::{AuthorResponse, CreateAuthorRequest, UpdateAuthorRequest};
use service::pagination::{AuthorPage, Page, PageParams};

use crate::errors::{ErrorResponse, JsonApiError};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/v1/authors", tag = "Authors",
    params(PageParams),
    responses(
        (status = 200, description = "Page of authors", body = AuthorPage),
        (status = 400, description = "Invalid paging or sort", body = ErrorResponse)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<AuthorResponse>>, JsonApiError> {
    Ok(Json(state.authors.list(&params).await?))
}

#[utoipa::path(
    get, path = "/api/v1/authors/{id}", tag = "Authors",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 200, description = "Author with book summaries", body = AuthorResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<Json<AuthorResponse>, JsonApiError> {
    Ok(Json(state.authors.get(id).await?))
}

#[utoipa::path(
    post, path = "/api/v1/authors", tag = "Authors",
    request_body = CreateAuthorRequest,
    responses(
        (status = 201, description = "Created", body = AuthorResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateAuthorRequest>,
) -> Result<(StatusCode, Json<AuthorResponse>), JsonApiError> {
    let created = state.authors.create(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/v1/authors/{id}", tag = "Authors",
    params(("id" = i64, Path, description = "Author id")),
    request_body = UpdateAuthorRequest,
    responses(
        (status = 200, description = "Updated", body = AuthorResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateAuthorRequest>,
) -> Result<Json<AuthorResponse>, JsonApiError> {
    Ok(Json(state.authors.update(id, req).await?))
}

#[utoipa::path(
    delete, path = "/api/v1/authors/{id}", tag = "Authors",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorResponse),
        (status = 409, description = "Sole author of a book", body = ErrorResponse)
    )
)]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode, JsonApiError> {
    state.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
