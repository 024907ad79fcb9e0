use axum::{extract::State, http::StatusCode, Json};
use service::book::domain::{BookResponse, CreateBookRequest, UpdateBookRequest};
use service::pagination::{BookPage, Page, PageParams};

use crate::errors::{ErrorResponse, JsonApiError};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/v1/books", tag = "Books",
    params(PageParams),
    responses(
        (status = 200, description = "Page of books", body = BookPage),
        (status = 400, description = "Invalid paging or sort", body = ErrorResponse)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<BookResponse>>, JsonApiError> {
    Ok(Json(state.books.list(&params).await?))
}

#[utoipa::path(
    get, path = "/api/v1/books/{id}", tag = "Books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book with authors", body = BookResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<Json<BookResponse>, JsonApiError> {
    Ok(Json(state.books.get(id).await?))
}

#[utoipa::path(
    post, path = "/api/v1/books", tag = "Books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Created", body = BookResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Unknown author id", body = ErrorResponse),
        (status = 409, description = "Duplicate ISBN", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), JsonApiError> {
    let created = state.books.create(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/v1/books/{id}", tag = "Books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Updated", body = BookResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Book or author not found", body = ErrorResponse),
        (status = 409, description = "Duplicate ISBN or concurrent modification", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateBookRequest>,
) -> Result<Json<BookResponse>, JsonApiError> {
    Ok(Json(state.books.update(id, req).await?))
}

#[utoipa::path(
    delete, path = "/api/v1/books/{id}", tag = "Books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorResponse),
        (status = 409, description = "Book has reservation history", body = ErrorResponse)
    )
)]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode, JsonApiError> {
    state.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
