use axum::{extract::State, http::StatusCode, Json};
use service::errors::ServiceError;
use service::pagination::{Page, PageParams, ReservationPage};
use service::reservation::domain::{CreateReservationRequest, ReservationFilter, ReservationResponse};
use tracing::info;

use crate::errors::{ErrorResponse, JsonApiError};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::metrics::record_reservation;
use crate::state::AppState;

fn outcome(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::BookAlreadyReserved(_) | ServiceError::Conflict(_) | ServiceError::StaleVersion => "conflict",
        ServiceError::NotFound { .. } => "not_found",
        ServiceError::Validation(_) | ServiceError::BadRequest(_) => "invalid",
        _ => "error",
    }
}

#[utoipa::path(
    get, path = "/api/v1/reservations", tag = "Reservations",
    params(ReservationFilter, PageParams),
    responses(
        (status = 200, description = "Page of reservations", body = ReservationPage),
        (status = 400, description = "Invalid filter, paging or sort", body = ErrorResponse)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ReservationFilter>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<ReservationResponse>>, JsonApiError> {
    Ok(Json(state.reservations.list(&filter, &params).await?))
}

#[utoipa::path(
    get, path = "/api/v1/reservations/{id}", tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation", body = ReservationResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ReservationResponse>, JsonApiError> {
    Ok(Json(state.reservations.get(id).await?))
}

#[utoipa::path(
    post, path = "/api/v1/reservations", tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reserved", body = ReservationResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Book already reserved", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), JsonApiError> {
    match state.reservations.create(req).await {
        Ok(r) => {
            record_reservation("created");
            Ok((StatusCode::CREATED, Json(r)))
        }
        Err(e) => {
            record_reservation(outcome(&e));
            info!(error = %e, "reservation rejected");
            Err(e.into())
        }
    }
}

#[utoipa::path(
    patch, path = "/api/v1/reservations/{id}/cancel", tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Cancelled", body = ReservationResponse),
        (status = 404, description = "Not Found", body = ErrorResponse),
        (status = 409, description = "Reservation is not active", body = ErrorResponse)
    )
)]
pub async fn cancel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ReservationResponse>, JsonApiError> {
    let r = state.reservations.cancel(id).await?;
    record_reservation("cancelled");
    Ok(Json(r))
}
