use utoipa::OpenApi;

use models::reservation::ReservationStatus;
use service::author::domain::{AuthorResponse, BookSummary, CreateAuthorRequest, UpdateAuthorRequest};
use service::book::domain::{AuthorSummary, BookResponse, CreateBookRequest, UpdateBookRequest};
use service::errors::FieldViolation;
use service::pagination::{AuthorPage, BookPage, ReservationPage, SearchResultPage};
use service::reservation::domain::{CreateReservationRequest, ReservationResponse};
use service::search::domain::SearchResultResponse;

use crate::errors::ErrorResponse;
use crate::routes::health::HealthDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "1.0.0",
        description = "Authors, books, reservations and full-text search for a library catalog."
    ),
    paths(
        crate::routes::health::health,
        crate::routes::authors::list,
        crate::routes::authors::get,
        crate::routes::authors::create,
        crate::routes::authors::update,
        crate::routes::authors::delete,
        crate::routes::books::list,
        crate::routes::books::get,
        crate::routes::books::create,
        crate::routes::books::update,
        crate::routes::books::delete,
        crate::routes::reservations::list,
        crate::routes::reservations::get,
        crate::routes::reservations::create,
        crate::routes::reservations::cancel,
        crate::routes::search::search,
    ),
    components(
        schemas(
            HealthDoc,
            ErrorResponse,
            FieldViolation,
            AuthorResponse,
            BookSummary,
            CreateAuthorRequest,
            UpdateAuthorRequest,
            BookResponse,
            AuthorSummary,
            CreateBookRequest,
            UpdateBookRequest,
            ReservationStatus,
            ReservationResponse,
            CreateReservationRequest,
            SearchResultResponse,
            AuthorPage,
            BookPage,
            ReservationPage,
            SearchResultPage,
        )
    ),
    tags(
        (name = "Authors", description = "Author management"),
        (name = "Books", description = "Book management"),
        (name = "Reservations", description = "Book reservations"),
        (name = "Search", description = "Full-text book search"),
        (name = "Health", description = "Liveness and database status")
    )
)]
pub struct ApiDoc;
