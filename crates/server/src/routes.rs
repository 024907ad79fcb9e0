pub mod authors;
pub mod books;
pub mod health;
pub mod reservations;
pub mod search;

use axum::{
    http::Uri,
    middleware,
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::{attach_path, JsonApiError};
use crate::metrics;
use crate::openapi::ApiDoc;
use crate::state::AppState;

async fn not_found(uri: Uri) -> JsonApiError {
    JsonApiError::new(axum::http::StatusCode::NOT_FOUND, format!("No handler found for {}", uri.path()))
}

/// Build the full application router: catalog API, health, metrics and docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/v1/authors", get(authors::list).post(authors::create))
        .route("/api/v1/authors/:id", get(authors::get).put(authors::update).delete(authors::delete))
        .route("/api/v1/books", get(books::list).post(books::create))
        .route("/api/v1/books/:id", get(books::get).put(books::update).delete(books::delete))
        .route("/api/v1/reservations", get(reservations::list).post(reservations::create))
        .route("/api/v1/reservations/:id", get(reservations::get))
        .route("/api/v1/reservations/:id/cancel", patch(reservations::cancel))
        .route("/api/v1/search", get(search::search))
        .route("/health", get(health::health))
        .route_layer(middleware::from_fn(metrics::track));

    let docs = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    api.route("/metrics", get(metrics::metrics))
        .merge(docs)
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(attach_path))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
