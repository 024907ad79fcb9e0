use axum::extract::path::ErrorKind;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use models::errors::ModelError;
use serde::Serialize;
use service::errors::{FieldViolation, ServiceError};
use thiserror::Error;
use tracing::{error, warn};

pub const UNEXPECTED: &str = "An unexpected error occurred";

/// Error body shared by every failing endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldViolation>,
}

/// HTTP-facing error. Rendered once without the request path; the
/// `attach_path` middleware re-renders it with the path filled in.
#[derive(Debug, Clone)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub field_errors: Vec<FieldViolation>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), field_errors: Vec::new() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }

    pub fn internal() -> Self { Self::new(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED) }

    pub fn body(&self, path: Option<String>) -> ErrorResponse {
        ErrorResponse {
            status: self.status.as_u16(),
            error: self.status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.message.clone(),
            timestamp: Utc::now(),
            path,
            field_errors: self.field_errors.clone(),
        }
    }

    fn render(&self, path: Option<String>) -> Response {
        (self.status, Json(self.body(path))).into_response()
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut res = self.render(None);
        res.extensions_mut().insert(self);
        res
    }
}

/// Fills `path` into error bodies produced by handlers and extractors.
pub async fn attach_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut res = next.run(req).await;
    match res.extensions_mut().remove::<JsonApiError>() {
        Some(err) => err.render(Some(path)),
        None => res,
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(fields) => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Validation failed".into(),
                field_errors: fields,
            },
            ServiceError::BadRequest(msg) => Self::bad_request(msg),
            ServiceError::Model(ModelError::Validation(msg)) => Self::bad_request(msg),
            e @ ServiceError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            e @ (ServiceError::DuplicateIsbn(_)
            | ServiceError::BookAlreadyReserved(_)
            | ServiceError::InvalidReservationState { .. }
            | ServiceError::Conflict(_)
            | ServiceError::StaleVersion) => Self::new(StatusCode::CONFLICT, e.to_string()),
            e @ ServiceError::Integrity(_) => {
                warn!(error = ?e, "data integrity violation");
                Self::bad_request(e.to_string())
            }
            e @ (ServiceError::Db(_) | ServiceError::Model(ModelError::Db(_))) => {
                error!(error = %e, "unexpected service failure");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rej: JsonRejection) -> Self {
        match rej {
            JsonRejection::MissingJsonContentType(_) => {
                Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Content-Type must be application/json")
            }
            other => {
                warn!(error = %other.body_text(), "unreadable request body");
                Self::bad_request("Malformed request body")
            }
        }
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rej: QueryRejection) -> Self {
        let text = rej.body_text();
        let detail = text.strip_prefix("Failed to deserialize query string: ").unwrap_or(&text);
        Self::bad_request(format!("Invalid value in query string: {}", detail))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rej: PathRejection) -> Self {
        match rej {
            PathRejection::FailedToDeserializePathParams(inner) => match inner.into_kind() {
                ErrorKind::ParseErrorAtKey { key, value, .. } => {
                    Self::bad_request(format!("Invalid value '{}' for parameter '{}'", value, key))
                }
                ErrorKind::ParseError { value, .. } | ErrorKind::ParseErrorAtIndex { value, .. } => {
                    Self::bad_request(format!("Invalid value '{}'", value))
                }
                other => Self::bad_request(format!("Invalid path: {}", other)),
            },
            other => {
                error!(error = %other.body_text(), "path extraction failed");
                Self::internal()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::reservation::ReservationStatus;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::not_found("Book", 1), StatusCode::NOT_FOUND),
            (ServiceError::DuplicateIsbn("9780000000000".into()), StatusCode::CONFLICT),
            (ServiceError::BookAlreadyReserved(1), StatusCode::CONFLICT),
            (ServiceError::InvalidReservationState { id: 1, status: ReservationStatus::Expired }, StatusCode::CONFLICT),
            (ServiceError::StaleVersion, StatusCode::CONFLICT),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Integrity("fk".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Model(ModelError::Validation("bad".into())), StatusCode::BAD_REQUEST),
            (ServiceError::Db("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn stale_version_is_conflict_with_retry_hint() {
        let v = serde_json::to_value(JsonApiError::from(ServiceError::StaleVersion).body(Some("/api/v1/books/5".into()))).unwrap();
        assert_eq!(v["status"], 409);
        assert_eq!(v["error"], "Conflict");
        assert_eq!(v["message"], "Resource was modified by another request. Please retry.");
    }

    #[test]
    fn internal_errors_hide_details() {
        let e = JsonApiError::from(ServiceError::Db("password=hunter2".into()));
        assert_eq!(e.message, UNEXPECTED);
        let e = JsonApiError::from(ServiceError::Integrity("detail".into()));
        assert_eq!(e.message, "Data integrity violation");
    }

    #[test]
    fn body_omits_empty_optionals() {
        let v = serde_json::to_value(JsonApiError::bad_request("nope").body(None)).unwrap();
        assert_eq!(v["status"], 400);
        assert_eq!(v["error"], "Bad Request");
        assert_eq!(v["message"], "nope");
        assert!(v.get("path").is_none());
        assert!(v.get("fieldErrors").is_none());
        assert!(v["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn validation_body_lists_fields() {
        let err = JsonApiError::from(ServiceError::Validation(vec![FieldViolation {
            field: "title".into(),
            message: "Title must not be blank".into(),
        }]));
        let v = serde_json::to_value(err.body(Some("/api/v1/books".into()))).unwrap();
        assert_eq!(v["message"], "Validation failed");
        assert_eq!(v["path"], "/api/v1/books");
        assert_eq!(v["fieldErrors"][0]["field"], "title");
    }
}
