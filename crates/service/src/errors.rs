use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use migration::constraints;
use models::reservation::ReservationStatus;

/// One rejected request field, named as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{entity} not found with id {id}")]
    NotFound { entity: &'static str, id: i64 },
    #[error("ISBN already exists: {0}")]
    DuplicateIsbn(String),
    #[error("Book with id {0} already has an active reservation")]
    BookAlreadyReserved(i64),
    #[error("Reservation {id} cannot be cancelled, current status is {status}")]
    InvalidReservationState { id: i64, status: ReservationStatus },
    #[error("{0}")]
    Conflict(String),
    #[error("Resource was modified by another request. Please retry.")]
    StaleVersion,
    #[error("Data integrity violation")]
    Integrity(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self { Self::NotFound { entity, id } }
}

/// True when `err` is a unique violation of the named index.
pub fn violates(err: &DbErr, constraint: &str) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains(constraint))
}

fn is_lock_timeout(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("lock timeout") || msg.contains("55P03")
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        if violates(&err, constraints::RESERVATIONS_ACTIVE_BOOK) {
            return ServiceError::Conflict("Book already has an active reservation".into());
        }
        if violates(&err, constraints::BOOKS_ISBN) {
            return ServiceError::Conflict("ISBN already exists".into());
        }
        if is_lock_timeout(&err) {
            return ServiceError::Conflict("Resource is locked by another request. Please retry.".into());
        }
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                ServiceError::Integrity(msg)
            }
            _ => ServiceError::Db(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut out = Vec::new();
        for (field, list) in errs.field_errors() {
            let name = models::validation::json_field_name(&field);
            for e in list.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", name));
                out.push(FieldViolation { field: name.clone(), message });
            }
        }
        out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        ServiceError::Validation(out)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
