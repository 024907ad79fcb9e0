use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use models::reservation::{self, ReservationStatus};
use models::validation::not_blank;

use crate::errors::ServiceResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(required(message = "Book ID is required"))]
    pub book_id: Option<i64>,
    #[validate(
        required(message = "User name must not be blank"),
        custom(function = "not_blank", message = "User name must not be blank"),
        length(max = 100, message = "User name must not exceed 100 characters")
    )]
    pub user_name: Option<String>,
}

/// Optional list filters; all supplied filters must match.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReservationFilter {
    pub book_id: Option<i64>,
    /// Exact user name
    pub user_name: Option<String>,
    /// ACTIVE, CANCELLED or EXPIRED
    pub status: Option<String>,
}

impl ReservationFilter {
    pub fn status(&self) -> ServiceResult<Option<ReservationStatus>> {
        Ok(self.status.as_deref().map(str::parse::<ReservationStatus>).transpose()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub user_name: String,
    pub status: ReservationStatus,
    pub reserved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl ReservationResponse {
    pub fn from_model(r: reservation::Model, book_title: String) -> Self {
        Self {
            id: r.id,
            book_id: r.book_id,
            book_title,
            user_name: r.user_name,
            status: r.status,
            reserved_at: r.reserved_at.with_timezone(&Utc),
            expires_at: r.expires_at.with_timezone(&Utc),
            cancelled_at: r.cancelled_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}
