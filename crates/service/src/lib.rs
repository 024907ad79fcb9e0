//! Service layer providing the catalog's business rules on top of models.
//! - Request DTOs are validated here before any query runs.
//! - Responses are shaped for the HTTP layer (camelCase JSON).
//! - Failures are reported as `errors::ServiceError`.

pub mod errors;
pub mod pagination;
pub mod author;
pub mod book;
pub mod reservation;
pub mod search;
#[cfg(test)]
pub mod test_support;
#[cfg(test)]
mod tests;

pub use author::AuthorService;
pub use book::BookService;
pub use reservation::{ReservationPolicy, ReservationService};
pub use search::SearchService;
