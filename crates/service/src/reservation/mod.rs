pub mod domain;
pub mod service;
pub mod sweeper;

pub use service::{ReservationPolicy, ReservationService};
