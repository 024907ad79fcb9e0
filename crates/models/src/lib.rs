//! SeaORM entities for the catalog tables plus connection and field
//! validation helpers shared by the service layer.
pub mod errors;
pub mod db;
pub mod timestamps;
pub mod validation;
pub mod author;
pub mod book;
pub mod book_author;
pub mod reservation;
