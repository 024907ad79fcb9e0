use std::sync::Arc;

use configs::AppConfig;
use sea_orm::DatabaseConnection;
use service::{AuthorService, BookService, ReservationPolicy, ReservationService, SearchService};

/// Shared handler state; every service holds the same pool.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub authors: AuthorService,
    pub books: BookService,
    pub reservations: ReservationService,
    pub search: SearchService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        let db = Arc::new(db);
        Self {
            authors: AuthorService::new(db.clone()),
            books: BookService::new(db.clone()),
            reservations: ReservationService::new(db.clone(), ReservationPolicy::from(&cfg.reservation)),
            search: SearchService::new(db.clone(), cfg.search.clone()),
            db,
        }
    }
}
