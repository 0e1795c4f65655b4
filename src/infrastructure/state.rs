//! Application state containing services and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::infrastructure::SeaOrmBookRepository;
use crate::openlibrary::OpenLibraryClient;
use crate::services::BookService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection (health checks)
    db: DatabaseConnection,
    /// Book catalog service
    pub books: Arc<BookService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, openlibrary: OpenLibraryClient) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let books = Arc::new(BookService::new(book_repo, openlibrary));

        Self { db, books }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
