//! Book Service - catalog operations plus best-effort enrichment
//!
//! Composes the book repository with the Open Library client. The store
//! mutation always completes (durably) before any enrichment merge is
//! attempted, and enrichment failure never fails the catalog operation.

use std::sync::Arc;

use crate::domain::{
    BookFilter, BookPatch, BookRepository, CrudRepository, DomainError, NewBook, Paginated,
    PaginationParams, validation::normalize_isbn,
};
use crate::models::Book;
use crate::openlibrary::{EnrichmentError, OpenLibraryClient};

pub struct BookService {
    books: Arc<dyn BookRepository>,
    openlibrary: OpenLibraryClient,
}

impl BookService {
    pub fn new(books: Arc<dyn BookRepository>, openlibrary: OpenLibraryClient) -> Self {
        Self { books, openlibrary }
    }

    /// Validate and persist a new book, then attempt enrichment.
    ///
    /// The returned book carries supplementary metadata when the lookup
    /// succeeded with a non-empty payload, and none otherwise.
    pub async fn create_book(&self, mut input: NewBook) -> Result<Book, DomainError> {
        if let Some(raw) = &input.isbn {
            input.isbn = Some(normalize_isbn(raw)?);
        }
        input.validate()?;

        let book = self.books.create(input).await?;

        tracing::info!(book_id = %book.id, title = %book.title, "book created");

        Ok(self.apply_enrichment(book).await)
    }

    pub async fn get_book(&self, id: &str) -> Result<Book, DomainError> {
        self.books
            .get_by_id(&id.to_string())
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Apply a partial update; only supplied fields change.
    pub async fn update_book(&self, id: &str, mut patch: BookPatch) -> Result<Book, DomainError> {
        if let Some(Some(raw)) = &patch.isbn {
            patch.isbn = Some(Some(normalize_isbn(raw)?));
        }
        patch.validate()?;

        self.books
            .update(&id.to_string(), patch)
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Remove a book, reporting whether it existed. Absence is a signal for
    /// the caller, not an error.
    pub async fn delete_book(&self, id: &str) -> Result<bool, DomainError> {
        let deleted = self.books.delete(&id.to_string()).await?;
        if deleted {
            tracing::info!(book_id = %id, "book deleted");
        }
        Ok(deleted)
    }

    /// Filtered, paginated search ordered by creation time descending.
    pub async fn search_books(
        &self,
        filter: BookFilter,
        pagination: PaginationParams,
    ) -> Result<Paginated<Book>, DomainError> {
        let items = self
            .books
            .find_by_filters(&filter, pagination.limit(), pagination.offset())
            .await?;
        let total = self.books.count_by_filters(&filter).await?;

        Ok(Paginated::new(items, total, &pagination))
    }

    /// Explicitly re-run enrichment for an existing book.
    pub async fn enrich_book(&self, id: &str) -> Result<Book, DomainError> {
        let book = self.get_book(id).await?;
        Ok(self.apply_enrichment(book).await)
    }

    /// Best-effort enrichment merge.
    ///
    /// A non-empty payload replaces the book's supplementary metadata
    /// wholesale. Lookup failures are logged and downgraded: the book is
    /// returned exactly as persisted.
    async fn apply_enrichment(&self, book: Book) -> Book {
        let lookup = self
            .openlibrary
            .enrich(&book.title, &book.author, book.isbn.as_deref())
            .await;

        let enrichment = match lookup {
            Ok(data) => data,
            Err(EnrichmentError::Timeout { timeout }) => {
                tracing::warn!(
                    book_id = %book.id,
                    timeout_secs = timeout.as_secs_f64(),
                    "enrichment lookup timed out, keeping book without metadata"
                );
                return book;
            }
            Err(err) => {
                tracing::warn!(
                    book_id = %book.id,
                    error = %err,
                    "enrichment lookup failed, keeping book without metadata"
                );
                return book;
            }
        };

        if enrichment.is_empty() {
            return book;
        }

        let patch = BookPatch {
            extra: Some(Some(enrichment.into_extra())),
            ..Default::default()
        };

        // The merge is an ordinary update; if it fails (or the book vanished
        // in between) the durably persisted record still stands.
        match self.books.update(&book.id, patch).await {
            Ok(Some(updated)) => updated,
            Ok(None) => book,
            Err(err) => {
                tracing::warn!(book_id = %book.id, error = %err, "failed to store enrichment");
                book
            }
        }
    }
}
