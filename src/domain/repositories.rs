//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::DomainError;
use crate::models::book::Book;

/// Input for creating a book
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub pages: i32,
    /// Defaults to true when not supplied
    pub available: Option<bool>,
    pub isbn: Option<String>,
    pub description: Option<String>,
}

/// Sparse patch for partial updates.
///
/// The outer `Option` means "field was supplied"; for nullable columns the
/// inner `Option` distinguishes "set to a value" from "clear".
#[derive(Debug, Default, Clone)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub pages: Option<i32>,
    pub available: Option<bool>,
    pub isbn: Option<Option<String>>,
    pub description: Option<Option<String>>,
    /// Supplementary metadata from enrichment; replaced wholesale, never
    /// merged per key.
    pub extra: Option<Option<Map<String, Value>>>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.year.is_none()
            && self.genre.is_none()
            && self.pages.is_none()
            && self.available.is_none()
            && self.isbn.is_none()
            && self.description.is_none()
            && self.extra.is_none()
    }
}

/// Filter criteria for book queries.
///
/// Absent filters are no-ops. Text fields match case-insensitive substrings,
/// year and availability match exactly.
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub available: Option<bool>,
}

/// Generic single-entity CRUD contract.
///
/// The primary-key type is explicit in the contract; nothing is inferred
/// from the entity at runtime. `get_by_id`/`update` signal absence with
/// `None` and `delete` with `false` so callers decide how to surface it.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Id;
    type Record;
    type Create;
    type Patch;

    /// Persist a new record with a fresh identifier and timestamps
    async fn create(&self, input: Self::Create) -> Result<Self::Record, DomainError>;

    /// Fetch a record by primary key
    async fn get_by_id(&self, id: &Self::Id) -> Result<Option<Self::Record>, DomainError>;

    /// Apply only the supplied fields and refresh the update timestamp
    async fn update(
        &self,
        id: &Self::Id,
        patch: Self::Patch,
    ) -> Result<Option<Self::Record>, DomainError>;

    /// Remove a record, reporting whether it existed
    async fn delete(&self, id: &Self::Id) -> Result<bool, DomainError>;
}

/// Repository trait for the Book entity
#[async_trait]
pub trait BookRepository:
    CrudRepository<Id = String, Record = Book, Create = NewBook, Patch = BookPatch>
{
    /// Find books matching the filter, ordered by creation time descending
    /// (identifier as a stable tie-break), with limit/offset pagination
    async fn find_by_filters(
        &self,
        filter: &BookFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Book>, DomainError>;

    /// Count books matching the filter (same semantics as `find_by_filters`)
    async fn count_by_filters(&self, filter: &BookFilter) -> Result<u64, DomainError>;

    /// Exact-match ISBN lookup; uniqueness guarantees at most one record
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError>;
}
