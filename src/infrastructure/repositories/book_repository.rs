//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::domain::{
    BookFilter, BookPatch, BookRepository, CrudRepository, DomainError, NewBook,
};
use crate::models::Book;
use crate::models::book::{ActiveModel, Column, Entity as BookEntity};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn apply_filters(mut query: Select<BookEntity>, filter: &BookFilter) -> Select<BookEntity> {
    // Substring match on the text columns; SQLite LIKE is case-insensitive
    if let Some(title) = &filter.title
        && !title.is_empty()
    {
        query = query.filter(Column::Title.contains(title));
    }

    if let Some(author) = &filter.author
        && !author.is_empty()
    {
        query = query.filter(Column::Author.contains(author));
    }

    if let Some(genre) = &filter.genre
        && !genre.is_empty()
    {
        query = query.filter(Column::Genre.contains(genre));
    }

    if let Some(year) = filter.year {
        query = query.filter(Column::Year.eq(year));
    }

    if let Some(available) = filter.available {
        query = query.filter(Column::Available.eq(available));
    }

    query
}

/// The insert/update pre-checks keep the common duplicate-ISBN path out of
/// the database; this catches the remaining race on the unique index.
fn map_db_err(e: DbErr) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed: books.isbn") {
        DomainError::Conflict("a book with this ISBN already exists".to_string())
    } else {
        DomainError::Database(msg)
    }
}

#[async_trait]
impl CrudRepository for SeaOrmBookRepository {
    type Id = String;
    type Record = Book;
    type Create = NewBook;
    type Patch = BookPatch;

    async fn create(&self, input: NewBook) -> Result<Book, DomainError> {
        if let Some(isbn) = &input.isbn
            && self.find_by_isbn(isbn).await?.is_some()
        {
            return Err(DomainError::Conflict(format!(
                "a book with ISBN {} already exists",
                isbn
            )));
        }

        let now = chrono::Utc::now().to_rfc3339();

        let new_book = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(input.title),
            author: Set(input.author),
            year: Set(input.year),
            genre: Set(input.genre),
            pages: Set(input.pages),
            available: Set(input.available.unwrap_or(true)),
            isbn: Set(input.isbn),
            description: Set(input.description),
            extra: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = new_book.insert(&self.db).await.map_err(map_db_err)?;
        Ok(Book::from(model))
    }

    async fn get_by_id(&self, id: &String) -> Result<Option<Book>, DomainError> {
        let model = BookEntity::find_by_id(id.clone()).one(&self.db).await?;
        Ok(model.map(Book::from))
    }

    async fn update(&self, id: &String, patch: BookPatch) -> Result<Option<Book>, DomainError> {
        let Some(existing) = BookEntity::find_by_id(id.clone()).one(&self.db).await? else {
            return Ok(None);
        };

        if let Some(Some(isbn)) = &patch.isbn
            && let Some(other) = self.find_by_isbn(isbn).await?
            && other.id != existing.id
        {
            return Err(DomainError::Conflict(format!(
                "a book with ISBN {} already exists",
                isbn
            )));
        }

        let mut active: ActiveModel = existing.into();

        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(author) = patch.author {
            active.author = Set(author);
        }
        if let Some(year) = patch.year {
            active.year = Set(year);
        }
        if let Some(genre) = patch.genre {
            active.genre = Set(genre);
        }
        if let Some(pages) = patch.pages {
            active.pages = Set(pages);
        }
        if let Some(available) = patch.available {
            active.available = Set(available);
        }
        if let Some(isbn) = patch.isbn {
            active.isbn = Set(isbn);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(extra) = patch.extra {
            let serialized = extra
                .map(|map| serde_json::to_string(&map))
                .transpose()
                .map_err(|e| DomainError::Internal(e.to_string()))?;
            active.extra = Set(serialized);
        }

        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(Some(Book::from(model)))
    }

    async fn delete(&self, id: &String) -> Result<bool, DomainError> {
        let result = BookEntity::delete_by_id(id.clone()).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_by_filters(
        &self,
        filter: &BookFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Book>, DomainError> {
        let models = apply_filters(BookEntity::find(), filter)
            // Most recent first; id as a stable tie-break for same-instant
            // inserts so repeated queries paginate identically
            .order_by_desc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;

        Ok(crate::models::book::books_to_dtos(models))
    }

    async fn count_by_filters(&self, filter: &BookFilter) -> Result<u64, DomainError> {
        let count = apply_filters(BookEntity::find(), filter)
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        let model = BookEntity::find()
            .filter(Column::Isbn.eq(isbn))
            .one(&self.db)
            .await?;
        Ok(model.map(Book::from))
    }
}
