use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::error::ApiError;
use crate::domain::{BookFilter, BookPatch, DomainError, NewBook, Paginated, PaginationParams};
use crate::infrastructure::AppState;
use crate::models::Book;

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub pages: i32,
    pub available: Option<bool>,
    pub isbn: Option<String>,
    pub description: Option<String>,
}

impl From<CreateBookRequest> for NewBook {
    fn from(req: CreateBookRequest) -> Self {
        NewBook {
            title: req.title,
            author: req.author,
            year: req.year,
            genre: req.genre,
            pages: req.pages,
            available: req.available,
            isbn: req.isbn,
            description: req.description,
        }
    }
}

/// All fields optional; omitted fields keep their persisted values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub pages: Option<i32>,
    pub available: Option<bool>,
    pub isbn: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateBookRequest> for BookPatch {
    fn from(req: UpdateBookRequest) -> Self {
        BookPatch {
            title: req.title,
            author: req.author,
            year: req.year,
            genre: req.genre,
            pages: req.pages,
            available: req.available,
            isbn: req.isbn.map(Some),
            description: req.description.map(Some),
            extra: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchBooksQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub available: Option<bool>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

#[utoipa::path(
    get,
    path = "/api/v1/books",
    responses(
        (status = 200, description = "Paginated list of matching books"),
        (status = 422, description = "Invalid filter or pagination parameters")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchBooksQuery>,
) -> Result<Json<Paginated<Book>>, ApiError> {
    let pagination = PaginationParams::new(query.page, query.page_size)?;
    let filter = BookFilter {
        title: query.title,
        author: query.author,
        genre: query.genre,
        year: query.year,
        available: query.available,
    };

    let result = state.books.search_books(filter, pagination).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/books",
    responses(
        (status = 201, description = "Book created, enriched when metadata was found"),
        (status = 409, description = "Duplicate ISBN"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state.books.create_book(request.into()).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    responses(
        (status = 200, description = "The requested book"),
        (status = 404, description = "No book with this identifier")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state.books.get_book(&id).await?;
    Ok(Json(book))
}

#[utoipa::path(
    put,
    path = "/api/v1/books/{id}",
    responses(
        (status = 200, description = "Updated book"),
        (status = 404, description = "No book with this identifier"),
        (status = 409, description = "Duplicate ISBN"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBookRequest>,
) -> Result<Json<Book>, ApiError> {
    let book = state.books.update_book(&id, request.into()).await?;
    Ok(Json(book))
}

#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "No book with this identifier")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.books.delete_book(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(DomainError::NotFound.into())
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/enrich",
    responses(
        (status = 200, description = "Book after the enrichment attempt"),
        (status = 404, description = "No book with this identifier")
    )
)]
pub async fn enrich_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state.books.enrich_book(&id).await?;
    Ok(Json(book))
}
