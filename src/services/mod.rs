//! Business services composing repositories with external collaborators

pub mod book_service;

pub use book_service::BookService;
