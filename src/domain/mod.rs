//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, domain value types and domain error types.

pub mod errors;
pub mod pagination;
pub mod repositories;
pub mod validation;

pub use errors::DomainError;
pub use pagination::{Paginated, PaginationParams};
pub use repositories::*;
