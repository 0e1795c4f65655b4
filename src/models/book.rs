use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub pages: i32,
    pub available: bool,
    pub isbn: Option<String>,
    pub description: Option<String>,
    /// JSON object with supplementary metadata from enrichment
    pub extra: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub pages: i32,
    pub available: bool,
    pub isbn: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        // A row with unparseable extra JSON is surfaced without metadata
        // rather than failing the whole read.
        let extra = model
            .extra
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Map<String, Value>>(raw).ok());

        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            year: model.year,
            genre: model.genre,
            pages: model.pages,
            available: model.available,
            isbn: model.isbn,
            description: model.description,
            extra,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Batch conversion of fetched rows into response DTOs
pub fn books_to_dtos(models: Vec<Model>) -> Vec<Book> {
    models.into_iter().map(Book::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, extra: Option<&str>) -> Model {
        Model {
            id: id.to_string(),
            title: "Clean Code".to_string(),
            author: "Robert Martin".to_string(),
            year: 2008,
            genre: "Programming".to_string(),
            pages: 464,
            available: true,
            isbn: Some("9780132350884".to_string()),
            description: None,
            extra: extra.map(str::to_string),
            created_at: "2024-01-01T12:00:00+00:00".to_string(),
            updated_at: "2024-01-01T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn converts_single_model() {
        let book = Book::from(model("b1", Some(r#"{"publisher":"Prentice Hall"}"#)));
        assert_eq!(book.id, "b1");
        assert_eq!(book.title, "Clean Code");
        let extra = book.extra.expect("extra should be parsed");
        assert_eq!(extra["publisher"], "Prentice Hall");
    }

    #[test]
    fn malformed_extra_is_dropped() {
        let book = Book::from(model("b1", Some("not json")));
        assert!(book.extra.is_none());
    }

    #[test]
    fn converts_batches() {
        let books = books_to_dtos(vec![model("b1", None), model("b2", None)]);
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, "b1");
        assert_eq!(books[1].id, "b2");
    }
}
