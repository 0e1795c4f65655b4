//! Input validation for book mutations.
//!
//! All rules are checked before anything reaches the database, and every
//! rejection names the violated rule.

use super::DomainError;
use super::repositories::{BookPatch, NewBook};

pub const TITLE_MAX: usize = 500;
pub const AUTHOR_MAX: usize = 300;
pub const GENRE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 5000;
pub const YEAR_MIN: i32 = 1000;
pub const YEAR_MAX: i32 = 2100;

/// Strip separators and validate ISBN format.
///
/// Returns the normalized form (digits only, uppercase check character):
/// exactly 13 digits, or 9 digits plus a final digit or `X`.
pub fn normalize_isbn(raw: &str) -> Result<String, DomainError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let valid = match cleaned.len() {
        13 => cleaned.chars().all(|c| c.is_ascii_digit()),
        10 => {
            let mut chars = cleaned.chars();
            let body_ok = chars.by_ref().take(9).all(|c| c.is_ascii_digit());
            let check_ok = matches!(chars.next(), Some(c) if c.is_ascii_digit() || c == 'X');
            body_ok && check_ok
        }
        _ => false,
    };

    if valid {
        Ok(cleaned)
    } else {
        Err(DomainError::Validation(
            "isbn must be 10 or 13 digits (10-digit form may end in X)".to_string(),
        ))
    }
}

fn check_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(DomainError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    if len > max {
        return Err(DomainError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn check_year(year: i32) -> Result<(), DomainError> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(DomainError::Validation(format!(
            "year must be between {} and {}",
            YEAR_MIN, YEAR_MAX
        )));
    }
    Ok(())
}

fn check_pages(pages: i32) -> Result<(), DomainError> {
    if pages <= 0 {
        return Err(DomainError::Validation(
            "pages must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), DomainError> {
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(DomainError::Validation(format!(
            "description must be at most {} characters",
            DESCRIPTION_MAX
        )));
    }
    Ok(())
}

impl NewBook {
    /// Check all field rules. ISBN is expected to be normalized already.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_text("title", &self.title, TITLE_MAX)?;
        check_text("author", &self.author, AUTHOR_MAX)?;
        check_year(self.year)?;
        check_text("genre", &self.genre, GENRE_MAX)?;
        check_pages(self.pages)?;
        if let Some(description) = &self.description {
            check_description(description)?;
        }
        Ok(())
    }
}

impl BookPatch {
    /// Check the rules for every supplied field; omitted fields are ignored.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            check_text("title", title, TITLE_MAX)?;
        }
        if let Some(author) = &self.author {
            check_text("author", author, AUTHOR_MAX)?;
        }
        if let Some(year) = self.year {
            check_year(year)?;
        }
        if let Some(genre) = &self.genre {
            check_text("genre", genre, GENRE_MAX)?;
        }
        if let Some(pages) = self.pages {
            check_pages(pages)?;
        }
        if let Some(Some(description)) = &self.description {
            check_description(description)?;
        }
        Ok(())
    }
}
