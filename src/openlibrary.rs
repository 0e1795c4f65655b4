//! Open Library lookup client.
//!
//! Read-only access to the `/search.json` endpoint, keyed by ISBN or by
//! title+author. Only the first candidate document is consumed and only the
//! handful of fields that feed a book's supplementary metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// Failure of an Open Library call. Always recoverable: the orchestration
/// layer downgrades both variants to "no enrichment data".
#[derive(Debug)]
pub enum EnrichmentError {
    /// The request exceeded the configured timeout
    Timeout { timeout: Duration },
    /// Any other transport-level failure
    Transport(String),
}

impl fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentError::Timeout { timeout } => {
                write!(f, "Open Library request timed out after {:?}", timeout)
            }
            EnrichmentError::Transport(msg) => write!(f, "Open Library request failed: {}", msg),
        }
    }
}

impl std::error::Error for EnrichmentError {}

/// Fields extracted from a search document. All optional: presence in the
/// source document determines presence here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.cover_url.is_none()
            && self.subjects.is_none()
            && self.publisher.is_none()
            && self.language.is_none()
            && self.rating.is_none()
    }

    /// Flatten into the JSON object stored as a book's supplementary
    /// metadata. Absent fields are omitted, never null placeholders.
    pub fn into_extra(self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchDoc {
    cover_i: Option<i64>,
    subject: Option<Vec<String>>,
    publisher: Option<Vec<String>>,
    language: Option<Vec<String>>,
    ratings_average: Option<f64>,
}

/// Maximum number of subject tags carried over from a document
const SUBJECT_LIMIT: usize = 10;

fn extract_doc(doc: SearchDoc) -> Enrichment {
    Enrichment {
        cover_url: doc
            .cover_i
            .map(|id| format!("https://covers.openlibrary.org/b/id/{}-L.jpg", id)),
        subjects: doc
            .subject
            .map(|s| s.into_iter().take(SUBJECT_LIMIT).collect::<Vec<_>>())
            .filter(|s| !s.is_empty()),
        publisher: doc.publisher.and_then(|p| p.into_iter().next()),
        language: doc.language.and_then(|l| l.into_iter().next()),
        rating: doc.ratings_average,
    }
}

/// Client for the Open Library search API.
///
/// Holds no per-call mutable state; safe to share across in-flight requests.
#[derive(Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Search by ISBN, returning the first match or an empty payload.
    pub async fn search_by_isbn(&self, isbn: &str) -> Result<Enrichment, EnrichmentError> {
        self.search(&[("isbn", isbn), ("limit", "1")]).await
    }

    /// Search by title and author, same extraction and empty-result semantics.
    pub async fn search_by_title_author(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Enrichment, EnrichmentError> {
        self.search(&[("title", title), ("author", author), ("limit", "1")])
            .await
    }

    /// Try the ISBN lookup first when an ISBN is supplied; fall back to
    /// title+author otherwise or when the ISBN search comes back empty.
    pub async fn enrich(
        &self,
        title: &str,
        author: &str,
        isbn: Option<&str>,
    ) -> Result<Enrichment, EnrichmentError> {
        if let Some(isbn) = isbn {
            let data = self.search_by_isbn(isbn).await?;
            if !data.is_empty() {
                return Ok(data);
            }
        }

        self.search_by_title_author(title, author).await
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<Enrichment, EnrichmentError> {
        let url = format!("{}/search.json", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?
            .error_for_status()
            .map_err(|e| self.classify(e))?;

        let parsed: SearchResponse = resp.json().await.map_err(|e| self.classify(e))?;

        Ok(parsed
            .docs
            .into_iter()
            .next()
            .map(extract_doc)
            .unwrap_or_default())
    }

    fn classify(&self, e: reqwest::Error) -> EnrichmentError {
        if e.is_timeout() {
            EnrichmentError::Timeout {
                timeout: self.timeout,
            }
        } else {
            EnrichmentError::Transport(e.to_string())
        }
    }
}
