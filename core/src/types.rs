//! Domain DTOs for the catalog and image APIs.
//!
//! # Design
//! The server owns the record shape. `Book` and `Page` name the fields this
//! crate knows about and flatten everything else into `extra`, so unknown
//! fields survive a fetch-modify-update cycle instead of being dropped.
//! These types are defined independently from the mock-server crate;
//! integration tests catch schema drift between the two.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Server-assigned book identifier.
///
/// Kept in whatever JSON form the server used so it round-trips unchanged.
/// Any JSON number is accepted, including floats and values above `i64::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Number(Number),
    Text(String),
}

impl BookId {
    pub fn is_empty(&self) -> bool {
        matches!(self, BookId::Text(s) if s.is_empty())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Number(n) => write!(f, "{n}"),
            BookId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for BookId {
    fn from(n: i64) -> Self {
        BookId::Number(n.into())
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        BookId::Text(s.to_string())
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        BookId::Text(s)
    }
}

/// A book record. `id` is absent until the server persists it.
///
/// The server owns the shape, so even `title` and `content` may be missing
/// or null in a response. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Fields this client does not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Book {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            content: Some(content.into()),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Subset of book fields for a merge update. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Paging envelope returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elements: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filter and paging parameters for the list call, forwarded verbatim.
///
/// Pairs keep insertion order. Values are not validated here; the server
/// decides what a negative page or an unknown key means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    pub fn search(self, term: impl fmt::Display) -> Self {
        self.insert("search", term)
    }

    pub fn page(self, page: i64) -> Self {
        self.insert("page", page)
    }

    pub fn size(self, size: i64) -> Self {
        self.insert("size", size)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(QueryParams::new(), |params, (k, v)| params.insert(k, v))
    }
}

/// Inputs for one cover-image generation. Built per call, never stored.
#[derive(Clone)]
pub struct ImageGenerationRequest {
    pub title: String,
    pub content: String,
    pub credential: String,
}

impl ImageGenerationRequest {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            credential: credential.into(),
        }
    }
}

impl fmt::Debug for ImageGenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageGenerationRequest")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("credential", &"<redacted>")
            .finish()
    }
}
