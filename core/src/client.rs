//! Stateless HTTP request builder and response parser for the catalog API.
//!
//! # Design
//! `BookClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `CatalogClient` glues the two halves to a `Transport`; async hosts can
//! also drive them directly with their own HTTP stack.
//!
//! Request bodies are the caller's values serialized as-is. Full replace
//! (`PUT`) and merge (`PATCH`) take different input types so one can't be
//! sent as the other.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, InputField};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Book, BookId, BookPatch, Page, QueryParams};

/// Synchronous, stateless request builder for the book catalog.
#[derive(Debug, Clone)]
pub struct BookClient {
    base_url: String,
}

impl BookClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_path(&self) -> String {
        format!("{}/books", self.base_url)
    }

    /// The id is percent-encoded as a single path segment.
    fn item_path(&self, id: &BookId) -> Result<String, ApiError> {
        if id.is_empty() {
            return Err(ApiError::MissingInput(InputField::BookId));
        }
        let segment = id.to_string();
        Ok(format!(
            "{}/books/{}",
            self.base_url,
            urlencoding::encode(&segment)
        ))
    }

    pub fn build_create_book(&self, book: &Book) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.collection_path(), book)
    }

    pub fn build_list_books(&self, params: &QueryParams) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_path(),
            query: params.clone().into_pairs(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_book(&self, id: &BookId) -> Result<HttpRequest, ApiError> {
        Ok(bodiless_request(HttpMethod::Get, self.item_path(id)?))
    }

    pub fn build_update_book(&self, id: &BookId, book: &Book) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, self.item_path(id)?, book)
    }

    pub fn build_partial_update_book(
        &self,
        id: &BookId,
        patch: &BookPatch,
    ) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Patch, self.item_path(id)?, patch)
    }

    pub fn build_delete_book(&self, id: &BookId) -> Result<HttpRequest, ApiError> {
        Ok(bodiless_request(HttpMethod::Delete, self.item_path(id)?))
    }

    pub fn parse_create_book(&self, response: HttpResponse) -> Result<Book, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_books(&self, response: HttpResponse) -> Result<Page<Book>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_book(&self, response: HttpResponse) -> Result<Book, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_book(&self, response: HttpResponse) -> Result<Book, ApiError> {
        parse_json(response)
    }

    pub fn parse_partial_update_book(&self, response: HttpResponse) -> Result<Book, ApiError> {
        parse_json(response)
    }

    /// Any 2xx is accepted and the body, if any, is ignored.
    pub fn parse_delete_book(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn bodiless_request(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        query: Vec::new(),
        headers: Vec::new(),
        body: None,
    }
}

fn json_request<B: Serialize>(
    method: HttpMethod,
    path: String,
    body: &B,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        query: Vec::new(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Map non-2xx status codes to `ApiError::Remote`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = server_message(&response.body)
        .unwrap_or_else(|| format!("request failed with HTTP status {}", response.status));
    Err(ApiError::Remote {
        status: response.status,
        message,
    })
}

/// Pull a human-readable message out of a JSON error body.
///
/// Understands `{"error": {"message": ..}}`, `{"message": ..}` and
/// `{"error": ".."}`, in that order.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/error/message"),
        value.get("message"),
        value.get("error"),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string);
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BookClient {
        BookClient::new("http://localhost:8080/api")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_create_book_produces_correct_request() {
        let book = Book::new("Dune", "Spice and sand").with_field("genre", "sf");
        let req = client().build_create_book(&book).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/books");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"title": "Dune", "content": "Spice and sand", "genre": "sf"})
        );
    }

    #[test]
    fn build_list_books_forwards_query_unchanged() {
        let params = QueryParams::new().search("Dune").page(0).size(10);
        let req = client().build_list_books(&params);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/api/books");
        assert_eq!(
            req.query,
            vec![
                ("search".to_string(), "Dune".to_string()),
                ("page".to_string(), "0".to_string()),
                ("size".to_string(), "10".to_string()),
            ]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_books_without_params_has_empty_query() {
        let req = client().build_list_books(&QueryParams::new());
        assert!(req.query.is_empty());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_book_produces_correct_request() {
        let req = client().build_get_book(&BookId::from(42)).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/api/books/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn update_and_partial_update_use_distinct_methods() {
        let id = BookId::from("b-1");
        let put = client()
            .build_update_book(&id, &Book::new("T", "C"))
            .unwrap();
        let patch = client()
            .build_partial_update_book(&id, &BookPatch::new().title("T2"))
            .unwrap();
        assert_eq!(put.method, HttpMethod::Put);
        assert_eq!(patch.method, HttpMethod::Patch);
        assert_eq!(put.path, patch.path);

        let patch_body: Value = serde_json::from_str(patch.body.as_deref().unwrap()).unwrap();
        assert_eq!(patch_body, serde_json::json!({"title": "T2"}));
    }

    #[test]
    fn build_delete_book_produces_correct_request() {
        let req = client().build_delete_book(&BookId::from(3)).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8080/api/books/3");
        assert!(req.body.is_none());
    }

    #[test]
    fn empty_id_is_rejected_before_building() {
        let err = client().build_get_book(&BookId::from("")).unwrap_err();
        assert!(matches!(err, ApiError::MissingInput(InputField::BookId)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BookClient::new("http://localhost:8080/api/");
        let req = client.build_list_books(&QueryParams::new());
        assert_eq!(req.path, "http://localhost:8080/api/books");
    }

    #[test]
    fn parse_create_book_accepts_any_2xx() {
        let body = r#"{"id":1,"title":"New","content":"c"}"#;
        let created = client().parse_create_book(response(201, body)).unwrap();
        assert_eq!(created.id, Some(BookId::from(1)));
        let ok = client().parse_create_book(response(200, body)).unwrap();
        assert_eq!(ok, created);
    }

    #[test]
    fn parse_get_book_tolerates_null_content() {
        let book = client()
            .parse_get_book(response(200, r#"{"id":1,"title":"T","content":null,"author":"A"}"#))
            .unwrap();
        assert_eq!(book.title.as_deref(), Some("T"));
        assert_eq!(book.content, None);
        assert_eq!(book.extra["author"], "A");
    }

    #[test]
    fn parse_list_books_tolerates_missing_content() {
        let page = client()
            .parse_list_books(response(
                200,
                r#"{"content":[{"id":1,"title":"T"},{"id":2,"content":"only body"}],"totalElements":2}"#,
            ))
            .unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].content, None);
        assert_eq!(page.content[1].title, None);
        assert_eq!(page.total_elements, Some(2));
    }

    #[test]
    fn textual_id_is_encoded_as_one_path_segment() {
        let req = client().build_get_book(&BookId::from("1?x=2")).unwrap();
        assert_eq!(req.path, "http://localhost:8080/api/books/1%3Fx%3D2");
        let req = client().build_delete_book(&BookId::from("a/b c")).unwrap();
        assert_eq!(req.path, "http://localhost:8080/api/books/a%2Fb%20c");
        let req = client()
            .build_get_book(&BookId::from("5f0c-uuid_like.id~1"))
            .unwrap();
        assert_eq!(req.path, "http://localhost:8080/api/books/5f0c-uuid_like.id~1");
    }

    #[test]
    fn server_message_outlives_parsed_body() {
        let body = String::from(r#"{"message":"gone"}"#);
        let message = server_message(&body);
        drop(body);
        assert_eq!(message.as_deref(), Some("gone"));
    }

    #[test]
    fn parse_get_book_not_found_carries_server_message() {
        let err = client()
            .parse_get_book(response(404, r#"{"status":404,"message":"Book not found: 9"}"#))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Book not found: 9");
    }

    #[test]
    fn parse_error_without_message_is_generic() {
        let err = client()
            .parse_update_book(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Remote { status: 500, .. }));
        assert_eq!(err.to_string(), "request failed with HTTP status 500");
    }

    #[test]
    fn parse_list_books_bad_json_is_malformed() {
        let err = client()
            .parse_list_books(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn parse_delete_book_ignores_body() {
        assert!(client().parse_delete_book(response(204, "")).is_ok());
        assert!(client().parse_delete_book(response(200, "whatever")).is_ok());
    }

    #[test]
    fn server_message_prefers_nested_error_message() {
        assert_eq!(
            server_message(r#"{"error":{"message":"bad request"},"message":"other"}"#).as_deref(),
            Some("bad request")
        );
        assert_eq!(server_message(r#"{"error":"Not Found"}"#).as_deref(), Some("Not Found"));
        assert_eq!(server_message(r#"{"message":""}"#), None);
        assert_eq!(server_message("<html>"), None);
    }
}
