use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of POST and PUT: every modelled field is required. A client-sent
/// `id` is accepted and ignored; the path decides which record changes.
#[derive(Deserialize)]
pub struct BookInput {
    #[serde(default, rename = "id")]
    _id: Option<Value>,
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct BookPatch {
    #[serde(default, rename = "id")]
    _id: Option<Value>,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub content: Vec<Book>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub size: usize,
}

fn default_page_size() -> usize {
    10
}

#[derive(Deserialize)]
pub struct ImageGeneration {
    pub model: String,
    pub prompt: String,
    pub size: String,
}

pub type Db = Arc<RwLock<Vec<Book>>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/{id}",
            get(get_book)
                .put(update_book)
                .patch(patch_book)
                .delete(delete_book),
        )
        .route("/v1/images/generations", post(generate_image))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn failure(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({"status": status.as_u16(), "message": message.into()})),
    )
}

fn not_found(id: Uuid) -> (StatusCode, Json<Value>) {
    failure(StatusCode::NOT_FOUND, format!("Book not found: {id}"))
}

fn matches_search(book: &Book, term: &str) -> bool {
    let term = term.to_lowercase();
    book.title.to_lowercase().contains(&term) || book.content.to_lowercase().contains(&term)
}

async fn list_books(State(db): State<Db>, Query(params): Query<ListParams>) -> ApiResult<Json<Page>> {
    if params.size == 0 {
        return Err(failure(StatusCode::BAD_REQUEST, "Page size must not be less than one"));
    }
    let books = db.read().await;
    let matching: Vec<&Book> = books
        .iter()
        .filter(|b| params.search.as_deref().map_or(true, |t| matches_search(b, t)))
        .collect();
    let total_elements = matching.len();
    let content = matching
        .into_iter()
        .skip(params.page.saturating_mul(params.size))
        .take(params.size)
        .cloned()
        .collect();
    Ok(Json(Page {
        content,
        number: params.page,
        size: params.size,
        total_elements,
        total_pages: total_elements.div_ceil(params.size),
    }))
}

async fn create_book(State(db): State<Db>, Json(input): Json<BookInput>) -> (StatusCode, Json<Book>) {
    let book = Book {
        id: Uuid::new_v4(),
        title: input.title,
        content: input.content,
        extra: input.extra,
    };
    tracing::info!(id = %book.id, title = %book.title, "book created");
    db.write().await.push(book.clone());
    (StatusCode::CREATED, Json(book))
}

async fn get_book(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<Json<Book>> {
    let books = db.read().await;
    books
        .iter()
        .find(|b| b.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn update_book(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<BookInput>,
) -> ApiResult<Json<Book>> {
    let mut books = db.write().await;
    let book = books.iter_mut().find(|b| b.id == id).ok_or_else(|| not_found(id))?;
    book.title = input.title;
    book.content = input.content;
    book.extra = input.extra;
    tracing::info!(%id, "book replaced");
    Ok(Json(book.clone()))
}

async fn patch_book(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<BookPatch>,
) -> ApiResult<Json<Book>> {
    let mut books = db.write().await;
    let book = books.iter_mut().find(|b| b.id == id).ok_or_else(|| not_found(id))?;
    if let Some(title) = input.title {
        book.title = title;
    }
    if let Some(content) = input.content {
        book.content = content;
    }
    book.extra.extend(input.extra);
    tracing::info!(%id, "book patched");
    Ok(Json(book.clone()))
}

async fn delete_book(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let mut books = db.write().await;
    let index = books.iter().position(|b| b.id == id).ok_or_else(|| not_found(id))?;
    books.remove(index);
    tracing::info!(%id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn image_failure(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"error": {"message": message}})))
}

/// Stand-in for the image service. Accepts bearer tokens starting with `sk-`.
async fn generate_image(
    headers: HeaderMap,
    Json(input): Json<ImageGeneration>,
) -> ApiResult<Json<Value>> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if !token.is_some_and(|t| t.starts_with("sk-")) {
        return Err(image_failure(StatusCode::UNAUTHORIZED, "Incorrect API key provided"));
    }
    if input.prompt.trim().is_empty() {
        return Err(image_failure(StatusCode::BAD_REQUEST, "prompt must not be empty"));
    }
    let id = Uuid::new_v4();
    tracing::info!(model = %input.model, size = %input.size, %id, "image generated");
    Ok(Json(json!({
        "created": 1_700_000_000,
        "data": [{
            "url": format!("https://images.example/{id}.png"),
            "revised_prompt": input.prompt,
        }],
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, content: &str) -> Book {
        Book {
            id: Uuid::nil(),
            title: title.to_string(),
            content: content.to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn book_serializes_extras_at_top_level() {
        let mut b = book("Test", "Body");
        b.extra.insert("genre".to_string(), json!("sf"));
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["genre"], "sf");
    }

    #[test]
    fn book_input_rejects_missing_content() {
        let result: Result<BookInput, _> = serde_json::from_str(r#"{"title":"Only title"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn book_patch_all_fields_optional() {
        let input: BookPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.content.is_none());
        assert!(input.extra.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_content() {
        let b = book("Dune", "A desert planet");
        assert!(matches_search(&b, "dune"));
        assert!(matches_search(&b, "DESERT"));
        assert!(!matches_search(&b, "ocean"));
    }

    #[test]
    fn list_params_default_paging() {
        let params: ListParams = serde_json::from_str(r#"{"search":"x"}"#).unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.size, 10);
    }
}
