//! Catalog operations as single calls over a `Transport`.
//!
//! Each method builds the request, executes it once, and parses the
//! response. Any failure is logged with the operation name (and the book id
//! for per-record operations) and then returned unchanged.

use crate::client::BookClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Book, BookId, BookPatch, Page, QueryParams};

#[derive(Debug, Clone)]
pub struct CatalogClient<T = UreqTransport> {
    client: BookClient,
    transport: T,
}

impl CatalogClient<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> CatalogClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: BookClient::new(&config.base_url),
            transport,
        }
    }

    pub fn create(&self, book: &Book) -> Result<Book, ApiError> {
        let request = self.client.build_create_book(book);
        self.run("create", None, request, |c, r| c.parse_create_book(r))
    }

    pub fn list(&self, params: &QueryParams) -> Result<Page<Book>, ApiError> {
        let request = Ok(self.client.build_list_books(params));
        self.run("list", None, request, |c, r| c.parse_list_books(r))
    }

    pub fn get(&self, id: &BookId) -> Result<Book, ApiError> {
        let request = self.client.build_get_book(id);
        self.run("get", Some(id), request, |c, r| c.parse_get_book(r))
    }

    /// Replace the whole record.
    pub fn update(&self, id: &BookId, book: &Book) -> Result<Book, ApiError> {
        let request = self.client.build_update_book(id, book);
        self.run("update", Some(id), request, |c, r| c.parse_update_book(r))
    }

    /// Merge only the fields set on `patch`.
    pub fn partial_update(&self, id: &BookId, patch: &BookPatch) -> Result<Book, ApiError> {
        let request = self.client.build_partial_update_book(id, patch);
        self.run("partial_update", Some(id), request, |c, r| {
            c.parse_partial_update_book(r)
        })
    }

    pub fn delete(&self, id: &BookId) -> Result<(), ApiError> {
        let request = self.client.build_delete_book(id);
        self.run("delete", Some(id), request, |c, r| c.parse_delete_book(r))
    }

    fn run<R>(
        &self,
        operation: &'static str,
        id: Option<&BookId>,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&BookClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        request
            .and_then(|request| self.transport.execute(request))
            .and_then(|response| parse(&self.client, response))
            .inspect_err(|error| {
                tracing::error!(
                    operation,
                    id = id.map(tracing::field::display),
                    %error,
                    "catalog request failed"
                );
            })
    }
}
