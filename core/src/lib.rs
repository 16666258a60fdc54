//! Client core for the book catalog API and cover-art generation.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and offers executing
//! clients that run those round-trips over a pluggable `Transport`.
//!
//! # Design
//! - `BookClient` and `CoverClient` are stateless: they hold only a base URL
//!   or endpoint. Each operation is split into `build_*` and `parse_*`, so
//!   the I/O boundary is explicit.
//! - `CatalogClient` and `CoverImageGenerator` pair a builder with a
//!   `Transport` (`UreqTransport` by default) and log failures before
//!   returning them.
//! - Book and page DTOs keep unknown server fields, so records round-trip.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod catalog;
pub mod client;
pub mod config;
pub mod cover;
pub mod error;
pub mod generator;
pub mod http;
pub mod transport;
pub mod types;

pub use catalog::CatalogClient;
pub use client::BookClient;
pub use config::ClientConfig;
pub use cover::CoverClient;
pub use error::{ApiError, InputField};
pub use generator::CoverImageGenerator;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Book, BookId, BookPatch, ImageGenerationRequest, Page, QueryParams};
