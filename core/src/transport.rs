//! The I/O seam between request builders and the network.
//!
//! `Transport` executes one `HttpRequest` and returns the raw `HttpResponse`,
//! whatever its status. Only a failure to get any response at all is an
//! error here; status interpretation belongs to the parsers.

use std::fmt;

use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as data for the parsers to interpret.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a caller-configured agent. It must not treat HTTP status codes
    /// as errors.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            path,
            query,
            headers,
            body,
        } = request;
        tracing::debug!(method = method.as_str(), %path, "sending request");

        let result = match method {
            HttpMethod::Get => without_body(self.agent.get(&path), &query, &headers),
            HttpMethod::Delete => without_body(self.agent.delete(&path), &query, &headers),
            HttpMethod::Post => with_body(self.agent.post(&path), &query, &headers, body),
            HttpMethod::Put => with_body(self.agent.put(&path), &query, &headers, body),
            HttpMethod::Patch => with_body(self.agent.patch(&path), &query, &headers, body),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(status, %path, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn decorate<B>(
    mut builder: RequestBuilder<B>,
    query: &[(String, String)],
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (key, value) in query {
        builder = builder.query(key.as_str(), value.as_str());
    }
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn without_body(
    builder: RequestBuilder<WithoutBody>,
    query: &[(String, String)],
    headers: &[(String, String)],
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    decorate(builder, query, headers).call()
}

fn with_body(
    builder: RequestBuilder<WithBody>,
    query: &[(String, String)],
    headers: &[(String, String)],
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    let builder = decorate(builder, query, headers);
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
