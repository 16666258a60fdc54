//! Cover-art generation as a single call over a `Transport`.

use crate::cover::CoverClient;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::ImageGenerationRequest;

/// Generates cover images. Holds no credential; each call supplies one.
#[derive(Debug, Clone)]
pub struct CoverImageGenerator<T = UreqTransport> {
    client: CoverClient,
    transport: T,
}

impl Default for CoverImageGenerator<UreqTransport> {
    fn default() -> Self {
        Self::with_transport(CoverClient::default(), UreqTransport::new())
    }
}

impl CoverImageGenerator<UreqTransport> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point at a different image endpoint, e.g. a local mock.
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self::with_transport(CoverClient::new(endpoint), UreqTransport::new())
    }
}

impl<T: Transport> CoverImageGenerator<T> {
    pub fn with_transport(client: CoverClient, transport: T) -> Self {
        Self { client, transport }
    }

    /// Returns the URL of the generated image.
    ///
    /// Empty inputs fail with `ApiError::MissingInput` before any request is
    /// sent, checked in the order credential, title, content.
    pub fn generate_cover_image(
        &self,
        title: &str,
        content: &str,
        credential: &str,
    ) -> Result<String, ApiError> {
        self.generate(&ImageGenerationRequest::new(title, content, credential))
    }

    pub fn generate(&self, request: &ImageGenerationRequest) -> Result<String, ApiError> {
        self.client
            .build_generate_cover(request)
            .and_then(|http| self.transport.execute(http))
            .and_then(|response| self.client.parse_generate_cover(response))
            .inspect(|url| tracing::debug!(title = %request.title, %url, "cover image generated"))
            .inspect_err(|error| {
                tracing::error!(title = %request.title, %error, "image generation failed")
            })
    }
}
