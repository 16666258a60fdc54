//! Request builder and response parser for cover-art generation.
//!
//! # Design
//! Same split as `client`: `CoverClient::build_generate_cover` validates the
//! inputs and produces an `HttpRequest`, `parse_generate_cover` extracts the
//! image URL from the `HttpResponse`. Validation runs inside the builder so
//! no request value exists for an incomplete input.

use serde::{Deserialize, Serialize};

use crate::client::server_message;
use crate::error::{ApiError, InputField};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::ImageGenerationRequest;

pub const IMAGE_GENERATION_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
pub const IMAGE_MODEL: &str = "dall-e-3";
pub const IMAGE_SIZE: &str = "1024x1024";

const GENERIC_FAILURE: &str = "failed to generate image from the image service";
const NO_IMAGE_URL: &str = "no image URL received from the image service";

#[derive(Serialize)]
struct GenerationBody<'a> {
    model: &'a str,
    prompt: String,
    size: &'a str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

/// Build the fixed cover prompt around a title and story summary.
pub fn cover_prompt(title: &str, content: &str) -> String {
    format!(
        "Create a high-quality 3D-rendered image of a single hardcover book standing upright.\n\
         \n\
         The book is titled \"{title}\".\n\
         Its story is about: {content}\n\
         \n\
         Design the front cover to visually reflect the core feeling or theme of the story. \
         Use symbolic or abstract imagery that conveys the mood, such as hope, loneliness, \
         growth, mystery, or wonder, based on the story.\n\
         \n\
         The cover should use artistic and metaphorical visuals that hint at the genre and \
         tone without using any text or characters.\n\
         \n\
         Keep the background simple and softly lit. Focus on making the book appear visually \
         striking and emotionally resonant."
    )
}

/// Fail on the first empty input, checked as credential, title, content.
pub fn validate(request: &ImageGenerationRequest) -> Result<(), ApiError> {
    let checks = [
        (&request.credential, InputField::Credential),
        (&request.title, InputField::Title),
        (&request.content, InputField::Content),
    ];
    match checks.into_iter().find(|(value, _)| value.is_empty()) {
        Some((_, field)) => Err(ApiError::MissingInput(field)),
        None => Ok(()),
    }
}

/// Stateless request builder for the image-generation endpoint.
#[derive(Debug, Clone)]
pub struct CoverClient {
    endpoint: String,
}

impl Default for CoverClient {
    fn default() -> Self {
        Self::new(IMAGE_GENERATION_ENDPOINT)
    }
}

impl CoverClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_generate_cover(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<HttpRequest, ApiError> {
        validate(request)?;
        let body = GenerationBody {
            model: IMAGE_MODEL,
            prompt: cover_prompt(&request.title, &request.content),
            size: IMAGE_SIZE,
        };
        let body = serde_json::to_string(&body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.endpoint.clone(),
            query: Vec::new(),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                (
                    "authorization".to_string(),
                    format!("Bearer {}", request.credential),
                ),
            ],
            body: Some(body),
        })
    }

    /// Return `data[0].url`, or the server's error message on failure.
    pub fn parse_generate_cover(&self, response: HttpResponse) -> Result<String, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Remote {
                status: response.status,
                message: server_message(&response.body)
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            });
        }
        serde_json::from_str::<GenerationResponse>(&response.body)
            .ok()
            .and_then(|parsed| parsed.data.into_iter().next())
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::MalformedResponse(NO_IMAGE_URL.to_string()))
    }
}
