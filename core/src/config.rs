//! Client configuration.
//!
//! The host loads this from whatever source it likes (JSON, TOML, a
//! hard-coded literal) and passes it to the client constructors. Nothing
//! here reads the environment.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientConfig {
    /// Root of the catalog API; `/books` is appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_base_url() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"baseUrl":"https://books.example/api"}"#).unwrap();
        assert_eq!(config.base_url, "https://books.example/api");
    }

    #[test]
    fn empty_object_uses_default() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn rejects_unknown_options() {
        let result: Result<ClientConfig, _> = serde_json::from_str(r#"{"timeout":5}"#);
        assert!(result.is_err());
    }
}
