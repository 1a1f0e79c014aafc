//! Client configuration: service root and validation ceilings.
//!
//! Everything here is read-only once a `TelegraphClient` is built. Defaults
//! match the public service; `from_env` lets a host point the client at a
//! staging or mock server without code changes.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.telegra.ph";

pub const SHORT_NAME_MAX_LENGTH: usize = 32;
pub const AUTHOR_NAME_MAX_LENGTH: usize = 128;
pub const AUTHOR_URL_MAX_LENGTH: usize = 512;
pub const PAGE_TITLE_MAX_LENGTH: usize = 256;
pub const CONTENT_MAX_BYTES: usize = 64 * 1024;
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub limits: Limits,
}

/// Upper bounds enforced by the endpoint builder. Lengths count characters,
/// `content_max_bytes` counts UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub short_name_max: usize,
    pub author_name_max: usize,
    pub author_url_max: usize,
    pub title_max: usize,
    pub content_max_bytes: usize,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limits: Limits::default(),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            short_name_max: SHORT_NAME_MAX_LENGTH,
            author_name_max: AUTHOR_NAME_MAX_LENGTH,
            author_url_max: AUTHOR_URL_MAX_LENGTH,
            title_max: PAGE_TITLE_MAX_LENGTH,
            content_max_bytes: CONTENT_MAX_BYTES,
            min_year: MIN_YEAR,
            max_year: MAX_YEAR,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            limits: Limits::default(),
        }
        .normalized()
    }

    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("TELEGRAPH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let content_max_bytes = std::env::var("TELEGRAPH_MAX_CONTENT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(CONTENT_MAX_BYTES);

        Self {
            base_url,
            limits: Limits {
                content_max_bytes,
                ..Limits::default()
            },
        }
        .normalized()
    }

    /// Strip trailing slashes so endpoint paths can be appended verbatim.
    pub fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self
    }
}
