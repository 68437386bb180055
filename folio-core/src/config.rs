//! Reader configuration

use crate::decoder::TextDecoder;
use crate::error::DecodeError;
use crate::paginator::DEFAULT_PAGE_SIZE;
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Settings shared by every reading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Lines per page for plain-text books
    pub page_size: NonZeroUsize,

    /// Directory that relative book paths are resolved against
    pub library_root: PathBuf,

    /// When set, relative book paths are fetched from this URL instead of disk
    pub base_url: Option<String>,

    /// WHATWG label of the encoding tried when UTF-8 decoding fails
    pub fallback_encoding: String,

    /// Options handed to the EPUB renderer
    pub render: RenderOptions,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            library_root: PathBuf::from("."),
            base_url: None,
            fallback_encoding: "gbk".to_string(),
            render: RenderOptions::default(),
        }
    }
}

impl ReaderConfig {
    /// Defaults overlaid with `FOLIO_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up through `lookup`
    /// Unparseable values are logged and ignored
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("FOLIO_PAGE_SIZE") {
            match raw.trim().parse::<NonZeroUsize>() {
                Ok(size) => self.page_size = size,
                Err(e) => tracing::warn!("Ignoring FOLIO_PAGE_SIZE={:?}: {}", raw, e),
            }
        }
        if let Some(root) = lookup("FOLIO_LIBRARY_ROOT") {
            self.library_root = PathBuf::from(root);
        }
        if let Some(url) = lookup("FOLIO_BASE_URL") {
            self.base_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(label) = lookup("FOLIO_FALLBACK_ENCODING") {
            self.fallback_encoding = label;
        }
        self
    }

    /// Check that the configuration can be used to build a loader
    pub fn validate(&self) -> Result<(), DecodeError> {
        self.text_decoder().map(|_| ())
    }

    /// Text decoder using the configured fallback encoding
    pub fn text_decoder(&self) -> Result<TextDecoder, DecodeError> {
        TextDecoder::with_fallback_label(&self.fallback_encoding)
    }
}
