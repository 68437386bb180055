//! EPUB rendering capability
//!
//! EPUB books are never paginated by this crate. Their bytes are handed to
//! an [`EpubRenderer`], which owns layout and navigation and returns a
//! [`Rendition`] handle. Front ends supply the renderer.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};

/// How facing pages are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spread {
    /// One location at a time
    #[default]
    None,
    /// Two facing locations side by side
    Auto,
}

impl Spread {
    /// Locations shown at once
    pub fn locations(&self) -> usize {
        match self {
            Self::None => 1,
            Self::Auto => 2,
        }
    }
}

impl std::str::FromStr for Spread {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "auto" => Ok(Self::Auto),
            other => Err(RenderError::InvalidOption(format!("spread '{}'", other))),
        }
    }
}

/// Layout options passed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// CSS-style width, e.g. "100%" or "80"
    pub width: String,
    pub height: String,
    pub spread: Spread,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "100%".to_string(),
            spread: Spread::None,
        }
    }
}

/// External engine able to render an EPUB
pub trait EpubRenderer {
    /// Open the EPUB in `bytes`; the bytes are passed through unmodified
    fn render(
        &self,
        bytes: &[u8],
        options: &RenderOptions,
    ) -> Result<Box<dyn Rendition>, RenderError>;
}

/// Handle to a rendered EPUB
pub trait Rendition {
    /// Show the current location
    fn display(&mut self) -> Result<(), RenderError>;

    fn next(&mut self) -> Result<(), RenderError>;

    fn prev(&mut self) -> Result<(), RenderError>;
}

/// Keys the reader binds to EPUB navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowRight,
    ArrowLeft,
    Space,
    Other,
}

impl NavKey {
    /// Map a DOM-style key name ("ArrowRight", " ", ...)
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowRight" => Self::ArrowRight,
            "ArrowLeft" => Self::ArrowLeft,
            " " | "Space" | "Spacebar" => Self::Space,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Previous,
}

/// Key binding: right arrow and space go forward, left arrow goes back
pub fn key_command(key: NavKey) -> Option<NavCommand> {
    match key {
        NavKey::ArrowRight | NavKey::Space => Some(NavCommand::Next),
        NavKey::ArrowLeft => Some(NavCommand::Previous),
        NavKey::Other => None,
    }
}

/// Apply a key press to a rendition
/// Returns the command that was applied, if the key is bound
pub fn dispatch_key(
    rendition: &mut dyn Rendition,
    key: NavKey,
) -> Result<Option<NavCommand>, RenderError> {
    let command = key_command(key);
    match command {
        Some(NavCommand::Next) => rendition.next()?,
        Some(NavCommand::Previous) => rendition.prev()?,
        None => {}
    }
    Ok(command)
}
