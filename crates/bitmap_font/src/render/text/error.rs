//! Font error types

use std::path::PathBuf;

use crate::config::ConfigError;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while loading or configuring a bitmap font
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to read the descriptor file
    #[error("Failed to read font file {path:?}: {source}")]
    Io {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is malformed; no part of the font is usable
    #[error("Invalid font descriptor (line {line}): {message}")]
    Format {
        /// 1-based line number of the offending line
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// The descriptor defines no glyph with a visible area
    #[error("No glyphs found in font")]
    NoGlyphs,

    /// A setter was called with an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A font was constructed without any texture page
    #[error("Font has no texture pages")]
    NoPages,

    /// A glyph references a texture page the font does not have
    #[error("Glyph {glyph} references page {page} but the font has {pages} page(s)")]
    MissingPage {
        /// Code point of the glyph
        glyph: u32,
        /// Requested page index
        page: usize,
        /// Number of pages supplied
        pages: usize,
    },

    /// Font configuration could not be loaded
    #[error("Font configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FontError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }
}
