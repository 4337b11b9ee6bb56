//! Configuration system

use std::path::{Path, PathBuf};

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How to load and set up a bitmap font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Path to the `.fnt` descriptor
    pub descriptor: PathBuf,
    /// Whether y grows downward
    pub flip: bool,
    /// Round cached glyph positions to whole pixels
    pub integer_positions: bool,
    /// Enable `[color]` markup
    pub markup: bool,
    /// Characters after which lines may wrap
    pub break_chars: String,
    /// Multiplier for the height of empty lines
    pub blank_line_scale: f32,
    /// Uniform font scale
    pub scale: f32,
    /// Overrides the descriptor's line height (unscaled)
    pub line_height: Option<f32>,
    /// Glyphs to force to a common advance, usually digits
    pub fixed_width_glyphs: Option<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            descriptor: PathBuf::new(),
            flip: false,
            integer_positions: true,
            markup: false,
            break_chars: String::new(),
            blank_line_scale: 1.0,
            scale: 1.0,
            line_height: None,
            fixed_width_glyphs: None,
        }
    }
}

impl Config for FontConfig {}

impl FontConfig {
    /// Configuration for the descriptor at `path` with default settings
    pub fn new(descriptor: impl Into<PathBuf>) -> Self {
        Self {
            descriptor: descriptor.into(),
            ..Self::default()
        }
    }

    /// Set y-down coordinates
    #[must_use]
    pub const fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// Set integer glyph positions
    #[must_use]
    pub const fn with_integer_positions(mut self, integer: bool) -> Self {
        self.integer_positions = integer;
        self
    }

    /// Enable or disable markup
    #[must_use]
    pub const fn with_markup(mut self, markup: bool) -> Self {
        self.markup = markup;
        self
    }

    /// Set wrap break characters
    #[must_use]
    pub fn with_break_chars(mut self, chars: impl Into<String>) -> Self {
        self.break_chars = chars.into();
        self
    }

    /// Set the blank line scale
    #[must_use]
    pub const fn with_blank_line_scale(mut self, scale: f32) -> Self {
        self.blank_line_scale = scale;
        self
    }

    /// Set the uniform scale
    #[must_use]
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Override the line height
    #[must_use]
    pub const fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = Some(height);
        self
    }

    /// Make `chars` fixed width
    #[must_use]
    pub fn with_fixed_width_glyphs(mut self, chars: impl Into<String>) -> Self {
        self.fixed_width_glyphs = Some(chars.into());
        self
    }

    /// Check values that would fail later when applied to a font
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "scale must be finite and non-zero, got {}",
                self.scale
            )));
        }
        if self.blank_line_scale < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "blank_line_scale must not be negative, got {}",
                self.blank_line_scale
            )));
        }
        if let Some(height) = self.line_height {
            if height <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "line_height must be positive, got {height}"
                )));
            }
        }
        Ok(())
    }
}
