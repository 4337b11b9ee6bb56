//! # Bitmap Font
//!
//! BMFont text rendering for 2D sprite batches.
//!
//! ## Features
//!
//! - **BMFont Parsing**: Text `.fnt` descriptors with kerning and metric overrides
//! - **Glyph Layout**: Wrapping, truncation, alignment and `[color]` markup
//! - **Vertex Caching**: Per-page vertex arrays that can be moved and tinted
//!   without relayout
//! - **Configuration**: Font setup from TOML or RON files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bitmap_font::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     bitmap_font::foundation::logging::init();
//!
//!     let config = FontConfig::load_from_file("fonts/ui.toml")?;
//!     let page = TextureRegion::from_texture(TextureHandle(1), 512, 512);
//!     let font = Arc::new(FontLoader::load(&config, vec![page])?);
//!
//!     let mut cache = BitmapFontCache::new(font);
//!     cache.set_text("Hello World", 20.0, 40.0);
//!     cache.tint(Color::new(1.0, 0.8, 0.2, 1.0));
//!
//!     let mut batch = BatchRecorder::new();
//!     cache.draw(&mut batch);
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for font users
pub mod prelude {
    pub use crate::{
        assets::{BmFontParser, FontLoader},
        config::{Config, ConfigError, FontConfig},
        foundation::math::Vec2,
        render::{
            text::{
                Align, BitmapFont, BitmapFontCache, FontData, FontError, FontResult, GlyphLayout,
                LayoutParams, NamedColors,
            },
            BatchRecorder, Color, GlyphBatch, TextureHandle, TextureRegion,
        },
    };
}
