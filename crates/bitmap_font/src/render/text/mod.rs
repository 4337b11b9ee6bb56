//! Bitmap font text
//!
//! Loads BMFont metrics, lays strings out into lines of positioned glyphs and
//! caches the result as per-page vertex arrays for a sprite batch.
//!
//! # Architecture
//!
//! - [`FontData`]: glyph metrics and font-wide measurements
//! - [`BitmapFont`]: font data bound to its texture pages
//! - [`GlyphLayout`]: runs of glyphs for a string, with wrapping, truncation
//!   and alignment
//! - [`BitmapFontCache`]: vertices for one or more layouts, ready to draw
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bitmap_font::assets::FontLoader;
//! use bitmap_font::config::FontConfig;
//! use bitmap_font::render::text::{Align, BitmapFontCache, LayoutParams};
//! use bitmap_font::render::{BatchRecorder, TextureHandle, TextureRegion};
//!
//! let config = FontConfig::new("fonts/ui.fnt").with_markup(true);
//! let page = TextureRegion::from_texture(TextureHandle(1), 256, 256);
//! let font = Arc::new(FontLoader::load(&config, vec![page])?);
//!
//! let mut cache = BitmapFontCache::new(font);
//! let params = LayoutParams::default()
//!     .with_target_width(200.0)
//!     .with_halign(Align::CENTER)
//!     .with_wrap(true);
//! cache.set_text_with("[RED]Game[] over", 10.0, 300.0, &params);
//!
//! let mut batch = BatchRecorder::new();
//! cache.draw(&mut batch);
//! # Ok::<(), bitmap_font::render::text::FontError>(())
//! ```

mod bitmap_font;
mod error;
mod font_cache;
mod font_data;
mod glyph;
mod glyph_layout;
mod glyph_run;
mod markup;
mod shaping;

#[cfg(test)]
pub(crate) mod tests;

pub use bitmap_font::BitmapFont;
pub use error::{FontError, FontResult};
pub use font_cache::BitmapFontCache;
pub use font_data::{FontData, CAP_CHARS, X_CHARS};
pub use glyph::{Glyph, GlyphId, KerningTable};
pub use glyph_layout::{Align, GlyphLayout, LayoutParams};
pub use glyph_run::GlyphRun;
pub use markup::{parse_color_markup, ColorMarkup, NamedColors};
pub use shaping::{get_glyphs, get_wrap_index, DefaultGlyphSource, GlyphSource};
