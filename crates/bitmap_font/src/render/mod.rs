//! # Rendering types
//!
//! Colors, texture regions and the batch interface the text system draws
//! through. Nothing here owns GPU state: a [`GlyphBatch`] implementation on
//! the application side turns cached vertices into draw calls.

pub mod batch;
pub mod color;
pub mod text;
pub mod texture;

pub use batch::{BatchRecorder, DrawCall, GlyphBatch, GlyphVertex, GLYPH_SIZE, VERTEX_SIZE};
pub use color::Color;
pub use texture::{AtlasOffsets, TextureHandle, TextureRegion};
