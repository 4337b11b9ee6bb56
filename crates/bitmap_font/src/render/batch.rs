//! # Glyph batch interface
//!
//! The font cache never talks to the GPU. It hands each texture page's
//! vertex array to a [`GlyphBatch`], which owns the actual draw call.
//!
//! ## Vertex format
//!
//! Vertices are stride-5 `f32` records `(x, y, packed color, u, v)`, four per
//! glyph quad. [`GlyphVertex`] is the same layout as a struct, for callers
//! that upload through `bytemuck`.

use crate::render::texture::TextureHandle;

/// Floats per vertex: x, y, packed color, u, v
pub const VERTEX_SIZE: usize = 5;

/// Floats per glyph quad (4 vertices)
pub const GLYPH_SIZE: usize = VERTEX_SIZE * 4;

/// One cached vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphVertex {
    /// Screen x
    pub x: f32,
    /// Screen y
    pub y: f32,
    /// Packed `ABGR` color (see [`crate::render::Color::to_float_bits`])
    pub color: f32,
    /// Texture u
    pub u: f32,
    /// Texture v
    pub v: f32,
}

/// Consumer of cached glyph vertices
pub trait GlyphBatch {
    /// Draw `count` floats of `vertices` starting at `offset`, sampling `texture`
    fn draw(&mut self, texture: TextureHandle, vertices: &[f32], offset: usize, count: usize);
}

/// A draw call captured by [`BatchRecorder`]
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Texture bound for the call
    pub texture: TextureHandle,
    /// Float offset into the page array
    pub offset: usize,
    /// Number of floats submitted
    pub count: usize,
    /// Copy of the submitted floats
    pub vertices: Vec<f32>,
}

impl DrawCall {
    /// Number of glyph quads in this call
    pub fn glyph_count(&self) -> usize {
        self.count / GLYPH_SIZE
    }
}

/// Batch that records draw calls instead of issuing them
///
/// Useful for headless rendering paths and for inspecting what a cache
/// would submit.
#[derive(Debug, Default)]
pub struct BatchRecorder {
    calls: Vec<DrawCall>,
}

impl BatchRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls, in submission order
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Total glyph quads submitted
    pub fn glyph_count(&self) -> usize {
        self.calls.iter().map(DrawCall::glyph_count).sum()
    }

    /// Forget every recorded call
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl GlyphBatch for BatchRecorder {
    fn draw(&mut self, texture: TextureHandle, vertices: &[f32], offset: usize, count: usize) {
        self.calls.push(DrawCall {
            texture,
            offset,
            count,
            vertices: vertices[offset..offset + count].to_vec(),
        });
    }
}
