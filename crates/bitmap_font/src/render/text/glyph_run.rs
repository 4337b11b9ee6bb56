//! A horizontal run of same-colored glyphs

use super::glyph::GlyphId;
use crate::foundation::collections::Poolable;
use crate::render::color::Color;

/// Glyphs laid out on one line with a single color
///
/// `x_advances` holds one more entry than `glyphs`: entry 0 is the offset of
/// the first glyph from the run origin, entry `i` (for `i >= 1`) the advance
/// from glyph `i - 1` to glyph `i`, and the final entry the drawn width of
/// the last glyph.
#[derive(Debug, Clone, Default)]
pub struct GlyphRun {
    /// Glyphs in draw order
    pub glyphs: Vec<GlyphId>,
    /// Pen advances, `glyphs.len() + 1` entries once shaped
    pub x_advances: Vec<f32>,
    /// Run origin relative to the layout
    pub x: f32,
    /// Baseline relative to the layout
    pub y: f32,
    /// Extent from `x` to the right edge of the last glyph
    pub width: f32,
    /// Color of every glyph in the run
    pub color: Color,
}

impl GlyphRun {
    /// Whether the run has no glyphs
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Sum of all advances
    pub fn advance_sum(&self) -> f32 {
        self.x_advances.iter().sum()
    }
}

impl Poolable for GlyphRun {
    fn reset(&mut self) {
        self.glyphs.clear();
        self.x_advances.clear();
        self.x = 0.0;
        self.y = 0.0;
        self.width = 0.0;
        self.color = Color::WHITE;
    }
}
