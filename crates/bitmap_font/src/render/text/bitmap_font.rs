//! Bitmap font facade
//!
//! A [`BitmapFont`] ties parsed [`FontData`] to the texture regions holding
//! its pages. Construction binds every glyph's texture coordinates; after
//! that the font is read-only for layout and caching, and is shared into
//! caches through an `Arc`.

use std::sync::Arc;

use super::error::{FontError, FontResult};
use super::font_data::FontData;
use super::glyph::{Glyph, GlyphId};
use super::markup::NamedColors;
use super::shaping::{DefaultGlyphSource, GlyphSource};
use crate::render::texture::TextureRegion;

/// Font metrics bound to texture pages
#[derive(Debug)]
pub struct BitmapFont {
    data: FontData,
    regions: Vec<TextureRegion>,
    integer: bool,
    source: Box<dyn GlyphSource>,
    named_colors: Arc<NamedColors>,
}

impl BitmapFont {
    /// Bind `data` to one region per texture page
    ///
    /// # Errors
    /// [`FontError::NoPages`] if `regions` is empty, [`FontError::MissingPage`]
    /// if a glyph references a page beyond `regions`.
    pub fn new(mut data: FontData, regions: Vec<TextureRegion>, integer: bool) -> FontResult<Self> {
        if regions.is_empty() {
            return Err(FontError::NoPages);
        }

        for index in 0..data.glyphs().len() {
            let id = GlyphId(index as u32);
            let glyph = data.glyph(id);
            let region = regions.get(glyph.page).ok_or(FontError::MissingPage {
                glyph: glyph.id,
                page: glyph.page,
                pages: regions.len(),
            })?;
            data.set_glyph_region(id, region);
        }

        log::debug!(
            "Bound font '{}': {} glyphs on {} page(s)",
            data.name,
            data.glyphs().len(),
            regions.len()
        );

        Ok(Self {
            data,
            regions,
            integer,
            source: Box::new(DefaultGlyphSource),
            named_colors: Arc::new(NamedColors::standard()),
        })
    }

    /// Replace the character lookup strategy
    #[must_use]
    pub fn with_glyph_source(mut self, source: Box<dyn GlyphSource>) -> Self {
        self.source = source;
        self
    }

    /// Replace the color table used by `[name]` markup
    #[must_use]
    pub fn with_named_colors(mut self, colors: Arc<NamedColors>) -> Self {
        self.named_colors = colors;
        self
    }

    /// Glyphs and metrics
    pub fn data(&self) -> &FontData {
        &self.data
    }

    /// Mutable glyphs and metrics
    pub fn data_mut(&mut self) -> &mut FontData {
        &mut self.data
    }

    /// Character lookup strategy
    pub fn glyph_source(&self) -> &dyn GlyphSource {
        self.source.as_ref()
    }

    /// Colors addressable by name in markup
    pub fn named_colors(&self) -> &NamedColors {
        &self.named_colors
    }

    /// One region per texture page
    pub fn regions(&self) -> &[TextureRegion] {
        &self.regions
    }

    /// Region of texture page `page`
    pub fn region(&self, page: usize) -> Option<&TextureRegion> {
        self.regions.get(page)
    }

    /// Glyph defined for `ch`
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.source.glyph(&self.data, ch).map(|id| self.data.glyph(id))
    }

    /// Whether cached glyph positions are rounded to whole pixels
    pub fn uses_integer_positions(&self) -> bool {
        self.integer
    }

    /// Round cached glyph positions to whole pixels. Affects caches created
    /// afterwards.
    pub fn set_use_integer_positions(&mut self, integer: bool) {
        self.integer = integer;
    }

    /// Whether y grows downward
    pub fn is_flipped(&self) -> bool {
        self.data.flipped
    }

    /// Enable `[color]` markup during layout
    pub fn set_markup_enabled(&mut self, enabled: bool) {
        self.data.markup_enabled = enabled;
    }

    /// Whether `[color]` markup is recognised
    pub fn is_markup_enabled(&self) -> bool {
        self.data.markup_enabled
    }

    /// Distance between baselines
    pub fn line_height(&self) -> f32 {
        self.data.line_height
    }

    /// Height of capital letters
    pub fn cap_height(&self) -> f32 {
        self.data.cap_height
    }

    /// Height of lowercase letters
    pub fn x_height(&self) -> f32 {
        self.data.x_height
    }

    /// Distance from the cap height to the top of the tallest glyph
    pub fn ascent(&self) -> f32 {
        self.data.ascent
    }

    /// Distance from the baseline to the lowest glyph extent
    pub fn descent(&self) -> f32 {
        self.data.descent
    }

    /// Advance of the space character
    pub fn space_x_advance(&self) -> f32 {
        self.data.space_x_advance
    }

    /// Horizontal scale
    pub fn scale_x(&self) -> f32 {
        self.data.scale_x()
    }

    /// Vertical scale
    pub fn scale_y(&self) -> f32 {
        self.data.scale_y()
    }

    /// Rescale the font's metrics
    ///
    /// # Errors
    /// [`FontError::InvalidArgument`] if either scale is zero.
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) -> FontResult<()> {
        self.data.set_scale(scale_x, scale_y)
    }

    /// Rescale uniformly
    ///
    /// # Errors
    /// [`FontError::InvalidArgument`] if `scale` is zero.
    pub fn set_scale_uniform(&mut self, scale: f32) -> FontResult<()> {
        self.data.set_scale_uniform(scale)
    }

    /// Make every glyph in `chars` as wide as the widest of them
    ///
    /// Narrower glyphs are centered in the shared advance and lose their
    /// kerning. Typically used for digits so counters don't jitter.
    pub fn set_fixed_width_glyphs(&mut self, chars: &str) {
        let ids: Vec<GlyphId> = chars.chars().filter_map(|c| self.data.glyph_id(c)).collect();
        let max_advance = ids
            .iter()
            .map(|&id| self.data.glyph(id).xadvance)
            .fold(0, i32::max);

        for id in ids {
            let glyph = self.data.glyph_mut(id);
            glyph.xoffset += (max_advance - glyph.xadvance) / 2;
            glyph.xadvance = max_advance;
            glyph.clear_kerning();
            glyph.fixed_width = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::tests::fixtures;
    use crate::render::texture::TextureHandle;
    use approx::assert_relative_eq;

    #[test]
    fn test_requires_pages() {
        let err = BitmapFont::new(fixtures::font_data(), Vec::new(), false).unwrap_err();
        assert!(matches!(err, FontError::NoPages));
    }

    #[test]
    fn test_missing_page() {
        let mut data = fixtures::font_data();
        if let Some(id) = data.glyph_id('q') {
            data.glyph_mut(id).page = 3;
        }
        let region = TextureRegion::from_texture(TextureHandle(1), 256, 256);
        let err = BitmapFont::new(data, vec![region], false).unwrap_err();
        assert!(matches!(
            err,
            FontError::MissingPage { glyph: 113, page: 3, pages: 1 }
        ));
    }

    #[test]
    fn test_binds_texture_coordinates() {
        let font = fixtures::font();
        for glyph in font.data().glyphs() {
            assert!(glyph.u2 >= glyph.u);
            // not flipped: v is the bottom edge
            assert!(glyph.v >= glyph.v2);
        }
        let a = font.glyph('A').unwrap();
        assert!(a.u2 > a.u);
    }

    #[test]
    fn test_metric_accessors() {
        let mut font = fixtures::font();
        assert_relative_eq!(font.line_height(), 16.0);
        assert_relative_eq!(font.cap_height(), 12.0);
        assert_relative_eq!(font.x_height(), 8.0);
        assert_relative_eq!(font.ascent(), 2.0);
        assert_relative_eq!(font.space_x_advance(), 6.0);

        font.set_scale_uniform(2.0).unwrap();
        assert_relative_eq!(font.line_height(), 32.0);
        assert_relative_eq!(font.scale_x(), 2.0);
        assert!(font.set_scale(0.0, 2.0).is_err());
    }

    #[test]
    fn test_fixed_width_glyphs() {
        let mut font = fixtures::font();
        font.set_fixed_width_glyphs("AB.");

        let a = font.glyph('A').unwrap();
        assert_eq!(a.xadvance, 12);
        assert_eq!(a.xoffset, 1);
        assert!(a.fixed_width);
        assert_eq!(a.kerning('V'), 0);

        let dot = font.glyph('.').unwrap();
        assert_eq!(dot.xadvance, 12);
        assert_eq!(dot.xoffset, 1 + (12 - 4) / 2);

        assert!(!font.glyph('a').unwrap().fixed_width);
    }

    #[test]
    fn test_integer_positions_flag() {
        let mut font = fixtures::font();
        assert!(!font.uses_integer_positions());
        font.set_use_integer_positions(true);
        assert!(font.uses_integer_positions());
    }

    #[test]
    fn test_custom_named_colors() {
        let colors = Arc::new(NamedColors::new());
        let font = fixtures::font().with_named_colors(colors);
        assert!(font.named_colors().is_empty());
    }
}
