//! Font metrics store
//!
//! [`FontData`] owns every glyph of a font in an arena and maps 16-bit code
//! points to them through a two-level sparse table (128 pages of 512 slots,
//! allocated on first use). It also holds the font-wide metrics that the
//! layout engine reads.

use std::path::PathBuf;

use super::error::{FontError, FontResult};
use super::glyph::{table_index, Glyph, GlyphId, PAGES, PAGE_SIZE};
use crate::render::texture::TextureRegion;

/// Characters whose height defines the x-height, in preference order
pub const X_CHARS: [char; 13] = ['x', 'e', 'a', 'o', 'n', 's', 'r', 'c', 'u', 'm', 'v', 'w', 'z'];

/// Characters whose height defines the cap height, in preference order
pub const CAP_CHARS: [char; 26] = [
    'M', 'N', 'B', 'D', 'C', 'E', 'F', 'K', 'A', 'G', 'H', 'I', 'J', 'L', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

type GlyphPage = Box<[Option<GlyphId>; PAGE_SIZE]>;

/// Glyph table and font-wide metrics of a bitmap font
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name, usually the descriptor file stem
    pub name: String,
    /// Descriptor the font was parsed from
    pub font_file: Option<PathBuf>,
    /// Whether y grows downward
    pub flipped: bool,
    /// Padding baked into the top of every glyph image
    pub pad_top: f32,
    /// Padding baked into the right of every glyph image
    pub pad_right: f32,
    /// Padding baked into the bottom of every glyph image
    pub pad_bottom: f32,
    /// Padding baked into the left of every glyph image
    pub pad_left: f32,
    /// Distance between baselines of consecutive lines
    pub line_height: f32,
    /// Height of capital letters above the baseline
    pub cap_height: f32,
    /// Distance from the cap height to the top of the tallest glyph
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the lowest glyph (negative)
    pub descent: f32,
    /// Y delta applied for each new line
    pub down: f32,
    /// Multiplier applied to `down` for empty lines
    pub blank_line_scale: f32,
    /// Whether `[` introduces color markup during layout
    pub markup_enabled: bool,
    /// Horizontal cursor offset used by text fields
    pub cursor_x: f32,
    /// Advance of the space character
    pub space_x_advance: f32,
    /// Height of lowercase letters
    pub x_height: f32,
    /// Characters after which a line may wrap, in addition to whitespace
    pub break_chars: Vec<char>,
    scale_x: f32,
    scale_y: f32,
    image_paths: Vec<String>,
    glyphs: Vec<Glyph>,
    table: Vec<Option<GlyphPage>>,
    missing_glyph: Option<GlyphId>,
}

impl Default for FontData {
    fn default() -> Self {
        Self::new()
    }
}

impl FontData {
    /// Create an empty font for programmatic population
    pub fn new() -> Self {
        Self {
            name: String::new(),
            font_file: None,
            flipped: false,
            pad_top: 0.0,
            pad_right: 0.0,
            pad_bottom: 0.0,
            pad_left: 0.0,
            line_height: 0.0,
            cap_height: 1.0,
            ascent: 0.0,
            descent: 0.0,
            down: 0.0,
            blank_line_scale: 1.0,
            markup_enabled: false,
            cursor_x: 0.0,
            space_x_advance: 0.0,
            x_height: 1.0,
            break_chars: Vec::new(),
            scale_x: 1.0,
            scale_y: 1.0,
            image_paths: Vec::new(),
            glyphs: Vec::new(),
            table: vec![None; PAGES],
            missing_glyph: None,
        }
    }

    /// Store `glyph` as the glyph for code point `ch`
    ///
    /// Code points above `0xFFFF` are kept in the arena but never looked up.
    pub fn set_glyph(&mut self, ch: u32, glyph: Glyph) -> GlyphId {
        let id = self.push_glyph(glyph);
        if let Some((page, slot)) = table_index(ch) {
            let page = self.table[page].get_or_insert_with(|| Box::new([None; PAGE_SIZE]));
            page[slot] = Some(id);
        }
        id
    }

    /// Use `glyph` for characters the font does not define
    pub fn set_missing_glyph(&mut self, glyph: Glyph) -> GlyphId {
        let id = self.push_glyph(glyph);
        self.missing_glyph = Some(id);
        id
    }

    fn push_glyph(&mut self, glyph: Glyph) -> GlyphId {
        let id = GlyphId(self.glyphs.len() as u32);
        self.glyphs.push(glyph);
        id
    }

    /// Glyph stored under `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different font.
    pub fn glyph(&self, id: GlyphId) -> &Glyph {
        &self.glyphs[id.index()]
    }

    /// Mutable glyph stored under `id`
    pub fn glyph_mut(&mut self, id: GlyphId) -> &mut Glyph {
        &mut self.glyphs[id.index()]
    }

    /// Id of the glyph defined for `ch`, ignoring the missing glyph
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        let (page, slot) = table_index(ch as u32)?;
        self.table[page].as_ref().and_then(|p| p[slot])
    }

    /// Glyph defined for `ch`, ignoring the missing glyph
    pub fn get_glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyph_id(ch).map(|id| self.glyph(id))
    }

    /// Whether `ch` can be drawn, either directly or via the missing glyph
    pub fn has_glyph(&self, ch: char) -> bool {
        self.missing_glyph.is_some() || self.glyph_id(ch).is_some()
    }

    /// Fallback glyph for undefined characters
    pub fn missing_glyph(&self) -> Option<GlyphId> {
        self.missing_glyph
    }

    /// Every glyph in the arena, including the missing glyph
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Ids reachable from the code point table, in code point order
    pub fn glyph_ids(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.table
            .iter()
            .flatten()
            .flat_map(|page| page.iter().flatten().copied())
    }

    /// First glyph in code point order that covers any pixels
    pub fn first_glyph(&self) -> FontResult<GlyphId> {
        self.glyph_ids()
            .find(|&id| !self.glyph(id).is_empty())
            .ok_or(FontError::NoGlyphs)
    }

    /// Image path of every texture page, indexed by page
    pub fn image_paths(&self) -> &[String] {
        &self.image_paths
    }

    /// Image path of one texture page
    pub fn image_path(&self, page: usize) -> Option<&str> {
        self.image_paths.get(page).map(String::as_str)
    }

    /// Replace the page image paths
    pub fn set_image_paths(&mut self, paths: Vec<String>) {
        self.image_paths = paths;
    }

    /// Horizontal scale applied to glyph metrics
    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    /// Vertical scale applied to glyph metrics
    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    /// Set the line height (unscaled); `down` follows it
    pub fn set_line_height(&mut self, height: f32) {
        self.line_height = height * self.scale_y;
        self.down = if self.flipped { self.line_height } else { -self.line_height };
    }

    /// Rescale every size-like metric by the ratio of new to old scale
    ///
    /// Fails without changing anything if either scale is zero.
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) -> FontResult<()> {
        if scale_x == 0.0 {
            return Err(FontError::InvalidArgument("scale_x cannot be 0".into()));
        }
        if scale_y == 0.0 {
            return Err(FontError::InvalidArgument("scale_y cannot be 0".into()));
        }
        let x = scale_x / self.scale_x;
        let y = scale_y / self.scale_y;
        self.line_height *= y;
        self.space_x_advance *= x;
        self.x_height *= y;
        self.cap_height *= y;
        self.ascent *= y;
        self.descent *= y;
        self.down *= y;
        self.pad_left *= x;
        self.pad_right *= x;
        self.pad_top *= y;
        self.pad_bottom *= y;
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        Ok(())
    }

    /// Uniform variant of [`FontData::set_scale`]
    pub fn set_scale_uniform(&mut self, scale: f32) -> FontResult<()> {
        self.set_scale(scale, scale)
    }

    /// Whether layout treats `ch` as whitespace
    pub fn is_whitespace(&self, ch: u32) -> bool {
        matches!(ch, 0x0a | 0x0d | 0x09 | 0x20)
    }

    /// Whether `ch` is one of the configured break characters
    pub fn is_break_char(&self, ch: u32) -> bool {
        self.break_chars.iter().any(|&c| c as u32 == ch)
    }

    /// Width actually drawn by a glyph when it ends a line
    pub fn glyph_width(&self, glyph: &Glyph) -> f32 {
        if glyph.fixed_width {
            glyph.xadvance as f32 * self.scale_x
        } else {
            (glyph.width + glyph.xoffset) as f32 * self.scale_x - self.pad_right
        }
    }

    /// Derive space, x-height, cap height, ascent and down from the glyphs
    ///
    /// `baseline` is the descriptor's `base` value. `descent` must already
    /// hold the lowest glyph extent.
    pub(crate) fn finish_metrics(&mut self, baseline: f32) -> FontResult<()> {
        let pad_y = self.pad_top + self.pad_bottom;

        let space = match self.glyph_id(' ') {
            Some(id) => id,
            None => {
                let source = match self.glyph_id('l') {
                    Some(id) => id,
                    None => self.first_glyph()?,
                };
                let mut space = Glyph::new(' ' as u32);
                space.xadvance = self.glyph(source).xadvance;
                self.set_glyph(' ' as u32, space)
            }
        };
        let (pad_left, pad_right) = (self.pad_left, self.pad_right);
        let space = self.glyph_mut(space);
        if space.width == 0 {
            space.width = (pad_left + space.xadvance as f32 + pad_right) as i32;
            space.xoffset = (-pad_left) as i32;
        }
        self.space_x_advance = space.xadvance as f32;

        let x_glyph = match X_CHARS.iter().find_map(|&c| self.glyph_id(c)) {
            Some(id) => id,
            None => self.first_glyph()?,
        };
        self.x_height = self.glyph(x_glyph).height as f32 - pad_y;

        self.cap_height = match CAP_CHARS.iter().find_map(|&c| self.glyph_id(c)) {
            Some(id) => self.glyph(id).height as f32,
            None => self
                .glyph_ids()
                .map(|id| self.glyph(id))
                .filter(|g| !g.is_empty())
                .map(|g| g.height as f32)
                .fold(self.cap_height, f32::max),
        };
        self.cap_height -= pad_y;

        self.ascent = baseline - self.cap_height;
        self.down = -self.line_height;
        if self.flipped {
            self.ascent = -self.ascent;
            self.down = -self.down;
        }
        Ok(())
    }

    /// Map a glyph's source rectangle into texture coordinates of `region`
    ///
    /// Compensates for whitespace an atlas packer stripped from the region:
    /// the glyph is shifted for stripped left/top edges and clipped (with its
    /// size and offsets adjusted) where it would leave the packed bounds.
    pub fn set_glyph_region(&mut self, id: GlyphId, region: &TextureRegion) {
        let flipped = self.flipped;
        let glyph = self.glyph_mut(id);

        let inv_tex_width = 1.0 / region.texture_width as f32;
        let inv_tex_height = 1.0 / region.texture_height as f32;

        let (offset_x, offset_y) = region.atlas.map_or((0.0, 0.0), |atlas| {
            (
                atlas.offset_x,
                atlas.original_height - atlas.packed_height - atlas.offset_y,
            )
        });

        let mut x = glyph.src_x as f32;
        let mut x2 = (glyph.src_x + glyph.width) as f32;
        let mut y = glyph.src_y as f32;
        let mut y2 = (glyph.src_y + glyph.height) as f32;

        if offset_x > 0.0 {
            x -= offset_x;
            if x < 0.0 {
                glyph.width = (glyph.width as f32 + x) as i32;
                glyph.xoffset = (glyph.xoffset as f32 - x) as i32;
                x = 0.0;
            }
            x2 -= offset_x;
            if x2 > region.region_width {
                glyph.width = (glyph.width as f32 - (x2 - region.region_width)) as i32;
                x2 = region.region_width;
            }
        }
        if offset_y > 0.0 {
            y -= offset_y;
            if y < 0.0 {
                glyph.height = ((glyph.height as f32 + y) as i32).max(0);
                y = 0.0;
            }
            y2 -= offset_y;
            if y2 > region.region_height {
                let amount = y2 - region.region_height;
                glyph.height = (glyph.height as f32 - amount) as i32;
                glyph.yoffset = (glyph.yoffset as f32 + amount) as i32;
                y2 = region.region_height;
            }
        }

        glyph.u = region.u + x * inv_tex_width;
        glyph.u2 = region.u + x2 * inv_tex_width;
        if flipped {
            glyph.v = region.v + y * inv_tex_height;
            glyph.v2 = region.v + y2 * inv_tex_height;
        } else {
            glyph.v2 = region.v + y * inv_tex_height;
            glyph.v = region.v + y2 * inv_tex_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::texture::{AtlasOffsets, TextureHandle};
    use approx::assert_relative_eq;

    fn glyph(id: char, width: i32, height: i32, xadvance: i32) -> Glyph {
        let mut glyph = Glyph::new(id as u32);
        glyph.width = width;
        glyph.height = height;
        glyph.xadvance = xadvance;
        glyph
    }

    #[test]
    fn test_lookup_through_sparse_table() {
        let mut data = FontData::new();
        let a = data.set_glyph('A' as u32, glyph('A', 10, 12, 11));
        let han = data.set_glyph(0x4e00, glyph('\u{4e00}', 16, 16, 16));

        assert_eq!(data.glyph_id('A'), Some(a));
        assert_eq!(data.glyph_id('\u{4e00}'), Some(han));
        assert_eq!(data.glyph_id('B'), None);
        assert_eq!(data.glyph_id('\u{1f600}'), None);
        assert_eq!(data.get_glyph('A').map(|g| g.xadvance), Some(11));
    }

    #[test]
    fn test_has_glyph_with_missing_fallback() {
        let mut data = FontData::new();
        data.set_glyph('A' as u32, glyph('A', 10, 12, 11));
        assert!(!data.has_glyph('Z'));

        data.set_missing_glyph(glyph('\0', 8, 8, 9));
        assert!(data.has_glyph('Z'));
        assert_eq!(data.glyph_id('Z'), None);
    }

    #[test]
    fn test_glyph_ids_in_code_point_order() {
        let mut data = FontData::new();
        data.set_glyph('b' as u32, glyph('b', 1, 1, 1));
        data.set_glyph(0x400, glyph('\u{400}', 1, 1, 1));
        data.set_glyph('a' as u32, glyph('a', 1, 1, 1));

        let ids: Vec<u32> = data.glyph_ids().map(|id| data.glyph(id).id).collect();
        assert_eq!(ids, vec!['a' as u32, 'b' as u32, 0x400]);
    }

    #[test]
    fn test_first_glyph_skips_empty() {
        let mut data = FontData::new();
        data.set_glyph(' ' as u32, glyph(' ', 0, 0, 5));
        data.set_glyph('b' as u32, glyph('b', 4, 4, 5));
        let first = data.first_glyph().unwrap();
        assert_eq!(data.glyph(first).id, 'b' as u32);

        assert!(matches!(FontData::new().first_glyph(), Err(FontError::NoGlyphs)));
    }

    #[test]
    fn test_set_scale_rejects_zero() {
        let mut data = FontData::new();
        data.line_height = 20.0;
        assert!(matches!(data.set_scale(0.0, 1.0), Err(FontError::InvalidArgument(_))));
        assert!(matches!(data.set_scale(1.0, 0.0), Err(FontError::InvalidArgument(_))));
        assert_eq!(data.line_height, 20.0);
        assert_eq!(data.scale_x(), 1.0);
    }

    #[test]
    fn test_set_scale_round_trip() {
        let mut data = FontData::new();
        data.line_height = 24.0;
        data.space_x_advance = 7.0;
        data.x_height = 9.0;
        data.cap_height = 14.0;
        data.ascent = 3.0;
        data.descent = -5.0;
        data.down = -24.0;
        data.pad_left = 1.0;
        data.pad_right = 2.0;
        data.pad_top = 3.0;
        data.pad_bottom = 4.0;

        data.set_scale(2.5, 2.5).unwrap();
        assert_relative_eq!(data.line_height, 60.0);
        assert_relative_eq!(data.pad_right, 5.0);

        data.set_scale(1.0, 1.0).unwrap();
        assert_relative_eq!(data.line_height, 24.0, epsilon = 1e-4);
        assert_relative_eq!(data.space_x_advance, 7.0, epsilon = 1e-4);
        assert_relative_eq!(data.x_height, 9.0, epsilon = 1e-4);
        assert_relative_eq!(data.cap_height, 14.0, epsilon = 1e-4);
        assert_relative_eq!(data.ascent, 3.0, epsilon = 1e-4);
        assert_relative_eq!(data.descent, -5.0, epsilon = 1e-4);
        assert_relative_eq!(data.down, -24.0, epsilon = 1e-4);
        assert_relative_eq!(data.pad_left, 1.0, epsilon = 1e-4);
        assert_relative_eq!(data.pad_top, 3.0, epsilon = 1e-4);
        assert_relative_eq!(data.pad_bottom, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_set_line_height_follows_flip() {
        let mut data = FontData::new();
        data.set_scale(2.0, 2.0).unwrap();
        data.set_line_height(10.0);
        assert_eq!(data.line_height, 20.0);
        assert_eq!(data.down, -20.0);

        data.flipped = true;
        data.set_line_height(10.0);
        assert_eq!(data.down, 20.0);
    }

    #[test]
    fn test_whitespace_and_break_chars() {
        let mut data = FontData::new();
        data.break_chars = vec!['-'];
        assert!(data.is_whitespace(' ' as u32));
        assert!(data.is_whitespace('\t' as u32));
        assert!(!data.is_whitespace('-' as u32));
        assert!(data.is_break_char('-' as u32));
        assert!(!data.is_break_char('a' as u32));
    }

    #[test]
    fn test_glyph_width_fixed_and_proportional() {
        let mut data = FontData::new();
        data.pad_right = 1.0;
        let mut g = glyph('a', 6, 8, 9);
        g.xoffset = 2;
        assert_eq!(data.glyph_width(&g), 7.0);
        g.fixed_width = true;
        assert_eq!(data.glyph_width(&g), 9.0);
    }

    #[test]
    fn test_glyph_region_unflipped() {
        let mut data = FontData::new();
        let mut g = glyph('A', 16, 32, 16);
        g.src_x = 32;
        g.src_y = 64;
        let id = data.set_glyph('A' as u32, g);
        let region = TextureRegion::from_texture(TextureHandle(0), 128, 128);
        data.set_glyph_region(id, &region);

        let g = data.glyph(id);
        assert_relative_eq!(g.u, 0.25);
        assert_relative_eq!(g.u2, 0.375);
        assert_relative_eq!(g.v2, 0.5);
        assert_relative_eq!(g.v, 0.75);
        assert!(g.u2 > g.u);
        assert!(g.v > g.v2);
    }

    #[test]
    fn test_glyph_region_flipped() {
        let mut data = FontData::new();
        data.flipped = true;
        let mut g = glyph('A', 16, 32, 16);
        g.src_y = 64;
        let id = data.set_glyph('A' as u32, g);
        data.set_glyph_region(id, &TextureRegion::from_texture(TextureHandle(0), 128, 128));

        let g = data.glyph(id);
        assert_relative_eq!(g.v, 0.5);
        assert_relative_eq!(g.v2, 0.75);
    }

    #[test]
    fn test_glyph_region_in_sub_region() {
        let mut data = FontData::new();
        let mut g = glyph('A', 8, 8, 8);
        g.src_x = 8;
        let id = data.set_glyph('A' as u32, g);
        let region = TextureRegion::new(TextureHandle(0), 256, 256, 128, 0, 64, 64);
        data.set_glyph_region(id, &region);

        let g = data.glyph(id);
        assert_relative_eq!(g.u, 0.5 + 8.0 / 256.0);
        assert_relative_eq!(g.u2, 0.5 + 16.0 / 256.0);
    }

    #[test]
    fn test_glyph_region_clips_stripped_whitespace() {
        let mut data = FontData::new();
        let mut g = glyph('A', 10, 10, 10);
        g.src_x = 2;
        g.xoffset = 1;
        let id = data.set_glyph('A' as u32, g);

        // 5 px stripped from the left; region is 20 px wide after packing.
        let region = TextureRegion::new(TextureHandle(0), 64, 64, 0, 0, 20, 20).with_atlas_offsets(
            AtlasOffsets {
                offset_x: 5.0,
                offset_y: 0.0,
                original_height: 20.0,
                packed_height: 20.0,
            },
        );
        data.set_glyph_region(id, &region);

        let g = data.glyph(id);
        // x = 2 - 5 = -3: three columns were stripped.
        assert_eq!(g.width, 7);
        assert_eq!(g.xoffset, 4);
        assert_relative_eq!(g.u, 0.0);
        assert_relative_eq!(g.u2, 7.0 / 64.0);
    }

    #[test]
    fn test_glyph_region_clips_bottom_overflow() {
        let mut data = FontData::new();
        let mut g = glyph('A', 10, 10, 10);
        g.src_y = 12;
        g.yoffset = -10;
        let id = data.set_glyph('A' as u32, g);

        // original 24 high, packed 16, nothing stripped at the bottom: 8 px off the top.
        let region = TextureRegion::new(TextureHandle(0), 64, 64, 0, 0, 16, 16).with_atlas_offsets(
            AtlasOffsets {
                offset_x: 0.0,
                offset_y: 0.0,
                original_height: 24.0,
                packed_height: 16.0,
            },
        );
        data.set_glyph_region(id, &region);

        let g = data.glyph(id);
        // y = 12 - 8 = 4, y2 = 14: fits, nothing clipped.
        assert_eq!(g.height, 10);
        assert_relative_eq!(g.v2, 4.0 / 64.0);
        assert_relative_eq!(g.v, 14.0 / 64.0);
    }
}
