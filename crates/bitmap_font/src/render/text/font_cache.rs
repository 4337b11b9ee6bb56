//! Cached glyph geometry
//!
//! [`BitmapFontCache`] turns laid out text into one vertex array per texture
//! page. Drawing re-submits those arrays without touching layout, so static
//! text costs one batch call per page per frame. Moving, recoloring and
//! fading edit the cached vertices in place.
//!
//! Each glyph is a quad of four stride-5 vertices, corner order
//! `(x, y) (x, y2) (x2, y2) (x2, y)`. For multi-page fonts every page also
//! records which layout-order glyph index each of its quads came from, so
//! ranged operations can find a glyph regardless of its page.

use std::sync::Arc;

use super::bitmap_font::BitmapFont;
use super::glyph::Glyph;
use super::glyph_layout::{GlyphLayout, LayoutParams};
use crate::foundation::collections::Pool;
use crate::foundation::math::utils::round_half_up;
use crate::foundation::math::Vec2;
use crate::render::batch::{GlyphBatch, GlyphVertex, GLYPH_SIZE, VERTEX_SIZE};
use crate::render::color::{float_to_int_color, int_to_float_color, Color};

/// Offset of the color component within a vertex
const COLOR_OFFSET: usize = 2;

/// Per-page vertex arrays for a font's laid out text
#[derive(Debug)]
pub struct BitmapFontCache {
    font: Arc<BitmapFont>,
    integer: bool,
    layouts: Vec<GlyphLayout>,
    layout_pool: Pool<GlyphLayout>,
    x: f32,
    y: f32,
    color: Color,
    current_tint: f32,
    page_vertices: Vec<Vec<f32>>,
    /// Live float count of each page
    idx: Vec<usize>,
    /// Layout-order glyph index of each quad, multi-page fonts only
    page_glyph_indices: Option<Vec<Vec<usize>>>,
    glyph_count: usize,
    temp_glyph_count: Vec<usize>,
}

impl BitmapFontCache {
    /// Create a cache using the font's integer-position setting
    pub fn new(font: Arc<BitmapFont>) -> Self {
        let integer = font.uses_integer_positions();
        Self::with_integer_positions(font, integer)
    }

    /// Create a cache, choosing whether glyph positions are rounded
    pub fn with_integer_positions(font: Arc<BitmapFont>, integer: bool) -> Self {
        let pages = font.regions().len();
        Self {
            font,
            integer,
            layouts: Vec::new(),
            layout_pool: Pool::new(),
            x: 0.0,
            y: 0.0,
            color: Color::WHITE,
            current_tint: Color::WHITE.to_float_bits(),
            page_vertices: vec![Vec::new(); pages],
            idx: vec![0; pages],
            page_glyph_indices: (pages > 1).then(|| vec![Vec::new(); pages]),
            glyph_count: 0,
            temp_glyph_count: vec![0; pages],
        }
    }

    /// Font the cache draws with
    pub fn font(&self) -> &Arc<BitmapFont> {
        &self.font
    }

    /// Whether glyph positions and translations are rounded
    pub fn uses_integer_positions(&self) -> bool {
        self.integer
    }

    /// Round positions of glyphs added from now on
    pub fn set_use_integer_positions(&mut self, integer: bool) {
        self.integer = integer;
    }

    /// Accumulated translation
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Accumulated x translation
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Accumulated y translation
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Color used for text added without explicit parameters
    pub fn color(&self) -> Color {
        self.color
    }

    /// Set the color for text added later; cached glyphs keep theirs
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Layouts currently cached, in insertion order
    pub fn layouts(&self) -> &[GlyphLayout] {
        &self.layouts
    }

    /// Number of texture pages
    pub fn page_count(&self) -> usize {
        self.page_vertices.len()
    }

    /// Live vertex floats of `page`
    pub fn vertices(&self, page: usize) -> &[f32] {
        match self.page_vertices.get(page) {
            Some(vertices) => &vertices[..self.idx[page]],
            None => &[],
        }
    }

    /// Number of live vertex floats on `page`
    pub fn vertex_count(&self, page: usize) -> usize {
        self.idx.get(page).copied().unwrap_or(0)
    }

    /// Live vertices of `page` as structs
    pub fn glyph_vertices(&self, page: usize) -> &[GlyphVertex] {
        bytemuck::cast_slice(self.vertices(page))
    }

    /// Glyph quads across every page
    pub fn glyph_count(&self) -> usize {
        self.idx.iter().sum::<usize>() / GLYPH_SIZE
    }

    /// Move to an absolute position
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.translate(x - self.x, y - self.y);
    }

    /// Move every cached glyph
    pub fn translate(&mut self, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let (dx, dy) = if self.integer {
            (round_half_up(dx), round_half_up(dy))
        } else {
            (dx, dy)
        };
        self.x += dx;
        self.y += dy;

        for (vertices, &idx) in self.page_vertices.iter_mut().zip(&self.idx) {
            for vertex in vertices[..idx].chunks_exact_mut(VERTEX_SIZE) {
                vertex[0] += dx;
                vertex[1] += dy;
            }
        }
    }

    /// Recolor every glyph to its run color multiplied by `tint`
    ///
    /// Does nothing when `tint` packs to the tint already applied.
    pub fn tint(&mut self, tint: Color) {
        let new_tint = tint.to_float_bits();
        if self.current_tint.to_bits() == new_tint.to_bits() {
            return;
        }
        self.current_tint = new_tint;

        let data = self.font.data();
        self.temp_glyph_count.fill(0);
        for layout in &self.layouts {
            for run in layout.runs() {
                let color = run.color.mul(tint).to_float_bits();
                for &id in &run.glyphs {
                    let page = data.glyph(id).page;
                    let offset = self.temp_glyph_count[page] * GLYPH_SIZE + COLOR_OFFSET;
                    self.temp_glyph_count[page] += 1;
                    let vertices = &mut self.page_vertices[page];
                    for corner in (0..GLYPH_SIZE).step_by(VERTEX_SIZE) {
                        vertices[offset + corner] = color;
                    }
                }
            }
        }
    }

    /// Set every cached vertex to `color`
    pub fn set_colors(&mut self, color: Color) {
        self.set_colors_packed(color.to_float_bits());
    }

    /// Set every cached vertex to a packed color
    pub fn set_colors_packed(&mut self, color: f32) {
        for (vertices, &idx) in self.page_vertices.iter_mut().zip(&self.idx) {
            for vertex in vertices[..idx].chunks_exact_mut(VERTEX_SIZE) {
                vertex[COLOR_OFFSET] = color;
            }
        }
    }

    /// Color glyphs `start..end`, counted in layout order across all layouts
    pub fn set_colors_range(&mut self, color: Color, start: usize, end: usize) {
        let color = color.to_float_bits();

        let Some(page_glyph_indices) = &self.page_glyph_indices else {
            if let Some(vertices) = self.page_vertices.first_mut() {
                let limit = end.saturating_mul(GLYPH_SIZE).min(self.idx[0]);
                let mut i = start.saturating_mul(GLYPH_SIZE).saturating_add(COLOR_OFFSET);
                while i < limit {
                    vertices[i] = color;
                    i += VERTEX_SIZE;
                }
            }
            return;
        };

        for (vertices, glyph_indices) in self.page_vertices.iter_mut().zip(page_glyph_indices) {
            for (quad, &glyph_index) in glyph_indices.iter().enumerate() {
                if glyph_index >= end {
                    break;
                }
                if glyph_index >= start {
                    let offset = quad * GLYPH_SIZE + COLOR_OFFSET;
                    for corner in (0..GLYPH_SIZE).step_by(VERTEX_SIZE) {
                        vertices[offset + corner] = color;
                    }
                }
            }
        }
    }

    /// Replace the alpha of every cached vertex, keeping its RGB
    pub fn set_alphas(&mut self, alpha: f32) {
        let alpha_bits = ((254.0 * alpha) as u32) << 24;
        let mut prev: Option<u32> = None;
        let mut new_color = 0.0f32;

        for (vertices, &idx) in self.page_vertices.iter_mut().zip(&self.idx) {
            for vertex in vertices[..idx].chunks_exact_mut(VERTEX_SIZE) {
                let color = vertex[COLOR_OFFSET];
                // Runs share colors, so consecutive vertices mostly repeat.
                if prev != Some(color.to_bits()) {
                    prev = Some(color.to_bits());
                    let rgba = (float_to_int_color(color) & 0x00ff_ffff) | alpha_bits;
                    new_color = int_to_float_color(rgba);
                }
                vertex[COLOR_OFFSET] = new_color;
            }
        }
    }

    /// Submit every non-empty page
    pub fn draw(&self, batch: &mut dyn GlyphBatch) {
        for (page, vertices) in self.page_vertices.iter().enumerate() {
            let idx = self.idx[page];
            if idx == 0 {
                continue;
            }
            if let Some(region) = self.font.region(page) {
                batch.draw(region.texture, vertices, 0, idx);
            }
        }
    }

    /// Submit glyphs `start..end`, counted in layout order
    pub fn draw_range(&self, batch: &mut dyn GlyphBatch, start: usize, end: usize) {
        let Some(page_glyph_indices) = &self.page_glyph_indices else {
            let (Some(vertices), Some(region)) = (self.page_vertices.first(), self.font.region(0))
            else {
                return;
            };
            let offset = start.saturating_mul(GLYPH_SIZE).min(self.idx[0]);
            let limit = end.saturating_mul(GLYPH_SIZE).min(self.idx[0]);
            if limit > offset {
                batch.draw(region.texture, vertices, offset, limit - offset);
            }
            return;
        };

        for (page, glyph_indices) in page_glyph_indices.iter().enumerate() {
            let mut first = None;
            let mut count = 0;
            for (quad, &glyph_index) in glyph_indices.iter().enumerate() {
                if glyph_index >= end {
                    break;
                }
                if glyph_index >= start {
                    first.get_or_insert(quad);
                    count += 1;
                }
            }
            let Some(first) = first else {
                continue;
            };
            if let Some(region) = self.font.region(page) {
                batch.draw(
                    region.texture,
                    &self.page_vertices[page],
                    first * GLYPH_SIZE,
                    count * GLYPH_SIZE,
                );
            }
        }
    }

    /// Draw with the cache color's alpha scaled by `alpha`
    ///
    /// Vertices are recolored to the cache color before and after drawing,
    /// so per-run colors are flattened unless `alpha` is 1.
    pub fn draw_with_alpha(&mut self, batch: &mut dyn GlyphBatch, alpha: f32) {
        if alpha == 1.0 {
            self.draw(batch);
            return;
        }
        let color = self.color;
        self.set_colors(color.with_alpha(color.a * alpha));
        self.draw(batch);
        self.set_colors(color);
    }

    /// Drop all cached glyphs and layouts and reset the position
    pub fn clear(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.layout_pool.free_all(self.layouts.drain(..));
        self.idx.fill(0);
        if let Some(page_glyph_indices) = &mut self.page_glyph_indices {
            page_glyph_indices.iter_mut().for_each(Vec::clear);
        }
        self.glyph_count = 0;
    }

    /// Clear, then cache `text` with the top-left at `(x, y)`
    pub fn set_text(&mut self, text: &str, x: f32, y: f32) -> &GlyphLayout {
        self.clear();
        self.add_text(text, x, y)
    }

    /// Clear, then cache `text` laid out with `params`
    pub fn set_text_with(&mut self, text: &str, x: f32, y: f32, params: &LayoutParams) -> &GlyphLayout {
        self.clear();
        self.add_text_with(text, x, y, params)
    }

    /// Cache `text` in the cache color, left aligned, without wrapping
    pub fn add_text(&mut self, text: &str, x: f32, y: f32) -> &GlyphLayout {
        let params = LayoutParams::new().with_color(self.color);
        self.add_text_with(text, x, y, &params)
    }

    /// Cache `text` laid out with `params`
    pub fn add_text_with(&mut self, text: &str, x: f32, y: f32, params: &LayoutParams) -> &GlyphLayout {
        self.add_text_range(text, x, y, 0, usize::MAX, params)
    }

    /// Cache characters `start..end` of `text` laid out with `params`
    pub fn add_text_range(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        start: usize,
        end: usize,
        params: &LayoutParams,
    ) -> &GlyphLayout {
        let mut layout = self.layout_pool.obtain();
        layout.set_text_range(&self.font, text, start, end, params);
        self.add_to_cache(layout, x, y + self.font.ascent())
    }

    /// Clear, then cache a copy of `layout`
    pub fn set_layout(&mut self, layout: &GlyphLayout, x: f32, y: f32) {
        self.clear();
        self.add_layout(layout, x, y);
    }

    /// Cache a copy of `layout`, which must have been laid out with this
    /// cache's font
    pub fn add_layout(&mut self, layout: &GlyphLayout, x: f32, y: f32) {
        let mut copy = self.layout_pool.obtain();
        copy.copy_from(layout);
        self.add_to_cache(copy, x, y + self.font.ascent());
    }

    fn add_to_cache(&mut self, layout: GlyphLayout, x: f32, y: f32) -> &GlyphLayout {
        if !layout.is_empty() {
            let font = Arc::clone(&self.font);
            let data = font.data();
            self.require_glyphs(&layout);

            for run in layout.runs() {
                let color = run.color.to_float_bits();
                let mut gx = x + run.x;
                let gy = y + run.y;
                for (&id, &advance) in run.glyphs.iter().zip(&run.x_advances) {
                    gx += advance;
                    self.add_glyph(data.glyph(id), gx, gy, color, data.scale_x(), data.scale_y());
                }
            }
            // Cached glyphs changed, so no tint is applied anymore.
            self.current_tint = Color::WHITE.to_float_bits();
        }

        self.layouts.push(layout);
        &self.layouts[self.layouts.len() - 1]
    }

    fn require_glyphs(&mut self, layout: &GlyphLayout) {
        if self.page_vertices.len() == 1 {
            self.require_page_glyphs(0, layout.glyph_count());
            return;
        }

        let data = self.font.data();
        self.temp_glyph_count.fill(0);
        for run in layout.runs() {
            for &id in &run.glyphs {
                self.temp_glyph_count[data.glyph(id).page] += 1;
            }
        }
        for page in 0..self.temp_glyph_count.len() {
            self.require_page_glyphs(page, self.temp_glyph_count[page]);
        }
    }

    /// Make room for `glyph_count` more quads on `page`
    fn require_page_glyphs(&mut self, page: usize, glyph_count: usize) {
        if let Some(page_glyph_indices) = &mut self.page_glyph_indices {
            page_glyph_indices[page].reserve(glyph_count);
        }

        let idx = self.idx[page];
        let needed = idx + glyph_count * GLYPH_SIZE;
        let vertices = &mut self.page_vertices[page];
        if vertices.len() < needed {
            log::debug!("Growing page {page} vertex array to {needed} floats");
            // Only the live prefix is worth keeping.
            vertices.truncate(idx);
            vertices.resize(needed, 0.0);
        }
    }

    fn add_glyph(&mut self, glyph: &Glyph, x: f32, y: f32, color: f32, scale_x: f32, scale_y: f32) {
        let mut x = x + glyph.xoffset as f32 * scale_x;
        let mut y = y + glyph.yoffset as f32 * scale_y;
        let mut width = glyph.width as f32 * scale_x;
        let mut height = glyph.height as f32 * scale_y;
        if self.integer {
            x = round_half_up(x);
            y = round_half_up(y);
            width = round_half_up(width);
            height = round_half_up(height);
        }
        let x2 = x + width;
        let y2 = y + height;
        let (u, v, u2, v2) = (glyph.u, glyph.v, glyph.u2, glyph.v2);

        let page = glyph.page;
        let idx = self.idx[page];
        self.idx[page] += GLYPH_SIZE;
        if let Some(page_glyph_indices) = &mut self.page_glyph_indices {
            page_glyph_indices[page].push(self.glyph_count);
            self.glyph_count += 1;
        }

        self.page_vertices[page][idx..idx + GLYPH_SIZE].copy_from_slice(&[
            x, y, color, u, v, //
            x, y2, color, u, v2, //
            x2, y2, color, u2, v2, //
            x2, y, color, u2, v,
        ]);
    }
}
