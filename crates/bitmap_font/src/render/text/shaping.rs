//! Glyph shaping and wrap point search
//!
//! Shaping turns a slice of characters into glyph ids plus the pen advances
//! between them. Fonts delegate to a [`GlyphSource`] so callers can swap in
//! their own character lookup (for example, to generate glyphs on demand)
//! without touching the layout engine.

use std::fmt;

use super::font_data::FontData;
use super::glyph::GlyphId;
use super::glyph_run::GlyphRun;

/// Character-to-glyph strategy used by layout
pub trait GlyphSource: fmt::Debug + Send + Sync {
    /// Glyph drawn for `ch`, if any
    fn glyph(&self, data: &FontData, ch: char) -> Option<GlyphId> {
        data.glyph_id(ch)
    }

    /// Append glyphs and advances for `text[start..end]` to `run`
    ///
    /// `last` is the glyph preceding the range on the same line; its advance
    /// and kerning position the first new glyph. Carriage returns are
    /// skipped, undefined characters use the missing glyph (or are dropped
    /// without one), and with markup enabled `[[` yields a single `[`. The
    /// final advance pushed is the drawn width of the last glyph.
    fn shape(
        &self,
        data: &FontData,
        run: &mut GlyphRun,
        text: &[char],
        start: usize,
        end: usize,
        last: Option<GlyphId>,
    ) {
        if start >= end {
            return;
        }
        let scale_x = data.scale_x();
        let mut last = last;

        run.glyphs.reserve(end - start);
        run.x_advances.reserve(end - start + 1);

        let mut i = start;
        while i < end {
            let ch = text[i];
            i += 1;
            if ch == '\r' {
                continue;
            }
            let Some(id) = self.glyph(data, ch).or_else(|| data.missing_glyph()) else {
                continue;
            };
            let glyph = data.glyph(id);

            run.glyphs.push(id);
            let advance = match last {
                // First glyph on the line must not draw left of the origin.
                None if glyph.fixed_width => 0.0,
                None => -glyph.xoffset as f32 * scale_x - data.pad_left,
                Some(prev) => {
                    let prev = data.glyph(prev);
                    (prev.xadvance + prev.kerning(ch)) as f32 * scale_x
                }
            };
            run.x_advances.push(advance);
            last = Some(id);

            if data.markup_enabled && ch == '[' && i < end && text[i] == '[' {
                i += 1;
            }
        }

        if let Some(last) = last {
            run.x_advances.push(data.glyph_width(data.glyph(last)));
        }
    }

    /// Index at which a line overflowing before `glyphs[start]` should break
    fn wrap_index(&self, data: &FontData, glyphs: &[GlyphId], start: usize) -> usize {
        get_wrap_index(data, glyphs, start)
    }
}

/// Glyph source that reads straight from the font's glyph table
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGlyphSource;

impl GlyphSource for DefaultGlyphSource {}

/// Shape `text[start..end]` into `run` using the font's own glyph table
pub fn get_glyphs(
    data: &FontData,
    run: &mut GlyphRun,
    text: &[char],
    start: usize,
    end: usize,
    last: Option<GlyphId>,
) {
    DefaultGlyphSource.shape(data, run, text, start, end, last);
}

/// Scan backward from `start - 1` for a line break opportunity
///
/// Returns the index of the glyph that should begin the next line: the
/// whitespace glyph itself when `glyphs[start - 1]` is whitespace, otherwise
/// the glyph following the nearest whitespace or break character. Returns 0
/// when the run has no break opportunity.
pub fn get_wrap_index(data: &FontData, glyphs: &[GlyphId], start: usize) -> usize {
    if start == 0 || start > glyphs.len() {
        return 0;
    }
    let code = |i: usize| data.glyph(glyphs[i]).id;

    let mut i = start - 1;
    if data.is_whitespace(code(i)) {
        return i;
    }
    if data.is_break_char(code(i)) {
        if i == 0 {
            return 0;
        }
        i -= 1;
    }
    while i > 0 {
        let ch = code(i);
        if data.is_whitespace(ch) || data.is_break_char(ch) {
            return i + 1;
        }
        i -= 1;
    }
    0
}
