//! Text layout
//!
//! [`GlyphLayout`] converts a string into [`GlyphRun`]s: horizontal spans of
//! same-colored glyphs positioned relative to the layout's top-left baseline.
//! Runs are split at newlines and color tags, wrapped or truncated against a
//! target width, then aligned.

use std::mem;
use std::ops::Range;

use bitflags::bitflags;

use super::bitmap_font::BitmapFont;
use super::font_data::FontData;
use super::glyph::GlyphId;
use super::glyph_run::GlyphRun;
use super::markup::{parse_color_markup, ColorMarkup};
use crate::foundation::collections::{Pool, Poolable};
use crate::render::color::Color;

/// Tolerance when testing whether a glyph fits the target width
const EPSILON: f32 = 0.0001;

bitflags! {
    /// Alignment flags; layout reads the horizontal bits only
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Align: u8 {
        /// Centered on both axes unless another bit overrides
        const CENTER = 1 << 0;
        /// Top edge
        const TOP = 1 << 1;
        /// Bottom edge
        const BOTTOM = 1 << 2;
        /// Left edge
        const LEFT = 1 << 3;
        /// Right edge
        const RIGHT = 1 << 4;
        /// Top-left corner
        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        /// Top-right corner
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        /// Bottom-left corner
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        /// Bottom-right corner
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

impl Default for Align {
    fn default() -> Self {
        Self::LEFT
    }
}

/// Options for [`GlyphLayout::set_text_with`]
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Initial color, also the bottom of the markup color stack
    pub color: Color,
    /// Width used for wrapping, truncation and alignment
    pub target_width: f32,
    /// Horizontal alignment within `target_width`
    pub halign: Align,
    /// Break lines that exceed `target_width`
    pub wrap: bool,
    /// Cut the first overflowing line and append this suffix instead of wrapping
    pub truncate: Option<String>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            target_width: 0.0,
            halign: Align::LEFT,
            wrap: false,
            truncate: None,
        }
    }
}

impl LayoutParams {
    /// Default parameters: white, left aligned, unbounded
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial color
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the target width
    #[must_use]
    pub const fn with_target_width(mut self, target_width: f32) -> Self {
        self.target_width = target_width;
        self
    }

    /// Set the horizontal alignment
    #[must_use]
    pub const fn with_halign(mut self, halign: Align) -> Self {
        self.halign = halign;
        self
    }

    /// Enable or disable wrapping
    #[must_use]
    pub const fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Truncate with `suffix` (for example `"..."`)
    #[must_use]
    pub fn with_truncate(mut self, suffix: impl Into<String>) -> Self {
        self.truncate = Some(suffix.into());
        self
    }
}

/// Pen state carried between runs
#[derive(Debug, Default)]
struct Pen {
    x: f32,
    y: f32,
    last_glyph: Option<GlyphId>,
}

/// Resolved wrapping behaviour for one layout pass
struct Wrapping<'a> {
    enabled: bool,
    target_width: f32,
    truncate: Option<&'a [char]>,
}

/// Laid out text, ready to be added to a cache
#[derive(Debug, Default)]
pub struct GlyphLayout {
    runs: Vec<GlyphRun>,
    width: f32,
    height: f32,
    color_stack: Vec<Color>,
    run_pool: Pool<GlyphRun>,
    chars: Vec<char>,
}

impl GlyphLayout {
    /// Create an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout of `text` with default parameters
    pub fn with_text(font: &BitmapFont, text: &str) -> Self {
        let mut layout = Self::new();
        layout.set_text(font, text);
        layout
    }

    /// Lay out `text` in white, left aligned, without wrapping
    pub fn set_text(&mut self, font: &BitmapFont, text: &str) {
        self.set_text_with(font, text, &LayoutParams::default());
    }

    /// Lay out all of `text`
    pub fn set_text_with(&mut self, font: &BitmapFont, text: &str, params: &LayoutParams) {
        self.set_text_range(font, text, 0, usize::MAX, params);
    }

    /// Lay out the characters `start..end` of `text`
    ///
    /// Indices count `char`s, not bytes, and are clamped to the text length.
    /// Any previous content is discarded first.
    pub fn set_text_range(
        &mut self,
        font: &BitmapFont,
        text: &str,
        start: usize,
        end: usize,
        params: &LayoutParams,
    ) {
        let mut chars = mem::take(&mut self.chars);
        chars.clear();
        chars.extend(text.chars());
        let end = end.min(chars.len());
        let start = start.min(end);
        self.layout(font, &chars, start, end, params);
        self.chars = chars;
    }

    /// Runs in layout order
    pub fn runs(&self) -> &[GlyphRun] {
        &self.runs
    }

    /// Width of the widest line
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Cap height plus the distance to the last line's baseline
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Total glyphs across every run
    pub fn glyph_count(&self) -> usize {
        self.runs.iter().map(|run| run.glyphs.len()).sum()
    }

    /// Whether the layout produced no runs
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Remove all runs, returning them to the layout's pool
    pub fn clear(&mut self) {
        self.run_pool.free_all(self.runs.drain(..));
        self.color_stack.clear();
        self.width = 0.0;
        self.height = 0.0;
    }

    /// Replace this layout's content with a copy of `other`
    pub fn copy_from(&mut self, other: &Self) {
        self.clear();
        for source in &other.runs {
            let mut run = self.run_pool.obtain();
            run.glyphs.extend_from_slice(&source.glyphs);
            run.x_advances.extend_from_slice(&source.x_advances);
            run.x = source.x;
            run.y = source.y;
            run.width = source.width;
            run.color = source.color;
            self.runs.push(run);
        }
        self.width = other.width;
        self.height = other.height;
    }

    fn layout(
        &mut self,
        font: &BitmapFont,
        text: &[char],
        start: usize,
        end: usize,
        params: &LayoutParams,
    ) {
        self.clear();
        let data = font.data();
        if start == end {
            self.height = data.cap_height;
            return;
        }

        let suffix: Option<Vec<char>> = params.truncate.as_ref().map(|t| t.chars().collect());
        let wrapping = Wrapping {
            // Truncation reuses the wrap pass. A target this narrow would
            // only ever wrap one glyph per line.
            enabled: if suffix.is_some() {
                true
            } else if params.target_width <= data.space_x_advance * 3.0 {
                false
            } else {
                params.wrap
            },
            target_width: params.target_width,
            truncate: suffix.as_deref(),
        };

        let markup = data.markup_enabled;
        let mut color = params.color;
        let mut next_color = color;
        if markup {
            self.color_stack.push(color);
        }

        let mut pen = Pen::default();
        let mut run_start = start;
        let mut index = start;
        loop {
            let mut run_end = None;
            let mut newline = false;
            let mut last_run = false;

            if index == end {
                if run_start == end {
                    break;
                }
                run_end = Some(end);
                last_run = true;
            } else {
                let ch = text[index];
                index += 1;
                match ch {
                    '\n' => {
                        run_end = Some(index - 1);
                        newline = true;
                    }
                    '[' if markup => {
                        let tag_len =
                            match parse_color_markup(text, index, end, font.named_colors()) {
                                ColorMarkup::Push { color: tag_color, len } => {
                                    self.color_stack.push(tag_color);
                                    Some(len)
                                }
                                ColorMarkup::Pop => {
                                    if self.color_stack.len() > 1 {
                                        self.color_stack.pop();
                                    }
                                    Some(0)
                                }
                                ColorMarkup::Escape => {
                                    index += 1;
                                    continue;
                                }
                                ColorMarkup::Invalid => None,
                            };
                        if let Some(len) = tag_len {
                            run_end = Some(index - 1);
                            index += len + 1;
                            last_run = index == end;
                            next_color = self.color_stack.last().copied().unwrap_or(color);
                        }
                    }
                    _ => {}
                }
            }

            let Some(run_end) = run_end else {
                continue;
            };

            if run_end != run_start {
                let ends_line = newline || last_run;
                let truncated = self.emit_run(
                    font,
                    text,
                    run_start..run_end,
                    color,
                    ends_line,
                    &wrapping,
                    &mut pen,
                );
                if truncated {
                    break;
                }
            }

            if newline {
                pen.y += if run_end == run_start {
                    data.down * data.blank_line_scale
                } else {
                    data.down
                };
                pen.x = 0.0;
                pen.last_glyph = None;
            }
            run_start = index;
            color = next_color;
        }

        self.height = data.cap_height + pen.y.abs();
        self.calculate_widths(data);
        self.align_runs(params.target_width, params.halign);
        self.color_stack.clear();

        log::trace!(
            "Laid out {} glyphs in {} runs ({}x{}), run pool peak {}",
            self.glyph_count(),
            self.runs.len(),
            self.width,
            self.height,
            self.run_pool.peak()
        );
    }

    /// Shape one run and place it, wrapping or truncating as needed
    ///
    /// Returns `true` when the run was truncated and layout must stop.
    fn emit_run(
        &mut self,
        font: &BitmapFont,
        text: &[char],
        range: Range<usize>,
        color: Color,
        ends_line: bool,
        wrapping: &Wrapping<'_>,
        pen: &mut Pen,
    ) -> bool {
        let data = font.data();
        let source = font.glyph_source();

        let mut run = self.run_pool.obtain();
        run.color = color;
        source.shape(data, &mut run, text, range.start, range.end, pen.last_glyph);
        if run.is_empty() {
            self.run_pool.free(run);
            return false;
        }

        // Back up over the drawn width the previous run ended with.
        if let Some(last) = pen.last_glyph {
            pen.x -= data.glyph_width(data.glyph(last));
        }
        pen.last_glyph = run.glyphs.last().copied();
        run.x = pen.x;
        run.y = pen.y;
        if ends_line {
            adjust_last_glyph(data, &mut run);
        }

        if !wrapping.enabled {
            let width = run.advance_sum();
            pen.x += width;
            run.width = width;
            self.runs.push(run);
            return false;
        }

        let lead = run.x_advances[0] + run.x_advances[1];
        pen.x += lead;
        run.width = lead;
        let mut i = 2;
        while i < run.x_advances.len() {
            let glyph = data.glyph(run.glyphs[i - 1]);
            let glyph_width = (glyph.width + glyph.xoffset) as f32 * data.scale_x() - data.pad_right;
            if pen.x + glyph_width - EPSILON <= wrapping.target_width {
                pen.x += run.x_advances[i];
                run.width += run.x_advances[i];
                i += 1;
                continue;
            }

            if let Some(suffix) = wrapping.truncate {
                self.truncate(font, &mut run, wrapping.target_width, suffix);
                self.push_or_free(run);
                return true;
            }

            pen.y += data.down;
            pen.last_glyph = None;
            let mut wrap_index = source.wrap_index(data, &run.glyphs, i);
            // At least one glyph per line, and at least the glyph that overflowed
            // moves. A word wider than the target is split.
            if (wrap_index == 0 && run.x == 0.0) || wrap_index >= run.glyphs.len() {
                wrap_index = i - 1;
            }
            let next = self.wrap(data, &mut run, wrap_index);
            self.push_or_free(run);
            let Some(mut next) = next else {
                // Only whitespace overflowed; the line still ends here.
                pen.x = 0.0;
                return false;
            };

            next.x = 0.0;
            next.y = pen.y;
            run = next;

            let lead = run.x_advances[0] + run.x_advances[1];
            pen.x = lead;
            run.width = lead;
            i = 2;
        }

        self.runs.push(run);
        false
    }

    fn push_or_free(&mut self, run: GlyphRun) {
        if run.is_empty() {
            self.run_pool.free(run);
        } else {
            self.runs.push(run);
        }
    }

    /// Split `first` at `wrap_index`, trimming whitespace on both sides
    ///
    /// The glyphs after the break move to the returned run by swapping
    /// buffers; `first` keeps a copy of the glyphs before it. `first` is left
    /// empty when nothing but whitespace precedes the break.
    fn wrap(&mut self, data: &FontData, first: &mut GlyphRun, wrap_index: usize) -> Option<GlyphRun> {
        let count = first.glyphs.len();
        let is_whitespace = |id: GlyphId| data.is_whitespace(data.glyph(id).id);

        let mut first_end = wrap_index;
        while first_end > 0 && is_whitespace(first.glyphs[first_end - 1]) {
            first_end -= 1;
        }
        let mut second_start = wrap_index;
        while second_start < count && is_whitespace(first.glyphs[second_start]) {
            second_start += 1;
        }

        let second = if second_start < count {
            let mut second = self.run_pool.obtain();
            second.color = first.color;

            second.glyphs.extend_from_slice(&first.glyphs[..first_end]);
            second.x_advances.extend_from_slice(&first.x_advances[..=first_end]);
            mem::swap(&mut first.glyphs, &mut second.glyphs);
            mem::swap(&mut first.x_advances, &mut second.x_advances);

            second.glyphs.drain(..second_start);
            // Entry 0 stays and is rewritten as the new line's lead-in.
            second.x_advances.drain(1..=second_start);
            let head = data.glyph(second.glyphs[0]);
            second.x_advances[0] = -head.xoffset as f32 * data.scale_x() - data.pad_left;
            Some(second)
        } else {
            first.glyphs.truncate(first_end);
            first.x_advances.truncate(first_end + 1);
            None
        };

        if first_end > 0 {
            adjust_last_glyph(data, first);
        }
        second
    }

    /// Cut `run` so it and `suffix` fit `target_width`, then append `suffix`
    fn truncate(&mut self, font: &BitmapFont, run: &mut GlyphRun, target_width: f32, suffix: &[char]) {
        let data = font.data();

        let mut tail = self.run_pool.obtain();
        font.glyph_source()
            .shape(data, &mut tail, suffix, 0, suffix.len(), None);
        let mut tail_width = 0.0;
        if !tail.x_advances.is_empty() {
            adjust_last_glyph(data, &mut tail);
            // Skip the lead-in for tight bounds.
            tail_width = tail.x_advances[1..].iter().sum();
        }
        let target_width = target_width - tail_width;

        let mut count = 0;
        let mut width = run.x;
        while count < run.x_advances.len() {
            width += run.x_advances[count];
            if width > target_width {
                break;
            }
            count += 1;
        }

        if count > 1 {
            run.glyphs.truncate(count - 1);
            run.x_advances.truncate(count);
            adjust_last_glyph(data, run);
            if !tail.x_advances.is_empty() {
                run.x_advances.extend_from_slice(&tail.x_advances[1..]);
            }
        } else {
            run.glyphs.clear();
            run.x_advances.clear();
            run.x_advances.extend_from_slice(&tail.x_advances);
        }
        run.glyphs.extend_from_slice(&tail.glyphs);
        self.run_pool.free(tail);
    }

    fn calculate_widths(&mut self, data: &FontData) {
        let mut width = 0.0f32;
        for run in &mut self.runs {
            let mut run_width = run.x + run.x_advances[0];
            let mut max = 0.0f32;
            for (i, &id) in run.glyphs.iter().enumerate() {
                // A glyph can extend past the right edge of the glyphs after it.
                max = max.max(run_width + data.glyph_width(data.glyph(id)));
                run_width += run.x_advances[i + 1];
            }
            run.width = run_width.max(max) - run.x;
            width = width.max(run.x + run.width);
        }
        self.width = width;
    }

    fn align_runs(&mut self, target_width: f32, halign: Align) {
        if halign.contains(Align::LEFT) {
            return;
        }
        let center = halign.contains(Align::CENTER);
        let shift_for = |line_width: f32| {
            let shift = target_width - line_width;
            if center {
                shift / 2.0
            } else {
                shift
            }
        };

        let mut line_width = 0.0f32;
        let mut line_y = f32::MIN;
        let mut line_start = 0;
        for i in 0..self.runs.len() {
            let (y, right) = (self.runs[i].y, self.runs[i].x + self.runs[i].width);
            if y == line_y {
                line_width = line_width.max(right);
                continue;
            }
            line_y = y;
            let shift = shift_for(line_width);
            for run in &mut self.runs[line_start..i] {
                run.x += shift;
            }
            line_start = i;
            line_width = right;
        }
        let shift = shift_for(line_width);
        for run in &mut self.runs[line_start..] {
            run.x += shift;
        }
    }
}

impl Poolable for GlyphLayout {
    fn reset(&mut self) {
        self.clear();
    }
}

/// Replace a line-ending glyph's advance with its drawn width
fn adjust_last_glyph(data: &FontData, run: &mut GlyphRun) {
    let Some(&last) = run.glyphs.last() else {
        return;
    };
    let glyph = data.glyph(last);
    if glyph.fixed_width {
        return;
    }
    let width = (glyph.width + glyph.xoffset) as f32 * data.scale_x() - data.pad_right;
    if let Some(advance) = run.x_advances.last_mut() {
        run.width += width - *advance;
        *advance = width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::tests::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_align_default_is_left() {
        assert_eq!(Align::default(), Align::LEFT);
        assert!(Align::TOP_RIGHT.contains(Align::RIGHT));
        assert!(!Align::TOP_RIGHT.contains(Align::LEFT));
    }

    #[test]
    fn test_params_builder() {
        let params = LayoutParams::new()
            .with_color(Color::BLACK)
            .with_target_width(100.0)
            .with_halign(Align::CENTER)
            .with_wrap(true)
            .with_truncate("...");
        assert_eq!(params.color, Color::BLACK);
        assert_eq!(params.target_width, 100.0);
        assert_eq!(params.halign, Align::CENTER);
        assert!(params.wrap);
        assert_eq!(params.truncate.as_deref(), Some("..."));
    }

    #[test]
    fn test_single_run() {
        let font = fixtures::font();
        let layout = GlyphLayout::with_text(&font, "A B");

        assert_eq!(layout.runs().len(), 1);
        let run = &layout.runs()[0];
        assert_eq!(run.glyphs.len(), 3);
        assert_eq!(run.x_advances, vec![-1.0, 12.0, 6.0, 11.0]);
        assert_relative_eq!(run.x, 0.0);
        assert_relative_eq!(run.y, 0.0);
        // -1 + 12 + 6 + 11
        assert_relative_eq!(layout.width(), 28.0);
        assert_relative_eq!(layout.height(), font.cap_height());
    }

    #[test]
    fn test_newline_moves_down() {
        let font = fixtures::font();
        let layout = GlyphLayout::with_text(&font, "ab\ncd");

        assert_eq!(layout.runs().len(), 2);
        assert_relative_eq!(layout.runs()[1].y, font.data().down);
        assert_relative_eq!(layout.runs()[1].x, 0.0);
        assert_relative_eq!(layout.height(), font.cap_height() + font.line_height());
    }

    #[test]
    fn test_blank_line_scale() {
        let mut font = fixtures::font();
        font.data_mut().blank_line_scale = 0.5;
        let layout = GlyphLayout::with_text(&font, "a\n\nb");

        assert_eq!(layout.runs().len(), 2);
        // one full line plus one half-height blank line
        assert_relative_eq!(layout.runs()[1].y, -16.0 - 8.0);
    }

    #[test]
    fn test_clear_recycles_runs() {
        let font = fixtures::font();
        let mut layout = GlyphLayout::with_text(&font, "a\nb\nc");
        assert_eq!(layout.runs().len(), 3);

        layout.clear();
        assert!(layout.is_empty());
        assert_eq!(layout.width(), 0.0);
        assert_eq!(layout.run_pool.free_count(), 3);

        // laying out again reuses them
        layout.set_text(&font, "a\nb");
        assert_eq!(layout.run_pool.free_count(), 1);
        assert_eq!(layout.run_pool.peak(), 3);
    }

    #[test]
    fn test_copy_from() {
        let font = fixtures::font();
        let source = GlyphLayout::with_text(&font, "ab\ncd");
        let mut copy = GlyphLayout::new();
        copy.copy_from(&source);

        assert_eq!(copy.runs().len(), 2);
        assert_eq!(copy.glyph_count(), 4);
        assert_relative_eq!(copy.width(), source.width());
        assert_relative_eq!(copy.runs()[1].y, source.runs()[1].y);
    }

    #[test]
    fn test_range_clamped() {
        let font = fixtures::font();
        let mut layout = GlyphLayout::new();
        layout.set_text_range(&font, "abc", 1, 99, &LayoutParams::default());
        assert_eq!(layout.glyph_count(), 2);

        layout.set_text_range(&font, "abc", 5, 9, &LayoutParams::default());
        assert!(layout.is_empty());
        assert_relative_eq!(layout.height(), font.cap_height());
    }
}
