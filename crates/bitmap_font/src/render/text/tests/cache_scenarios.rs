use approx::assert_relative_eq;

use super::fixtures;
use crate::render::batch::{BatchRecorder, GLYPH_SIZE};
use crate::render::color::Color;
use crate::render::text::{Align, BitmapFontCache, LayoutParams};
use crate::render::texture::TextureHandle;

fn quad_colors(cache: &BitmapFontCache, page: usize) -> Vec<u32> {
    cache
        .glyph_vertices(page)
        .chunks(4)
        .map(|quad| quad[0].color.to_bits())
        .collect()
}

#[test]
fn test_text_to_draw_call() {
    let mut cache = BitmapFontCache::new(fixtures::shared(fixtures::font()));
    let layout = cache.set_text("A B", 10.0, 20.0);
    assert_relative_eq!(layout.width(), 28.0);

    // A, space and B each get a quad
    assert_eq!(cache.glyph_count(), 3);
    let quads = cache.glyph_vertices(0);
    // baseline at y + ascent, A sits 12 tall on it
    assert_relative_eq!(quads[0].x, 10.0);
    assert_relative_eq!(quads[0].y, 8.0);
    assert_relative_eq!(quads[2].x, 20.0);
    assert_relative_eq!(quads[2].y, 20.0);
    // B: pen 10 - 1 + 12 + 6, plus its xoffset of 2
    assert_relative_eq!(quads[8].x, 29.0);
    assert_relative_eq!(quads[10].x, 38.0);

    let mut batch = BatchRecorder::new();
    cache.draw(&mut batch);
    assert_eq!(batch.calls().len(), 1);
    assert_eq!(batch.calls()[0].texture, TextureHandle(1));
    assert_eq!(batch.calls()[0].count, 3 * GLYPH_SIZE);
    assert_eq!(batch.calls()[0].vertices, cache.vertices(0));
}

#[test]
fn test_markup_colors_reach_vertices() {
    let mut cache = BitmapFontCache::new(fixtures::shared(fixtures::markup_font()));
    cache.set_text("[RED]a[]b", 0.0, 0.0);

    let red = Color::new(1.0, 0.0, 0.0, 1.0).to_float_bits().to_bits();
    let white = Color::WHITE.to_float_bits().to_bits();
    assert_eq!(quad_colors(&cache, 0), [red, white]);
}

#[test]
fn test_wrapped_centered_text() {
    let mut cache = BitmapFontCache::new(fixtures::shared(fixtures::font()));
    let params = LayoutParams::new()
        .with_target_width(40.0)
        .with_halign(Align::CENTER)
        .with_wrap(true);
    cache.set_text_with("aa bb cc", 0.0, 0.0, &params);

    let quads = cache.glyph_vertices(0);
    assert_eq!(quads.len(), 7 * 4);
    // "aa bb" is 38 wide, "cc" 16
    assert_relative_eq!(quads[0].x, 1.0);
    assert_relative_eq!(quads[5 * 4].x, 12.0);
    // second line one line height lower
    assert_relative_eq!(quads[5 * 4].y, quads[0].y - 16.0);
}

#[test]
fn test_truncated_text_draw_range() {
    let mut cache = BitmapFontCache::new(fixtures::shared(fixtures::font()));
    let params = LayoutParams::new().with_target_width(40.0).with_truncate("...");
    cache.set_text_with("abcdefgh", 0.0, 0.0, &params);
    assert_eq!(cache.glyph_count(), 6);

    // just the ellipsis
    let mut batch = BatchRecorder::new();
    cache.draw_range(&mut batch, 3, 6);
    assert_eq!(batch.glyph_count(), 3);
    assert_eq!(batch.calls()[0].offset, 3 * GLYPH_SIZE);
}

#[test]
fn test_multi_page_markup_tint() {
    let mut font = fixtures::two_page_font();
    font.set_markup_enabled(true);
    let mut cache = BitmapFontCache::new(fixtures::shared(font));
    cache.set_text("[RED]A[]a", 0.0, 0.0);

    let half = Color::new(0.5, 0.5, 0.5, 1.0);
    cache.tint(half);

    let red = Color::new(1.0, 0.0, 0.0, 1.0);
    assert_eq!(quad_colors(&cache, 1), [red.mul(half).to_float_bits().to_bits()]);
    assert_eq!(quad_colors(&cache, 0), [half.to_float_bits().to_bits()]);
}

#[test]
fn test_set_text_resets_position() {
    let mut cache = BitmapFontCache::new(fixtures::shared(fixtures::font()));
    cache.set_text("ab", 0.0, 0.0);
    let origin = cache.vertices(0)[0];

    cache.translate(30.0, 0.0);
    cache.set_text("ab", 0.0, 0.0);
    assert_relative_eq!(cache.x(), 0.0);
    assert_relative_eq!(cache.vertices(0)[0], origin);
}
