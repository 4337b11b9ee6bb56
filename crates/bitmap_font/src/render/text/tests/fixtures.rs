//! Shared fonts for text tests
//!
//! Glyph metrics (unscaled, no padding):
//!
//! | glyph | width | xoffset | xadvance |
//! |-------|-------|---------|----------|
//! | space | 0     | 0       | 6        |
//! | `A`   | 10    | 1       | 12       |
//! | `B`   | 9     | 2       | 11       |
//! | `V`   | 10    | 0       | 11       |
//! | `a-z` | 8     | 0       | 8        |
//! | `-`   | 4     | 0       | 5        |
//! | `.`   | 2     | 1       | 4        |
//! | `[`   | 3     | 1       | 5        |
//!
//! `A` kerns -2 before `V`. Line height 16, cap height 12, baseline 14.

use std::fmt::Write;
use std::sync::Arc;

use crate::assets::BmFontParser;
use crate::foundation::logging;
use crate::render::text::{BitmapFont, FontData};
use crate::render::texture::{TextureHandle, TextureRegion};

/// Texture side length of every fixture page
pub const PAGE_SIZE: u32 = 256;

fn descriptor(pages: usize) -> String {
    let mut fnt = String::new();
    let _ = writeln!(
        fnt,
        "info face=\"Fixture\" size=16 bold=0 italic=0 charset=\"\" unicode=1 padding=0,0,0,0 spacing=1,1"
    );
    let _ = writeln!(
        fnt,
        "common lineHeight=16 base=14 scaleW={PAGE_SIZE} scaleH={PAGE_SIZE} pages={pages} packed=0"
    );
    for page in 0..pages {
        let _ = writeln!(fnt, "page id={page} file=\"fixture_{page}.png\"");
    }

    // (code, width, height, xoffset, yoffset, xadvance, page)
    let upper_page = pages.saturating_sub(1);
    let mut glyphs = vec![
        (32, 0, 0, 0, 0, 6, 0),
        (65, 10, 12, 1, 2, 12, upper_page),
        (66, 9, 12, 2, 2, 11, upper_page),
        (86, 10, 12, 0, 2, 11, upper_page),
        (45, 4, 2, 0, 9, 5, 0),
        (46, 2, 2, 1, 12, 4, 0),
        (91, 3, 14, 1, 0, 5, 0),
    ];
    glyphs.extend(('a'..='z').map(|c| (c as u32, 8, 8, 0, 6, 8, 0)));

    let _ = writeln!(fnt, "chars count={}", glyphs.len());
    for (i, (code, width, height, xoffset, yoffset, xadvance, page)) in glyphs.into_iter().enumerate() {
        let x = (i % 16) * 16;
        let y = (i / 16) * 16;
        let _ = writeln!(
            fnt,
            "char id={code} x={x} y={y} width={width} height={height} xoffset={xoffset} yoffset={yoffset} xadvance={xadvance} page={page} chnl=15"
        );
    }
    let _ = writeln!(fnt, "kernings count=1");
    let _ = writeln!(fnt, "kerning first=65 second=86 amount=-2");
    fnt
}

/// Single page fixture metrics
pub fn font_data() -> FontData {
    logging::init_for_tests();
    BmFontParser::parse(&descriptor(1), false).expect("fixture descriptor parses")
}

fn regions(pages: usize) -> Vec<TextureRegion> {
    (0..pages)
        .map(|page| TextureRegion::from_texture(TextureHandle(page as u32 + 1), PAGE_SIZE, PAGE_SIZE))
        .collect()
}

/// Single page fixture font
pub fn font() -> BitmapFont {
    BitmapFont::new(font_data(), regions(1), false).expect("fixture font binds")
}

/// Single page fixture font with markup enabled
pub fn markup_font() -> BitmapFont {
    let mut font = font();
    font.set_markup_enabled(true);
    font
}

/// Fixture font with uppercase glyphs on page 1 and everything else on page 0
pub fn two_page_font() -> BitmapFont {
    logging::init_for_tests();
    let data = BmFontParser::parse(&descriptor(2), false).expect("fixture descriptor parses");
    BitmapFont::new(data, regions(2), false).expect("fixture font binds")
}

/// Fixture font shared for caches
pub fn shared(font: BitmapFont) -> Arc<BitmapFont> {
    Arc::new(font)
}
