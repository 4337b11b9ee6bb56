//! Per-character glyph metrics and kerning

/// log2 of the entries in one sparse table page
pub const LOG2_PAGE_SIZE: u32 = 9;
/// Entries in one sparse table page
pub const PAGE_SIZE: usize = 1 << LOG2_PAGE_SIZE;
/// Pages needed to cover the 16-bit code point range
pub const PAGES: usize = 0x10000 / PAGE_SIZE;

/// Split a 16-bit code point into (page, slot)
pub(crate) fn table_index(code: u32) -> Option<(usize, usize)> {
    if code > 0xffff {
        return None;
    }
    Some(((code >> LOG2_PAGE_SIZE) as usize, code as usize & (PAGE_SIZE - 1)))
}

/// Index of a glyph inside its font's glyph arena
///
/// Ids are only meaningful for the [`FontData`](super::FontData) that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId(pub(crate) u32);

impl GlyphId {
    /// Position in the arena
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sparse kerning amounts keyed by the following character
#[derive(Debug, Clone)]
pub struct KerningTable {
    pages: Vec<Option<Box<[i8; PAGE_SIZE]>>>,
}

impl KerningTable {
    fn new() -> Self {
        Self {
            pages: vec![None; PAGES],
        }
    }

    /// Kerning before `next`, zero when unset
    pub fn get(&self, next: u32) -> i32 {
        table_index(next)
            .and_then(|(page, slot)| self.pages[page].as_ref().map(|p| i32::from(p[slot])))
            .unwrap_or(0)
    }

    /// Amounts are stored as signed bytes, as in the descriptor format
    fn set(&mut self, next: u32, amount: i32) {
        if let Some((page, slot)) = table_index(next) {
            let page = self.pages[page].get_or_insert_with(|| Box::new([0; PAGE_SIZE]));
            page[slot] = amount as i8;
        }
    }
}

/// Metrics and texture mapping for one character
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    /// Code point
    pub id: u32,
    /// Left edge in the page image, pixels
    pub src_x: i32,
    /// Top edge in the page image, pixels
    pub src_y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Left texture coordinate, set when a region is bound
    pub u: f32,
    /// Texture v at the glyph's bottom (top when flipped)
    pub v: f32,
    /// Right texture coordinate
    pub u2: f32,
    /// Texture v at the glyph's top (bottom when flipped)
    pub v2: f32,
    /// Horizontal draw offset from the pen position
    pub xoffset: i32,
    /// Vertical draw offset from the baseline
    pub yoffset: i32,
    /// Pen advance after this glyph
    pub xadvance: i32,
    /// Texture page index
    pub page: usize,
    /// Advance is fixed and kerning ignored
    pub fixed_width: bool,
    kerning: Option<Box<KerningTable>>,
}

impl Glyph {
    /// Create a glyph for `id` with zeroed metrics
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Kerning adjustment when `next` follows this glyph
    pub fn kerning(&self, next: char) -> i32 {
        self.kerning.as_ref().map_or(0, |table| table.get(next as u32))
    }

    /// Register the kerning adjustment for `next`
    ///
    /// Code points above `0xFFFF` cannot be kerned and are ignored.
    pub fn set_kerning(&mut self, next: u32, amount: i32) {
        if next > 0xffff {
            return;
        }
        self.kerning
            .get_or_insert_with(|| Box::new(KerningTable::new()))
            .set(next, amount);
    }

    /// Drop every kerning pair
    pub fn clear_kerning(&mut self) {
        self.kerning = None;
    }

    /// Whether any kerning pair was registered
    pub fn has_kerning(&self) -> bool {
        self.kerning.is_some()
    }

    /// Whether the glyph covers any pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
