//! Color markup tags
//!
//! With markup enabled, layout recognises these tags inside text:
//!
//! - `[#rrggbbaa]` (1 to 8 hex digits, alpha defaults to `ff`) pushes a color
//! - `[name]` pushes a named color from [`NamedColors`]
//! - `[]` pops the current color
//! - `[[` is an escaped `[`
//!
//! Anything else starting with `[` is not a tag and is drawn as written.

use std::collections::HashMap;

use crate::render::color::Color;

/// Result of inspecting the text after a `[`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMarkup {
    /// Push `color`; the tag body is `len` characters long, excluding brackets
    Push {
        /// Color to push
        color: Color,
        /// Characters between `[` and `]`
        len: usize,
    },
    /// `[]`: pop the color stack
    Pop,
    /// `[[`: a literal bracket
    Escape,
    /// Not a tag
    Invalid,
}

/// Read-only table of colors addressable by name in markup
#[derive(Debug, Clone, Default)]
pub struct NamedColors {
    colors: HashMap<String, Color>,
}

impl NamedColors {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard palette (`WHITE`, `RED`, `SKY`, ...)
    pub fn standard() -> Self {
        const PALETTE: [(&str, u32); 34] = [
            ("CLEAR", 0x0000_0000),
            ("BLACK", 0x0000_00ff),
            ("WHITE", 0xffff_ffff),
            ("LIGHT_GRAY", 0xbfbf_bfff),
            ("GRAY", 0x7f7f_7fff),
            ("DARK_GRAY", 0x3f3f_3fff),
            ("BLUE", 0x0000_ffff),
            ("NAVY", 0x0000_7fff),
            ("ROYAL", 0x4169_e1ff),
            ("SLATE", 0x7080_90ff),
            ("SKY", 0x87ce_ebff),
            ("CYAN", 0x00ff_ffff),
            ("TEAL", 0x007f_7fff),
            ("GREEN", 0x00ff_00ff),
            ("CHARTREUSE", 0x7fff_00ff),
            ("LIME", 0x32cd_32ff),
            ("FOREST", 0x228b_22ff),
            ("OLIVE", 0x6b8e_23ff),
            ("YELLOW", 0xffff_00ff),
            ("GOLD", 0xffd7_00ff),
            ("GOLDENROD", 0xdaa5_20ff),
            ("ORANGE", 0xffa5_00ff),
            ("BROWN", 0x8b45_13ff),
            ("TAN", 0xd2b4_8cff),
            ("FIREBRICK", 0xb222_22ff),
            ("RED", 0xff00_00ff),
            ("SCARLET", 0xff34_1cff),
            ("CORAL", 0xff7f_50ff),
            ("SALMON", 0xfa80_72ff),
            ("PINK", 0xff69_b4ff),
            ("MAGENTA", 0xff00_ffff),
            ("PURPLE", 0xa020_f0ff),
            ("VIOLET", 0xee82_eeff),
            ("MAROON", 0xb030_60ff),
        ];
        PALETTE
            .iter()
            .fold(Self::new(), |colors, &(name, rgba)| {
                colors.with(name, Color::from_rgba8888(rgba))
            })
    }

    /// Add or replace a color, builder style
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, color: Color) -> Self {
        self.insert(name, color);
        self
    }

    /// Add or replace a color
    pub fn insert(&mut self, name: impl Into<String>, color: Color) {
        self.colors.insert(name.into(), color);
    }

    /// Look up a color by exact (case-sensitive) name
    pub fn get(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    /// Number of named colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Inspect `text[start..end]`, the characters following a `[`
pub fn parse_color_markup(
    text: &[char],
    start: usize,
    end: usize,
    colors: &NamedColors,
) -> ColorMarkup {
    if start >= end {
        return ColorMarkup::Invalid;
    }
    match text[start] {
        '#' => {
            let mut rgba: u32 = 0;
            for i in start + 1..end {
                let ch = text[i];
                if ch == ']' {
                    let len = i - start;
                    if !(2..=9).contains(&len) {
                        return ColorMarkup::Invalid;
                    }
                    // Fewer than 8 digits: left-align and default alpha to opaque.
                    if len <= 7 {
                        rgba <<= 4 * (9 - len);
                        rgba |= 0xff;
                    }
                    return ColorMarkup::Push {
                        color: Color::from_rgba8888(rgba),
                        len,
                    };
                }
                let Some(digit) = ch.to_digit(16) else {
                    return ColorMarkup::Invalid;
                };
                rgba = (rgba << 4).wrapping_add(digit);
            }
            ColorMarkup::Invalid
        }
        '[' => ColorMarkup::Escape,
        ']' => ColorMarkup::Pop,
        _ => {
            for i in start + 1..end {
                if text[i] != ']' {
                    continue;
                }
                let name: String = text[start..i].iter().collect();
                return colors.get(&name).map_or(ColorMarkup::Invalid, |color| {
                    ColorMarkup::Push {
                        color,
                        len: i - start,
                    }
                });
            }
            ColorMarkup::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(text: &str) -> ColorMarkup {
        let chars: Vec<char> = text.chars().collect();
        parse_color_markup(&chars, 0, chars.len(), &NamedColors::standard())
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(
            parse("#ff0000ff]text"),
            ColorMarkup::Push {
                color: Color::new(1.0, 0.0, 0.0, 1.0),
                len: 9
            }
        );
    }

    #[test]
    fn test_short_hex_defaults_alpha() {
        let ColorMarkup::Push { color, len } = parse("#00f]") else {
            panic!("expected a push");
        };
        assert_eq!(len, 4);
        // three digits fill the high nibbles: 0x00f000ff
        assert_relative_eq!(color.b, 0.0);
        assert_relative_eq!(color.g, 240.0 / 255.0);
        assert_relative_eq!(color.a, 1.0);

        let ColorMarkup::Push { color, .. } = parse("#0000ff]") else {
            panic!("expected a push");
        };
        assert_relative_eq!(color.b, 1.0);
        assert_relative_eq!(color.a, 1.0);
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(parse("#]"), ColorMarkup::Invalid);
        assert_eq!(parse("#123456789]"), ColorMarkup::Invalid);
        assert_eq!(parse("#12g4]"), ColorMarkup::Invalid);
        assert_eq!(parse("#1234"), ColorMarkup::Invalid);
    }

    #[test]
    fn test_named_color() {
        assert_eq!(
            parse("RED]x"),
            ColorMarkup::Push {
                color: Color::from_rgba8888(0xff00_00ff),
                len: 3
            }
        );
        assert_eq!(parse("red]"), ColorMarkup::Invalid);
        assert_eq!(parse("NOPE]"), ColorMarkup::Invalid);
        assert_eq!(parse("RED"), ColorMarkup::Invalid);
    }

    #[test]
    fn test_pop_and_escape() {
        assert_eq!(parse("]"), ColorMarkup::Pop);
        assert_eq!(parse("[abc"), ColorMarkup::Escape);
        assert_eq!(parse(""), ColorMarkup::Invalid);
    }

    #[test]
    fn test_custom_palette() {
        let colors = NamedColors::new().with("accent", Color::new(0.5, 0.25, 1.0, 1.0));
        let chars: Vec<char> = "accent]".chars().collect();
        assert!(matches!(
            parse_color_markup(&chars, 0, chars.len(), &colors),
            ColorMarkup::Push { len: 6, .. }
        ));
        assert_eq!(colors.len(), 1);
        assert_eq!(NamedColors::standard().len(), 34);
    }
}
