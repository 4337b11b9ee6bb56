//! AngleCode BMFont text descriptor parser
//!
//! Parses the `.fnt` text format into a [`FontData`]. The format is
//! positional: each line is a tag followed by `key=value` pairs, tokenised on
//! spaces and `=`. Sections appear in a fixed order:
//!
//! ```text
//! info face="Arial" size=32 ... padding=1,1,1,1 spacing=1,1
//! common lineHeight=37 base=29 scaleW=256 scaleH=256 pages=1 packed=0
//! page id=0 file="arial.png"
//! chars count=95
//! char id=65 x=0 y=0 width=20 height=22 xoffset=0 yoffset=7 xadvance=21 page=0 chnl=15
//! kernings count=1
//! kerning first=65 second=86 amount=-2
//! metrics ascent=... descent=... down=... capHeight=... lineHeight=... spaceXadvance=... xHeight=...
//! ```
//!
//! Image paths are stored as written; [`FontLoader`](super::FontLoader)
//! resolves them against the descriptor's directory.

use std::iter::Peekable;
use std::str::Lines;

use crate::render::text::{FontData, FontError, FontResult, Glyph};

/// Values of the optional `metrics` line, applied after derivation
#[derive(Debug, Clone, Copy)]
struct MetricsOverride {
    ascent: f32,
    descent: f32,
    down: f32,
    cap_height: f32,
    line_height: f32,
    space_x_advance: f32,
    x_height: f32,
}

/// Positional `key=value` fields of one descriptor line
struct Fields<'a> {
    tokens: Vec<&'a str>,
    line_num: usize,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str, line_num: usize) -> Self {
        Self {
            tokens: line.split([' ', '=']).filter(|t| !t.is_empty()).collect(),
            line_num,
        }
    }

    /// Raw value of the `index`th pair (the tag itself is skipped)
    fn value(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(2 + index * 2).copied()
    }

    fn int(&self, index: usize, name: &str) -> FontResult<i32> {
        let value = self
            .value(index)
            .ok_or_else(|| FontError::format(self.line_num, format!("Missing: {name}")))?;
        value.parse().map_err(|_| {
            FontError::format(self.line_num, format!("Invalid {name}: {value}"))
        })
    }

    fn float(&self, index: usize, name: &str) -> FontResult<f32> {
        let value = self
            .value(index)
            .ok_or_else(|| FontError::format(self.line_num, format!("Missing: {name}")))?;
        value.parse().map_err(|_| {
            FontError::format(self.line_num, format!("Invalid {name}: {value}"))
        })
    }
}

/// BMFont text descriptor parser
pub struct BmFontParser;

impl BmFontParser {
    /// Parse descriptor contents into font data
    ///
    /// # Arguments
    /// * `contents` - The text contents of the `.fnt` file
    /// * `flip` - Whether y should grow downward
    ///
    /// # Errors
    /// [`FontError::Format`] for structural problems and
    /// [`FontError::NoGlyphs`] when no glyph covers any pixels.
    pub fn parse(contents: &str, flip: bool) -> FontResult<FontData> {
        let mut lines = contents.lines().enumerate().peekable();
        let mut data = FontData::new();
        data.flipped = flip;

        let (line_num, info) = lines
            .next()
            .ok_or_else(|| FontError::format(1, "File is empty"))?;
        Self::parse_padding(&mut data, info, line_num + 1)?;

        let (line_num, common) = lines
            .next()
            .ok_or_else(|| FontError::format(line_num + 2, "Missing common header"))?;
        let (line_height, baseline, page_count) = Self::parse_common(common, line_num + 1)?;
        data.line_height = line_height;

        let mut image_paths = Vec::with_capacity(page_count);
        for page in 0..page_count {
            let (line_num, line) = lines.next().ok_or_else(|| {
                FontError::format(line_num + 2 + page, "Missing additional page definitions")
            })?;
            image_paths.push(Self::parse_page(line, page, line_num + 1)?);
        }
        data.set_image_paths(image_paths);

        Self::parse_chars(&mut data, &mut lines, baseline)?;
        Self::parse_kernings(&mut data, &mut lines);
        let metrics = Self::parse_metrics(&mut lines)?;

        data.finish_metrics(baseline)?;

        if let Some(metrics) = metrics {
            data.ascent = metrics.ascent;
            data.descent = metrics.descent;
            data.down = metrics.down;
            data.cap_height = metrics.cap_height;
            data.line_height = metrics.line_height;
            data.space_x_advance = metrics.space_x_advance;
            data.x_height = metrics.x_height;
        }

        Ok(data)
    }

    fn parse_padding(data: &mut FontData, line: &str, line_num: usize) -> FontResult<()> {
        let start = line
            .find("padding=")
            .ok_or_else(|| FontError::format(line_num, "Missing: padding"))?;
        let rest = &line[start + "padding=".len()..];
        let padding = rest.split(' ').next().unwrap_or_default();

        let values: Vec<i32> = padding
            .split(',')
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| FontError::format(line_num, format!("Invalid padding: {padding}")))?;
        let [top, right, bottom, left] = values[..] else {
            return Err(FontError::format(line_num, format!("Invalid padding: {padding}")));
        };

        data.pad_top = top as f32;
        data.pad_right = right as f32;
        data.pad_bottom = bottom as f32;
        data.pad_left = left as f32;
        Ok(())
    }

    /// Returns `(line_height, baseline, page_count)`
    fn parse_common(line: &str, line_num: usize) -> FontResult<(f32, f32, usize)> {
        let common: Vec<&str> = line.splitn(7, ' ').collect();
        if common.len() < 3 {
            return Err(FontError::format(line_num, "Invalid common header"));
        }

        let line_height = common[1]
            .strip_prefix("lineHeight=")
            .ok_or_else(|| FontError::format(line_num, "Missing: lineHeight"))?;
        let line_height: i32 = line_height.parse().map_err(|_| {
            FontError::format(line_num, format!("Invalid lineHeight: {line_height}"))
        })?;

        let base = common[2]
            .strip_prefix("base=")
            .ok_or_else(|| FontError::format(line_num, "Missing: base"))?;
        let base: i32 = base
            .parse()
            .map_err(|_| FontError::format(line_num, format!("Invalid base: {base}")))?;

        let mut page_count = 1;
        if let Some(pages) = common.get(5).and_then(|c| c.strip_prefix("pages=")) {
            match pages.trim().parse::<usize>() {
                Ok(count) => page_count = count.max(1),
                Err(_) => log::warn!("Line {line_num}: invalid page count '{pages}', assuming 1"),
            }
        }

        Ok((line_height as f32, base as f32, page_count))
    }

    fn parse_page(line: &str, page: usize, line_num: usize) -> FontResult<String> {
        if let Some(id) = line
            .split_whitespace()
            .filter_map(|t| t.strip_prefix("id="))
            .last()
        {
            let id: usize = id
                .parse()
                .map_err(|_| FontError::format(line_num, format!("Invalid page id: {id}")))?;
            if id != page {
                return Err(FontError::format(
                    line_num,
                    format!("Page IDs must be indices starting at 0: {id}"),
                ));
            }
        }

        let start = line
            .find("file=")
            .ok_or_else(|| FontError::format(line_num, "Missing: file"))?;
        let file = &line[start + "file=".len()..];
        let file = file.strip_prefix('"').unwrap_or(file);
        let file = file.split('"').next().unwrap_or_default().trim_end();
        if file.is_empty() {
            return Err(FontError::format(line_num, "Missing: file"));
        }
        Ok(file.to_string())
    }

    fn parse_chars(
        data: &mut FontData,
        lines: &mut Peekable<std::iter::Enumerate<Lines<'_>>>,
        baseline: f32,
    ) -> FontResult<()> {
        let mut descent = 0.0f32;

        while let Some(&(line_num, line)) = lines.peek() {
            if line.starts_with("kernings ") {
                lines.next();
                break;
            }
            if line.starts_with("kerning ") || line.starts_with("metrics ") {
                break;
            }
            lines.next();
            if !line.starts_with("char ") {
                continue;
            }

            let fields = Fields::new(line, line_num + 1);
            let id = fields.int(0, "id")?;
            if id > 0xffff {
                continue;
            }

            let mut glyph = Glyph::new(id.max(0) as u32);
            glyph.src_x = fields.int(1, "x")?;
            glyph.src_y = fields.int(2, "y")?;
            glyph.width = fields.int(3, "width")?;
            glyph.height = fields.int(4, "height")?;
            glyph.xoffset = fields.int(5, "xoffset")?;
            let yoffset = fields.int(6, "yoffset")?;
            glyph.yoffset = if data.flipped {
                yoffset
            } else {
                -(glyph.height + yoffset)
            };
            glyph.xadvance = fields.int(7, "xadvance")?;

            if let Some(page) = fields.value(8) {
                match page.parse::<usize>() {
                    Ok(page) => glyph.page = page,
                    Err(_) => log::warn!(
                        "Line {}: invalid page '{page}' for glyph {id}, using page 0",
                        line_num + 1
                    ),
                }
            }

            if glyph.width > 0 && glyph.height > 0 {
                descent = descent.min(baseline + glyph.yoffset as f32);
            }

            if id <= 0 {
                data.set_missing_glyph(glyph);
            } else {
                data.set_glyph(id as u32, glyph);
            }
        }

        data.descent = descent + data.pad_bottom;
        Ok(())
    }

    fn parse_kernings(data: &mut FontData, lines: &mut Peekable<std::iter::Enumerate<Lines<'_>>>) {
        while let Some(&(line_num, line)) = lines.peek() {
            if !line.starts_with("kerning ") {
                break;
            }
            lines.next();

            let fields = Fields::new(line, line_num + 1);
            let pair = (|| {
                Ok::<_, FontError>((
                    fields.int(0, "first")?,
                    fields.int(1, "second")?,
                    fields.int(2, "amount")?,
                ))
            })();
            let (first, second, amount) = match pair {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("Skipping kerning pair: {e}");
                    continue;
                }
            };

            if !(0..=0xffff).contains(&first) || !(0..=0xffff).contains(&second) {
                continue;
            }
            let Some(first) = char::from_u32(first as u32).and_then(|c| data.glyph_id(c)) else {
                continue;
            };
            data.glyph_mut(first).set_kerning(second as u32, amount);
        }
    }

    fn parse_metrics(
        lines: &mut Peekable<std::iter::Enumerate<Lines<'_>>>,
    ) -> FontResult<Option<MetricsOverride>> {
        let Some((line_num, line)) = lines.next_if(|(_, line)| line.starts_with("metrics ")) else {
            return Ok(None);
        };

        let fields = Fields::new(line, line_num + 1);
        Ok(Some(MetricsOverride {
            ascent: fields.float(0, "ascent")?,
            descent: fields.float(1, "descent")?,
            down: fields.float(2, "down")?,
            cap_height: fields.float(3, "capHeight")?,
            line_height: fields.float(4, "lineHeight")?,
            space_x_advance: fields.float(5, "spaceXadvance")?,
            x_height: fields.float(6, "xHeight")?,
        }))
    }
}
