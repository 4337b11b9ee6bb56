//! Font loading from disk
//!
//! Reads `.fnt` descriptors, resolves their page image paths and applies a
//! [`FontConfig`] to produce a ready-to-use [`BitmapFont`]. Page images are
//! not loaded here: callers upload them however their renderer does and pass
//! the resulting regions in, in page order.

use std::path::Path;

use super::bmfont_parser::BmFontParser;
use crate::config::FontConfig;
use crate::render::text::{BitmapFont, FontData, FontError, FontResult};
use crate::render::texture::TextureRegion;

/// Loader for BMFont text fonts
pub struct FontLoader;

impl FontLoader {
    /// Parse the descriptor at `path`
    ///
    /// Page image paths are made relative to the descriptor's directory,
    /// with backslashes normalised to `/`.
    pub fn load_font_data(path: impl AsRef<Path>, flip: bool) -> FontResult<FontData> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut data = BmFontParser::parse(&contents, flip)?;
        data.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        data.font_file = Some(path.to_path_buf());

        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let image_paths = data
            .image_paths()
            .iter()
            .map(|file| Self::resolve_image_path(parent, file))
            .collect();
        data.set_image_paths(image_paths);

        log::info!(
            "Loaded font '{}' from {:?}: {} glyphs, {} page(s)",
            data.name,
            path,
            data.glyphs().len(),
            data.image_paths().len()
        );
        Ok(data)
    }

    /// Join a page file name onto the descriptor directory
    pub fn resolve_image_path(parent: &Path, file: &str) -> String {
        let file = file.replace('\\', "/");
        parent.join(file).to_string_lossy().replace('\\', "/")
    }

    /// Load the descriptor named by `config` and bind it to `regions`
    pub fn load(config: &FontConfig, regions: Vec<TextureRegion>) -> FontResult<BitmapFont> {
        config.validate()?;
        let data = Self::load_font_data(&config.descriptor, config.flip)?;
        Self::build(data, config, regions)
    }

    /// Apply `config` to already parsed data and bind it to `regions`
    pub fn build(
        mut data: FontData,
        config: &FontConfig,
        regions: Vec<TextureRegion>,
    ) -> FontResult<BitmapFont> {
        config.validate()?;
        data.markup_enabled = config.markup;
        data.break_chars = config.break_chars.chars().collect();
        data.blank_line_scale = config.blank_line_scale;

        let mut font = BitmapFont::new(data, regions, config.integer_positions)?;
        if let Some(chars) = &config.fixed_width_glyphs {
            font.set_fixed_width_glyphs(chars);
        }
        if config.scale != 1.0 {
            font.set_scale_uniform(config.scale)?;
        }
        if let Some(height) = config.line_height {
            font.data_mut().set_line_height(height);
        }
        Ok(font)
    }
}
