//! Font asset loading
//!
//! - [`BmFontParser`]: parses the text variant of the AngelCode BMFont format
//! - [`FontLoader`]: reads descriptors from disk and applies a
//!   [`crate::config::FontConfig`]

pub mod bmfont_parser;
pub mod font_loader;

pub use bmfont_parser::BmFontParser;
pub use font_loader::FontLoader;
