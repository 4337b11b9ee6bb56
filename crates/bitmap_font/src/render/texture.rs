//! Texture handles and regions consumed by glyph binding
//!
//! Texture loading and upload live outside this crate; fonts only need to
//! know which texture each page samples from and where the page sits inside
//! it.

/// Handle for a GPU texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Whitespace stripped from a region when it was packed into an atlas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AtlasOffsets {
    /// Pixels stripped from the left edge
    pub offset_x: f32,
    /// Pixels stripped from the bottom edge
    pub offset_y: f32,
    /// Height of the image before stripping
    pub original_height: f32,
    /// Height of the image after stripping
    pub packed_height: f32,
}

/// Rectangular area of a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    /// Texture the region samples from
    pub texture: TextureHandle,
    /// Texture width in pixels
    pub texture_width: u32,
    /// Texture height in pixels
    pub texture_height: u32,
    /// Left texture coordinate
    pub u: f32,
    /// Top texture coordinate
    pub v: f32,
    /// Right texture coordinate
    pub u2: f32,
    /// Bottom texture coordinate
    pub v2: f32,
    /// Region width in pixels
    pub region_width: f32,
    /// Region height in pixels
    pub region_height: f32,
    /// Present when the region came from a whitespace-stripping packer
    pub atlas: Option<AtlasOffsets>,
}

impl TextureRegion {
    /// Region covering an entire texture
    pub fn from_texture(texture: TextureHandle, width: u32, height: u32) -> Self {
        Self::new(texture, width, height, 0, 0, width, height)
    }

    /// Region covering the pixel rectangle `(x, y, width, height)` of a texture
    pub fn new(
        texture: TextureHandle,
        texture_width: u32,
        texture_height: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let inv_width = 1.0 / texture_width as f32;
        let inv_height = 1.0 / texture_height as f32;
        Self {
            texture,
            texture_width,
            texture_height,
            u: x as f32 * inv_width,
            v: y as f32 * inv_height,
            u2: (x + width) as f32 * inv_width,
            v2: (y + height) as f32 * inv_height,
            region_width: width as f32,
            region_height: height as f32,
            atlas: None,
        }
    }

    /// Attach atlas whitespace-stripping offsets
    #[must_use]
    pub const fn with_atlas_offsets(mut self, offsets: AtlasOffsets) -> Self {
        self.atlas = Some(offsets);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_texture_region() {
        let region = TextureRegion::from_texture(TextureHandle(3), 256, 128);
        assert_eq!(region.u, 0.0);
        assert_eq!(region.v, 0.0);
        assert_eq!(region.u2, 1.0);
        assert_eq!(region.v2, 1.0);
        assert_eq!(region.region_width, 256.0);
        assert!(region.atlas.is_none());
    }

    #[test]
    fn test_sub_region() {
        let region = TextureRegion::new(TextureHandle(1), 256, 256, 64, 128, 64, 64);
        assert_eq!(region.u, 0.25);
        assert_eq!(region.v, 0.5);
        assert_eq!(region.u2, 0.5);
        assert_eq!(region.v2, 0.75);
    }
}
