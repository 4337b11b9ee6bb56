//! RGBA colors and the packed vertex color format

use crate::foundation::math::Vec4;

/// Linear RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a packed `0xRRGGBBAA` value
    pub fn from_rgba8888(value: u32) -> Self {
        Self {
            r: ((value >> 24) & 0xff) as f32 / 255.0,
            g: ((value >> 16) & 0xff) as f32 / 255.0,
            b: ((value >> 8) & 0xff) as f32 / 255.0,
            a: (value & 0xff) as f32 / 255.0,
        }
    }

    /// Pack into the `ABGR` integer layout used by vertex colors
    pub fn to_int_bits(self) -> u32 {
        let channel = |c: f32| (255.0 * c) as u32 & 0xff;
        (channel(self.a) << 24) | (channel(self.b) << 16) | (channel(self.g) << 8) | channel(self.r)
    }

    /// Pack into a single `f32` whose bit pattern holds the `ABGR` bytes
    ///
    /// The lowest alpha bit is dropped so the result is never a NaN.
    pub fn to_float_bits(self) -> f32 {
        int_to_float_color(self.to_int_bits())
    }

    /// Component-wise product, clamped to `0.0..=1.0`
    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        Self {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
            a: self.a * other.a,
        }
        .clamp()
    }

    /// Copy of this color with a different alpha
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Clamp every component to `0.0..=1.0`
    #[must_use]
    pub fn clamp(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Color> for Vec4 {
    fn from(c: Color) -> Self {
        Self::new(c.r, c.g, c.b, c.a)
    }
}

/// Reinterpret packed `ABGR` bits as a vertex color float
pub fn int_to_float_color(bits: u32) -> f32 {
    f32::from_bits(bits & 0xfeff_ffff)
}

/// Recover the packed `ABGR` bits of a vertex color float
///
/// The alpha byte is rescaled to undo the bit dropped by
/// [`int_to_float_color`].
pub fn float_to_int_color(value: f32) -> u32 {
    let bits = value.to_bits();
    let alpha = ((bits >> 24) as f32 * (255.0 / 254.0)) as u32 & 0xff;
    (bits & 0x00ff_ffff) | (alpha << 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba8888() {
        let color = Color::from_rgba8888(0xff00_80ff);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert!((color.b - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_packed_white() {
        assert_eq!(Color::WHITE.to_int_bits(), 0xffff_ffff);
        assert_eq!(Color::WHITE.to_float_bits().to_bits(), 0xfeff_ffff);
        assert!(!Color::WHITE.to_float_bits().is_nan());
    }

    #[test]
    fn test_packed_channel_order() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(red.to_int_bits(), 0xff00_00ff);
    }

    #[test]
    fn test_float_color_round_trip_alpha() {
        let bits = float_to_int_color(Color::WHITE.to_float_bits());
        assert_eq!(bits, 0xffff_ffff);
    }

    #[test]
    fn test_mul_clamps() {
        let color = Color::new(2.0, 0.5, 1.0, 1.0).mul(Color::new(1.0, 0.5, 0.0, 0.5));
        assert_eq!(color, Color::new(1.0, 0.25, 0.0, 0.5));
    }

    #[test]
    fn test_vec4_conversion() {
        let v: Vec4 = Color::new(0.1, 0.2, 0.3, 0.4).into();
        assert_eq!(Color::from(v), Color::new(0.1, 0.2, 0.3, 0.4));
    }
}
