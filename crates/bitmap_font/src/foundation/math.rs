//! Math utilities and types
//!
//! Vector aliases shared with the rest of the engine plus the small scalar
//! helpers used by glyph placement.

pub use nalgebra::{Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 4D vector type (used for RGBA colors at API boundaries)
pub type Vec4 = Vector4<f32>;

/// Math utility functions
pub mod utils {
    /// Round to the nearest integer, with halves rounded toward positive infinity.
    ///
    /// Glyph positions snap with this rule rather than [`f32::round`] so that
    /// negative coordinates land on the same pixel grid as positive ones.
    pub fn round_half_up(value: f32) -> f32 {
        (value + 0.5).floor()
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(1.5), 2.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(-1.6), -2.0);
        assert_eq!(round_half_up(0.49), 0.0);
    }
}
