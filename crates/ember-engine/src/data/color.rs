use crate::math::lerp;

/// RGBA color with f64 components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    /// Same color with a replaced alpha component.
    pub const fn with_alpha(self, a: f64) -> Self {
        Color {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Componentwise linear interpolation toward `other`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        Color {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
            a: lerp(self.a, other.a, t),
        }
    }

    /// Pack into an ARGB integer, components clamped to [0, 255].
    pub fn to_argb(self) -> u32 {
        let quant = |c: f64| ((c * 255.0) as i64).clamp(0, 255) as u32;
        (quant(self.a) << 24) | (quant(self.r) << 16) | (quant(self.g) << 8) | quant(self.b)
    }

    /// Unpack from an ARGB integer.
    pub fn from_argb(argb: u32) -> Color {
        Color {
            r: ((argb >> 16) & 0xFF) as f64 / 255.0,
            g: ((argb >> 8) & 0xFF) as f64 / 255.0,
            b: (argb & 0xFF) as f64 / 255.0,
            a: ((argb >> 24) & 0xFF) as f64 / 255.0,
        }
    }

    /// Parse a hex color string like `"#FF5733"` or `"#FF5733AA"`.
    /// Returns `None` for malformed input.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let cleaned = hex.strip_prefix('#').unwrap_or(hex);
        if cleaned.len() != 6 && cleaned.len() != 8 {
            return None;
        }
        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(cleaned.get(range)?, 16).ok()
        };
        let r = byte(0..2)? as f64 / 255.0;
        let g = byte(2..4)? as f64 / 255.0;
        let b = byte(4..6)? as f64 / 255.0;
        let a = if cleaned.len() == 8 {
            byte(6..8)? as f64 / 255.0
        } else {
            1.0
        };
        Some(Color { r, g, b, a })
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_is_componentwise() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-9);
        assert!((mid.g - 0.5).abs() < 1e-9);
        assert!((mid.b - 0.5).abs() < 1e-9);
        assert!((mid.a - 1.0).abs() < 1e-9);
    }

    #[test]
    fn argb_round_trip() {
        let c = Color::new(1.0, 0.5, 0.0, 1.0);
        let back = Color::from_argb(c.to_argb());
        assert!((back.r - 1.0).abs() < 1.0 / 255.0);
        assert!((back.g - 0.5).abs() < 1.0 / 255.0);
        assert!((back.b - 0.0).abs() < 1.0 / 255.0);
    }

    #[test]
    fn hex_parsing() {
        let c = Color::from_hex("#FF0000").unwrap();
        assert!((c.r - 1.0).abs() < 1e-9);
        assert!((c.g - 0.0).abs() < 1e-9);
        assert!((c.a - 1.0).abs() < 1e-9);

        let with_alpha = Color::from_hex("00FF0080").unwrap();
        assert!((with_alpha.g - 1.0).abs() < 1e-9);
        assert!((with_alpha.a - 128.0 / 255.0).abs() < 1e-9);

        assert!(Color::from_hex("#nope").is_none());
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn argb_clamps_out_of_range() {
        let c = Color::new(2.0, -1.0, 0.0, 1.0);
        let argb = c.to_argb();
        assert_eq!((argb >> 16) & 0xFF, 255);
        assert_eq!((argb >> 8) & 0xFF, 0);
    }
}
