use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("color '{0}' is not a #rrggbb or #rrggbbaa hex string")]
    MalformedHex(String),
}

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(text: &str) -> Result<Self, PaletteError> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        let malformed = || PaletteError::MalformedHex(text.to_string());
        if digits.len() != 6 && digits.len() != 8 {
            return Err(malformed());
        }
        let byte = |index: usize| -> Result<f32, PaletteError> {
            let pair = digits.get(index..index + 2).ok_or_else(malformed)?;
            let value = u8::from_str_radix(pair, 16).map_err(|_| malformed())?;
            Ok(value as f32 / 255.0)
        };
        let alpha = if digits.len() == 8 { byte(6)? } else { 1.0 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, alpha))
    }

    /// Linear blend between `self` and `other` at `t` in `[0, 1]`.
    pub fn mix(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Channel-wise additive composite, saturating at 1.0. Overlapping
    /// contributions brighten rather than occlude.
    pub fn add_saturating(self, other: Self) -> Self {
        Self::new(
            (self.r + other.r).min(1.0),
            (self.g + other.g).min(1.0),
            (self.b + other.b).min(1.0),
            self.a.max(other.a),
        )
    }

    /// Scales the color channels by `factor`, leaving alpha untouched.
    pub fn scale(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self::new(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    /// Packs into 8-bit RGBA, clamping each channel.
    pub fn to_bytes(self) -> [u8; 4] {
        let quantize = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_bytes();
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Theme colors shared by all scenes.
///
/// `background` clears the surface, `ink` is the halftone foreground, and
/// `accents` seed the drifting gradient blobs (alpha controls each blob's
/// peak contribution).
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub ink: Rgba,
    pub accents: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::new(17.0 / 255.0, 19.0 / 255.0, 33.0 / 255.0, 1.0),
            ink: Rgba::new(155.0 / 255.0, 32.0 / 255.0, 100.0 / 255.0, 1.0),
            accents: vec![
                Rgba::new(155.0 / 255.0, 32.0 / 255.0, 100.0 / 255.0, 0.15),
                Rgba::new(178.0 / 255.0, 74.0 / 255.0, 131.0 / 255.0, 0.12),
                Rgba::new(33.0 / 255.0, 35.0 / 255.0, 57.0 / 255.0, 0.20),
                Rgba::new(44.0 / 255.0, 47.0 / 255.0, 74.0 / 255.0, 0.18),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let color = Rgba::from_hex("#9b2064").expect("parse");
        assert!((color.r - 155.0 / 255.0).abs() < 1e-6);
        assert!((color.g - 32.0 / 255.0).abs() < 1e-6);
        assert!((color.b - 100.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn parses_eight_digit_hex_with_alpha() {
        let color = Rgba::from_hex("11132180").expect("parse");
        assert!((color.a - 128.0 / 255.0).abs() < 1e-2);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Rgba::from_hex("#123").is_err());
        assert!(Rgba::from_hex("#gg0000").is_err());
        assert!(Rgba::from_hex("").is_err());
    }

    #[test]
    fn additive_composite_saturates() {
        let bright = Rgba::new(0.8, 0.8, 0.8, 1.0);
        let sum = bright.add_saturating(bright);
        assert_eq!(sum.r, 1.0);
        assert_eq!(sum.g, 1.0);
        assert_eq!(sum.b, 1.0);
    }

    #[test]
    fn mix_endpoints_match_inputs() {
        let a = Rgba::new(0.0, 0.25, 0.5, 1.0);
        let b = Rgba::new(1.0, 0.75, 0.5, 1.0);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
    }
}
