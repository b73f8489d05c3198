//! RGBA colors and CSS-style hex parsing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// A character outside `0-9a-fA-F`.
    #[error("invalid hex digit in color '{0}'")]
    InvalidHex(String),
    /// Not 3, 6 or 8 digits long.
    #[error("invalid color length {len} (expected 3, 6 or 8 hex digits)")]
    InvalidLength {
        /// Number of digits found after the optional `#`
        len: usize,
    },
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color, clamping every component to `[0.0, 1.0]`.
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque color from 8-bit channels.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError`] if the string has the wrong length or
    /// contains non-hex characters.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(hex.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHex(hex.to_string()))
        };

        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, i) in out.iter_mut().zip(0..3) {
                    let d = channel(&digits[i..=i])?;
                    *slot = d * 17;
                }
                Ok(Self::rgb8(out[0], out[1], out[2]))
            }
            6 => Ok(Self::rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => {
                let base = Self::rgb8(
                    channel(&digits[0..2])?,
                    channel(&digits[2..4])?,
                    channel(&digits[4..6])?,
                );
                Ok(base.with_alpha(f32::from(channel(&digits[6..8])?) / 255.0))
            }
            len => Err(ColorParseError::InvalidLength { len }),
        }
    }

    /// Format as `#rrggbb`, dropping alpha.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// Same color with a different alpha.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self::new(self.r, self.g, self.b, alpha)
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            (other.r - self.r).mul_add(t, self.r),
            (other.g - self.g).mul_add(t, self.g),
            (other.b - self.b).mul_add(t, self.b),
            (other.a - self.a).mul_add(t, self.a),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
