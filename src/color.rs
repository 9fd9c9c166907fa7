/// RGB colors and RGBA32 packing
///
/// Overlay pixels are stored as little-endian packed u32 values, so the bytes of
/// an overlay buffer read R, G, B, A in memory order.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PaintError;

/// Packed RGBA32 pixel value
pub type PackedColor = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from raw channel values read out of a mask buffer
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: channel_to_u8(r),
            g: channel_to_u8(g),
            b: channel_to_u8(b),
        }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional, case-insensitive)
    pub fn parse_hex(value: &str) -> Result<Self, PaintError> {
        let digits = value.trim().trim_start_matches('#');
        let invalid = || PaintError::InvalidColor(value.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => {
                let rgb = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                Ok(Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
            }
            3 => {
                let expand = |c: char| {
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v << 4 | v
                };
                let mut chars = digits.chars();
                match (chars.next(), chars.next(), chars.next()) {
                    (Some(r), Some(g), Some(b)) => Ok(Self::new(expand(r), expand(g), expand(b))),
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }

    /// Pack with full opacity
    pub fn packed(&self) -> PackedColor {
        pack_rgba(*self, 1.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

/// Clamp and round a raw channel value into `0..=255`. NaN maps to 0.
pub fn channel_to_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Pack a color and an alpha in `[0, 1]` into a little-endian RGBA32 value
pub fn pack_rgba(color: Color, alpha: f64) -> PackedColor {
    let a = channel_to_u8(alpha.clamp(0.0, 1.0) * 255.0);
    u32::from_le_bytes([color.r, color.g, color.b, a])
}

/// Inverse of `pack_rgba`, returns the color and the alpha byte
pub fn unpack_rgba(packed: PackedColor) -> (Color, u8) {
    let [r, g, b, a] = packed.to_le_bytes();
    (Color::new(r, g, b), a)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Rgb([f64; 3]),
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Hex(hex) => Color::parse_hex(&hex).map_err(serde::de::Error::custom),
            ColorRepr::Rgb([r, g, b]) => Ok(Color::from_channels(r, g, b)),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
