//! Colors and named stroke styles for annotations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::rgb(0xFF, 0x00, 0x00)
    }
}

impl ShapeColor {
    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to image crate RGBA order
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#RRGGBB` (opaque) or `#AARRGGBB`
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::argb(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Parse color text, substituting `fallback` for empty or invalid input
    pub fn parse_or(text: &str, fallback: ShapeColor) -> Self {
        if text.trim().is_empty() {
            return fallback;
        }
        Self::from_hex(text).unwrap_or_else(|| {
            log::warn!("Invalid color {text:?}, using {fallback}");
            fallback
        })
    }
}

impl fmt::Display for ShapeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

impl TryFrom<String> for ShapeColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<ShapeColor> for String {
    fn from(c: ShapeColor) -> Self {
        c.to_string()
    }
}

/// Named stroke style for annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushPreset {
    pub name: String,
    pub color: ShapeColor,
    /// Stroke width in image pixels
    pub thickness: f32,
}

impl BrushPreset {
    pub fn new(name: &str, color: ShapeColor, thickness: f32) -> Self {
        Self {
            name: name.to_string(),
            color,
            thickness,
        }
    }
}
