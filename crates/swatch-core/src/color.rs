// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A packed ARGB color, the key type of color previews.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A color packed as `0xAARRGGBB`.
///
/// Deserializes from strings such as `"#F80"`, `"#FF8800"` or `"#80FF8800"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    /// Opaque black.
    pub const BLACK: Color = Color(0xFF00_0000);
    /// Opaque white.
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    /// Opaque red.
    pub const RED: Color = Color(0xFFFF_0000);
    /// Opaque green.
    pub const GREEN: Color = Color(0xFF00_FF00);
    /// Opaque blue.
    pub const BLUE: Color = Color(0xFF00_00FF);

    /// Creates a color from a packed `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value. The top byte is ignored.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    /// Creates a color from individual channels.
    pub const fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// The packed `0xAARRGGBB` value.
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Returns `true` when the alpha channel is `0xFF`.
    pub const fn is_opaque(self) -> bool {
        self.alpha() == 0xFF
    }

    /// Returns the same color with its alpha channel replaced.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | (alpha as u32) << 24)
    }

    /// Channels in `[r, g, b, a]` order, the layout of RGBA8 pixel buffers.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// Parses `#RGB`, `#RRGGBB` or `#AARRGGBB`.
    pub fn parse(text: &str) -> Result<Self, ParseColorError> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError::MissingHash(trimmed.to_string()))?;

        if !matches!(digits.len(), 3 | 6 | 8) {
            return Err(ParseColorError::InvalidLength(digits.len()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigits(trimmed.to_string()));
        }

        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ParseColorError::InvalidDigits(trimmed.to_string()))?;

        match digits.len() {
            3 => {
                let r = (value >> 8) & 0xF;
                let g = (value >> 4) & 0xF;
                let b = value & 0xF;
                Ok(Self::from_rgb((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
            }
            6 => Ok(Self::from_rgb(value)),
            _ => Ok(Self::from_argb(value)),
        }
    }
}

/// Errors returned by [`Color::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// The text does not start with `#`.
    #[error("color '{0}' must start with '#'")]
    MissingHash(String),
    /// The text contains characters that are not hexadecimal digits.
    #[error("color '{0}' contains non-hexadecimal digits")]
    InvalidDigits(String),
    /// The number of digits is not 3, 6 or 8.
    #[error("color must have 3, 6 or 8 hexadecimal digits, found {0}")]
    InvalidLength(usize),
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08X})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels() {
        let c = Color::from_argb(0x80FF_8800);
        assert_eq!(c.alpha(), 0x80);
        assert_eq!(c.red(), 0xFF);
        assert_eq!(c.green(), 0x88);
        assert_eq!(c.blue(), 0x00);
        assert_eq!(c.to_rgba(), [0xFF, 0x88, 0x00, 0x80]);
        assert!(!c.is_opaque());
        assert!(c.with_alpha(0xFF).is_opaque());
        assert_eq!(Color::from_channels(0xFF, 0xFF, 0, 0), Color::RED);
    }

    #[test]
    fn from_rgb_forces_opaque() {
        assert_eq!(Color::from_rgb(0xFF0000), Color::RED);
        assert_eq!(Color::from_rgb(0x12FF_0000), Color::RED);
    }

    #[test]
    fn parse_short_long_and_alpha_forms() {
        assert_eq!(Color::parse("#F00"), Ok(Color::RED));
        assert_eq!(Color::parse("#00FF00"), Ok(Color::GREEN));
        assert_eq!(Color::parse(" #800000FF "), Ok(Color::from_argb(0x8000_00FF)));
        assert_eq!("#fff".parse::<Color>(), Ok(Color::WHITE));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            Color::parse("FF0000"),
            Err(ParseColorError::MissingHash(_))
        ));
        assert!(matches!(
            Color::parse("#GG0000"),
            Err(ParseColorError::InvalidDigits(_))
        ));
        assert_eq!(Color::parse("#FFFF"), Err(ParseColorError::InvalidLength(4)));
        assert_eq!(Color::parse("#"), Err(ParseColorError::InvalidLength(0)));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let c = Color::from_argb(0x3300_0000);
        assert_eq!(c.to_string(), "#33000000");
        assert_eq!(Color::parse(&c.to_string()), Ok(c));
    }

    #[test]
    fn deserializes_from_ron_strings() {
        let colors: Vec<Color> = ron::from_str(r##"["#F00", "#FF00FF00"]"##).unwrap();
        assert_eq!(colors, vec![Color::RED, Color::GREEN]);
        assert!(ron::from_str::<Color>(r#""red""#).is_err());
    }
}
