//! CSS colors.
//!
//! Themes and settings files spell colors the way a stylesheet would
//! (`"#3399dd"`, `"rgb(51 153 221)"`, `"steelblue"`), and [`Color`] keeps
//! that spelling for the SVG output. Two colors compare equal only if they
//! were spelled alike; [`Color::same_rgba`] compares what ends up on screen.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};
use serde::{Deserialize, Deserializer, de};

/// A parsed CSS color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    inner: DynamicColor,
}

impl Color {
    /// Parses a CSS color string.
    ///
    /// ```
    /// use netbrush_core::color::Color;
    ///
    /// assert!(Color::new("#3399dd").is_ok());
    /// assert!(Color::new("rgb(255 0 0)").is_ok());
    /// assert!(Color::new("bluish").is_err());
    /// ```
    pub fn new(css: &str) -> Result<Self, String> {
        css.parse::<DynamicColor>()
            .map(|inner| Self { inner })
            .map_err(|err| format!("`{css}` is not a CSS color: {err}"))
    }

    /// Like [`Color::new`], except that `none` (any case) means no color.
    ///
    /// ```
    /// use netbrush_core::color::Color;
    ///
    /// assert_eq!(Color::parse_optional("None"), Ok(None));
    /// assert!(Color::parse_optional("white").unwrap().is_some());
    /// ```
    pub fn parse_optional(css: &str) -> Result<Option<Self>, String> {
        if css.trim().eq_ignore_ascii_case("none") {
            Ok(None)
        } else {
            Self::new(css).map(Some)
        }
    }

    /// 8-bit sRGB channels, `[r, g, b, a]`.
    pub fn to_rgba8(self) -> [u8; 4] {
        let rgba = self.inner.to_alpha_color::<Srgb>().to_rgba8();
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }

    /// Whether both colors render to the same 8-bit sRGB value.
    ///
    /// ```
    /// use netbrush_core::color::Color;
    ///
    /// let named = Color::new("blue").unwrap();
    /// let hex = Color::new("#0000ff").unwrap();
    /// assert_ne!(named, hex);
    /// assert!(named.same_rgba(hex));
    /// ```
    pub fn same_rgba(self, other: Color) -> bool {
        self.to_rgba8() == other.to_rgba8()
    }

    /// Opacity between 0 and 1.
    pub fn alpha(&self) -> f32 {
        self.inner.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self {
            inner: DynamicColor::from_alpha_color(color::palette::css::BLACK),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let css = String::deserialize(deserializer)?;
        Self::new(&css).map_err(de::Error::custom)
    }
}

/// Serde helper for `Option<Color>` fields that accept `"none"`.
///
/// Use as `#[serde(default, deserialize_with = "color::deserialize_optional")]`.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(css) => Color::parse_optional(&css).map_err(de::Error::custom),
        None => Ok(None),
    }
}
