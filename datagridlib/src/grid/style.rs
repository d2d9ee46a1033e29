//! Presentation of aggregate rows: indentation and background shade.
//!
//! Both are a pure function of the row's nesting depth, so rebuilding a grid
//! from the same markup always yields the same styles.
//!
//! The shade is a linear interpolation between the palette endpoints:
//!
//! ```text
//! t = (depth - 1) / max(group_count - 1, 1)      clamped to [0, 1]
//! channel = round(start + (end - start) * t)
//! ```
//!
//! so the outermost groups get `start` and the innermost `end`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A gray with all channels set to `level`.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// `#rrggbb` notation.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| -> u8 {
            let value = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Accepts `#rrggbb`, `#rgb` and `rgb(r, g, b)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_string(),
                _ => return Err(format!("Invalid hex color: {}", s)),
            };
            let channel = |i: usize| {
                expanded
                    .get(i..i + 2)
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| format!("Invalid hex color: {}", s))
            };
            return Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
        }

        let inner = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("Unknown color format: {}", s))?;
        let channels: Vec<u8> = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Invalid color channel in {}: {}", s, e))?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
            _ => Err(format!("Expected three channels: {}", s)),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Endpoint colors for aggregate row shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Shade of the outermost groups
    pub start: Rgb,
    /// Shade of the innermost groups
    pub end: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            start: Rgb::gray(125),
            end: Rgb::gray(225),
        }
    }
}

impl Palette {
    /// Create a palette from its endpoints.
    pub fn new(start: Rgb, end: Rgb) -> Self {
        Self { start, end }
    }

    /// Background for an aggregate row at `depth` (1 = outermost).
    pub fn shade(&self, depth: usize, group_count: usize) -> Rgb {
        let steps = group_count.saturating_sub(1).max(1);
        let t = (depth.saturating_sub(1) as f64 / steps as f64).clamp(0.0, 1.0);
        self.start.lerp(self.end, t)
    }
}

/// Presentation applied to an aggregate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowStyle {
    /// Left padding of the first cell, in em
    pub indent_em: u32,
    /// Row background
    pub background: Rgb,
}

impl RowStyle {
    /// Inline CSS for the row.
    pub fn css(&self) -> String {
        format!("background-color: {};", self.background)
    }

    /// Inline CSS for the row's first cell.
    pub fn first_cell_css(&self) -> String {
        format!("padding-left: {}em;", self.indent_em)
    }
}

/// Styling options used while building a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStyle {
    /// Endpoint colors
    pub palette: Palette,
    /// Number of grouping columns; the deepest level in the grid when unset
    pub group_count: Option<usize>,
}

impl GridStyle {
    /// Create default styling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the palette.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Builder: set the grouping column count.
    pub fn group_count(mut self, count: usize) -> Self {
        self.group_count = Some(count);
        self
    }

    /// Style for an aggregate row at `depth` (1 = outermost).
    pub fn row_style(&self, depth: usize, group_count: usize) -> RowStyle {
        let depth = depth.max(1);
        RowStyle {
            indent_em: ((depth - 1) * 2 + 1) as u32,
            background: self.palette.shade(depth, group_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors() {
        assert_eq!("#ff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("#fff".parse::<Rgb>().unwrap(), Rgb::gray(255));
        assert_eq!(
            "rgb(1, 2, 3)".parse::<Rgb>().unwrap(),
            Rgb::new(1, 2, 3)
        );
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
        assert!("rgb(1, 2)".parse::<Rgb>().is_err());
        assert!("rgb(1, 2, 300)".parse::<Rgb>().is_err());
        assert!("blue".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_and_hex() {
        let color = Rgb::new(125, 0, 255);
        assert_eq!(color.to_string(), "rgb(125, 0, 255)");
        assert_eq!(color.to_hex(), "#7d00ff");
    }

    #[test]
    fn test_shade_endpoints() {
        let palette = Palette::default();
        assert_eq!(palette.shade(1, 3), Rgb::gray(125));
        assert_eq!(palette.shade(2, 3), Rgb::gray(175));
        assert_eq!(palette.shade(3, 3), Rgb::gray(225));
        // Deeper than the configured group count clamps to the end color
        assert_eq!(palette.shade(5, 3), Rgb::gray(225));
    }

    #[test]
    fn test_shade_single_group() {
        let palette = Palette::new(Rgb::new(0, 0, 0), Rgb::new(200, 100, 50));
        assert_eq!(palette.shade(1, 1), Rgb::new(0, 0, 0));
        assert_eq!(palette.shade(1, 0), Rgb::new(0, 0, 0));
        assert_eq!(palette.shade(2, 1), Rgb::new(200, 100, 50));
    }

    #[test]
    fn test_row_style_indent() {
        let style = GridStyle::new();
        assert_eq!(style.row_style(1, 2).indent_em, 1);
        assert_eq!(style.row_style(2, 2).indent_em, 3);
        assert_eq!(style.row_style(3, 2).indent_em, 5);
        assert_eq!(style.row_style(2, 2).first_cell_css(), "padding-left: 3em;");
        assert_eq!(
            style.row_style(1, 2).css(),
            "background-color: rgb(125, 125, 125);"
        );
    }

    #[test]
    fn test_palette_json() {
        let palette: Palette =
            serde_json::from_str(r##"{"start":"#000000","end":"rgb(10, 20, 30)"}"##).unwrap();
        assert_eq!(palette.end, Rgb::new(10, 20, 30));
        assert_eq!(
            serde_json::to_string(&palette).unwrap(),
            r##"{"start":"#000000","end":"#0a141e"}"##
        );
    }
}
