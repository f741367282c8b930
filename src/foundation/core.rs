use std::fmt;

use crate::foundation::error::{CollageError, CollageResult};

/// Pixel dimensions of a bitmap or tile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Build a size without validation.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Like [`Size::new`] but rejects zero dimensions, naming `field` in the error.
    pub fn positive(width: u32, height: u32, field: &str) -> CollageResult<Self> {
        if width == 0 || height == 0 {
            return Err(CollageError::config(
                field,
                format!("width and height must be > 0, got {width}x{height}"),
            ));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Canvas-space position. Manual positions may be negative or past the canvas edge.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Pos {
    /// Horizontal offset from the canvas left edge.
    pub x: i64,
    /// Vertical offset from the canvas top edge.
    pub y: i64,
}

impl Pos {
    /// Build a position.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Half-open integer rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Left edge, inclusive.
    pub x0: i64,
    /// Top edge, inclusive.
    pub y0: i64,
    /// Right edge, exclusive.
    pub x1: i64,
    /// Bottom edge, exclusive.
    pub y1: i64,
}

impl IRect {
    /// Build from corner coordinates.
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle of `size` at `origin`; far edges saturate at `i64::MAX`.
    pub fn from_origin_size(origin: Pos, size: Size) -> Self {
        Self {
            x0: origin.x,
            y0: origin.y,
            x1: origin.x.saturating_add(i64::from(size.width)),
            y1: origin.y.saturating_add(i64::from(size.height)),
        }
    }

    /// Horizontal extent; negative when inverted.
    pub fn width(self) -> i64 {
        self.x1.saturating_sub(self.x0)
    }

    /// Vertical extent; negative when inverted.
    pub fn height(self) -> i64 {
        self.y1.saturating_sub(self.y0)
    }

    /// True when the rectangle covers no pixel.
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Overlap of two rectangles, or `None` when they share no pixel.
    pub fn intersect(self, other: IRect) -> Option<IRect> {
        let r = IRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if r.is_empty() { None } else { Some(r) }
    }

    /// Shift by `(dx, dy)`, saturating at the `i64` range.
    pub fn translate(self, dx: i64, dy: i64) -> IRect {
        IRect {
            x0: self.x0.saturating_add(dx),
            y0: self.y0.saturating_add(dy),
            x1: self.x1.saturating_add(dx),
            y1: self.y1.saturating_add(dy),
        }
    }
}

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// Default background.
    pub const BLACK: Rgb8 = Rgb8 { r: 0, g: 0, b: 0 };

    /// Build a color from channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive).
    pub fn parse_hex(s: &str) -> CollageResult<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Option<u8> {
            u8::from_str_radix(pair, 16).ok()
        }

        if hex.len() == 6 && hex.is_ascii() {
            if let (Some(r), Some(g), Some(b)) = (
                hex_byte(&hex[0..2]),
                hex_byte(&hex[2..4]),
                hex_byte(&hex[4..6]),
            ) {
                return Ok(Self { r, g, b });
            }
        }
        Err(CollageError::config(
            "bg_color",
            format!("expected #RRGGBB, got \"{s}\""),
        ))
    }

    /// Fully opaque RGBA pixel.
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
