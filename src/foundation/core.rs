use std::time::Duration;

use crate::foundation::error::{RaceError, RaceResult};

pub use kurbo::{Point, Rect, Size};

/// Output surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas; both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> RaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(RaceError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Full-canvas rectangle in pixel coordinates.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Rational frames-per-second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Create a frame rate; both parts must be non-zero.
    pub fn new(num: u32, den: u32) -> RaceResult<Self> {
        if den == 0 {
            return Err(RaceError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(RaceError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Presentation time of frame `frame` (frame 0 starts at zero).
    ///
    /// Computed from the frame index directly so long renders do not accumulate rounding drift.
    pub fn frame_time(self, frame: u64) -> Duration {
        let nanos = u128::from(frame) * u128::from(self.den) * 1_000_000_000 / u128::from(self.num);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Number of whole frames needed to cover `duration`.
    pub fn frames_covering(self, duration: Duration) -> u64 {
        let num = duration.as_nanos() * u128::from(self.num);
        let den = u128::from(self.den) * 1_000_000_000;
        u64::try_from(num.div_ceil(den)).unwrap_or(u64::MAX)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Straight (non-premultiplied) opaque RGB color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, hex digits are case-insensitive).
    pub fn parse_hex(s: &str) -> RaceResult<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RaceError::validation(format!(
                "color '{s}' must be a hex string of the form #RRGGBB"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| RaceError::validation(format!("color '{s}': {e}")))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived brightness on a 0..=255 scale (ITU-R BT.601 luma weights).
    pub fn brightness(self) -> f64 {
        (f64::from(self.r) * 299.0 + f64::from(self.g) * 587.0 + f64::from(self.b) * 114.0)
            / 1000.0
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = RaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
