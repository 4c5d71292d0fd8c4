use crate::foundation::error::{DaybreakError, DaybreakResult};

/// Pixel dimensions of the canvas being laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Construct a size from width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width as `f64` for layout arithmetic.
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64` for layout arithmetic.
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
///
/// Also used as the Parley brush type; the compositor overrides it with the
/// requested text color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white, the default text color.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> DaybreakResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return Err(DaybreakError::config(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let channel = |i: usize| -> DaybreakResult<u8> {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .ok_or_else(|| DaybreakError::config(format!("color '{s}' is not valid hex")))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }
}

/// A quote and its attribution. Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Quote {
    /// Quote body.
    pub text: String,
    /// Attribution, rendered as `- {author}`.
    pub author: String,
}

impl Quote {
    /// Construct a quote.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// Quote used when the quote provider fails.
    pub fn fallback() -> Self {
        Self::new("Stay positive and happy.", "A well-wisher")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
