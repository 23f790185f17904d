use crate::foundation::core::Rgb8;

/// Backgrounds brighter than this get dark text.
pub const BRIGHTNESS_THRESHOLD: f64 = 125.0;

/// Text color family chosen for legibility on a bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TextTone {
    /// Near-black text for light backgrounds.
    Dark,
    /// White text for dark backgrounds.
    Light,
}

impl TextTone {
    /// Pick the tone for text drawn over `background`.
    pub fn for_background(background: Rgb8) -> Self {
        if background.brightness() > BRIGHTNESS_THRESHOLD {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Concrete text color.
    pub fn color(self) -> Rgb8 {
        match self {
            Self::Dark => Rgb8::new(0x11, 0x18, 0x27),
            Self::Light => Rgb8::new(0xff, 0xff, 0xff),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/color.rs"]
mod tests;
