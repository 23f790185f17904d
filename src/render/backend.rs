use std::time::Duration;

use crate::{
    animation::ease::Ease,
    foundation::core::{Canvas, Rgb8},
    foundation::error::{RaceError, RaceResult},
    view::chart::ChartView,
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by the SVG backend are **premultiplied alpha**. The `premultiplied` flag keeps
/// that explicit at sink boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA bytes of the pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Visual settings shared by the SVG scene and the bar animator.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    /// Output size.
    pub canvas: Canvas,
    /// Page background.
    pub background: Rgb8,
    /// Bar width transition length.
    pub transition: Duration,
    /// Bar width transition curve.
    pub ease: Ease,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            background: Rgb8::new(0xf8, 0xfa, 0xfc),
            transition: Duration::from_millis(700),
            ease: Ease::OutCubic,
        }
    }
}

impl ChartStyle {
    /// Reject canvases too small to hold the chart.
    pub fn validate(&self) -> RaceResult<()> {
        if self.canvas.width < 160 || self.canvas.height < 120 {
            return Err(RaceError::validation(format!(
                "canvas {}x{} is too small (min 160x120)",
                self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }
}

/// A renderer that turns one chart state into a [`FrameRGBA`].
///
/// `widths` holds the displayed bar fractions in `view.entries` order.
pub trait RenderBackend {
    /// Output size of every frame.
    fn canvas(&self) -> Canvas;

    /// Render one frame.
    fn render_frame(&mut self, view: &ChartView, widths: &[f64]) -> RaceResult<FrameRGBA>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
