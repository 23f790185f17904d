use std::{path::Path, sync::Arc};

use crate::{
    foundation::core::Canvas,
    foundation::error::{RaceError, RaceResult},
    render::{
        backend::{ChartStyle, FrameRGBA, RenderBackend},
        svg::chart_svg,
    },
    view::chart::ChartView,
};

/// Parses SVG scenes with `usvg` and rasterizes them with `resvg`.
///
/// The font database is built once; loading system fonts is the expensive part.
pub struct SvgRasterizer {
    opts: usvg::Options<'static>,
}

impl SvgRasterizer {
    /// Rasterizer using system fonts plus every font file in `fonts_dir`, if given.
    pub fn new(fonts_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = fonts_dir {
            db.load_fonts_dir(dir);
        }
        tracing::debug!(faces = db.len(), "svg font database ready");
        Self {
            opts: usvg::Options {
                fontdb: Arc::new(db),
                ..Default::default()
            },
        }
    }

    /// Number of font faces available to text elements.
    pub fn font_faces(&self) -> usize {
        self.opts.fontdb.len()
    }

    /// Render `svg` into a premultiplied RGBA8 frame of `canvas` size.
    pub fn rasterize(&self, svg: &str, canvas: Canvas) -> RaceResult<FrameRGBA> {
        let tree = usvg::Tree::from_str(svg, &self.opts)
            .map_err(|e| RaceError::render(format!("parse svg scene: {e}")))?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| RaceError::render("failed to allocate frame pixmap"))?;

        let sx = (canvas.width as f32) / tree.size().width();
        let sy = (canvas.height as f32) / tree.size().height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data().to_vec(),
            premultiplied: true,
        })
    }
}

/// [`RenderBackend`] that builds the chart SVG and rasterizes it on the CPU.
pub struct SvgBackend {
    style: ChartStyle,
    rasterizer: SvgRasterizer,
}

impl SvgBackend {
    /// Backend for `style`.
    pub fn new(style: ChartStyle, rasterizer: SvgRasterizer) -> RaceResult<Self> {
        style.validate()?;
        Ok(Self { style, rasterizer })
    }

    /// Style used for every frame.
    pub fn style(&self) -> &ChartStyle {
        &self.style
    }
}

impl RenderBackend for SvgBackend {
    fn canvas(&self) -> Canvas {
        self.style.canvas
    }

    fn render_frame(&mut self, view: &ChartView, widths: &[f64]) -> RaceResult<FrameRGBA> {
        let svg = chart_svg(view, widths, &self.style)?;
        self.rasterizer.rasterize(&svg, self.style.canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
