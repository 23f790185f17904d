use crate::foundation::core::{Canvas, Rect};

/// Fraction of the bar track covered by `score` on a `max_scale` axis, clamped to `[0, 1]`.
pub fn width_fraction(score: f64, max_scale: f64) -> f64 {
    if !score.is_finite() || !max_scale.is_finite() || max_scale <= 0.0 {
        return 0.0;
    }
    (score / max_scale).clamp(0.0, 1.0)
}

/// Pixel geometry of the chart regions for one canvas size and row count.
///
/// Regions stack top to bottom: header, status line, bars, transport row, scrub track, legend.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    /// Horizontal page padding.
    pub pad: f64,
    /// Title and round label.
    pub header: Rect,
    /// "Standings after" line and top performer badge.
    pub status: Rect,
    /// Bar rows.
    pub bars: Rect,
    /// Buttons.
    pub transport: Rect,
    /// Scrub track with axis labels.
    pub scrub: Rect,
    /// Color legend.
    pub legend: Rect,
    /// Width of the name column left of the bar tracks.
    pub label_width: f64,
    /// Height of one bar row.
    pub row_height: f64,
    /// Base font size in pixels.
    pub font_size: f64,
}

impl ChartLayout {
    /// Lay out `rows` bar rows on `canvas`.
    pub fn new(canvas: Canvas, rows: usize) -> Self {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let pad = (w * 0.025).round();
        let band = |top: f64, bottom: f64| Rect::new(pad, (h * top).round(), w - pad, (h * bottom).round());

        let bars = band(0.19, 0.72);
        let row_height = bars.height() / rows.max(1) as f64;

        Self {
            pad,
            header: band(0.02, 0.12),
            status: band(0.12, 0.18),
            bars,
            transport: band(0.74, 0.82),
            scrub: band(0.83, 0.91),
            legend: band(0.92, 0.99),
            label_width: (w * 0.14).round(),
            row_height,
            font_size: (h * 0.026).clamp(9.0, 28.0).round(),
        }
    }

    /// Full-width track behind the bar in row `slot` (0 = top).
    pub fn bar_track(&self, slot: usize) -> Rect {
        let y0 = self.bars.y0 + self.row_height * slot as f64;
        let inset = self.row_height * 0.1;
        Rect::new(
            self.bars.x0 + self.label_width,
            y0 + inset,
            self.bars.x1,
            y0 + self.row_height - inset,
        )
    }

    /// Bar in row `slot` filled to `fraction` of the track.
    pub fn bar_rect(&self, slot: usize, fraction: f64) -> Rect {
        let track = self.bar_track(slot);
        let fraction = fraction.clamp(0.0, 1.0);
        Rect::new(
            track.x0,
            track.y0,
            track.x0 + track.width() * fraction,
            track.y1,
        )
    }

    /// Horizontal position of `round` on the scrub track.
    pub fn scrub_x(&self, round: usize, max_round: usize) -> f64 {
        if max_round == 0 {
            return self.scrub.x0;
        }
        let t = (round.min(max_round) as f64) / (max_round as f64);
        self.scrub.x0 + self.scrub.width() * t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
