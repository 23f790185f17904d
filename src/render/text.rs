use std::fmt::{self, Write as _};

use crate::{
    foundation::error::{RaceError, RaceResult},
    view::chart::{ChartView, format_gain, format_points},
};

const EIGHTHS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

/// Renders a chart state as text bars for terminals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRenderer {
    /// Character cells of a full-width bar.
    pub bar_cells: usize,
    /// Emit ANSI 24-bit color escapes.
    pub ansi: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            bar_cells: 40,
            ansi: false,
        }
    }
}

impl TextRenderer {
    /// Render `view` with displayed bar fractions `widths` (in `view.entries` order).
    pub fn render(&self, view: &ChartView, widths: &[f64]) -> RaceResult<String> {
        let mut out = String::new();
        self.write_view(&mut out, view, widths)
            .map_err(|e| RaceError::render(format!("format text chart: {e}")))?;
        Ok(out)
    }

    fn write_view(&self, out: &mut String, view: &ChartView, widths: &[f64]) -> fmt::Result {
        writeln!(out, "{} | {}", view.title, view.round_label)?;
        write!(out, "Standings after {}", view.round_label)?;
        if let Some(top) = &view.top_performer {
            write!(
                out,
                "   Top performer: {} ({} points)",
                top.name,
                format_gain(top.delta)
            )?;
        }
        writeln!(out)?;
        writeln!(out)?;

        let name_w = view
            .entries
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(0);
        for (slot, entry) in view.entries.iter().enumerate() {
            let fraction = widths.get(slot).copied().unwrap_or(0.0);
            let bar = bar_glyphs(fraction, self.bar_cells);
            write!(out, "{:>name_w$} ", entry.name)?;
            if self.ansi {
                let c = entry.color;
                write!(out, "\x1b[38;2;{};{};{}m{bar}\x1b[0m", c.r, c.g, c.b)?;
            } else {
                out.push_str(&bar);
            }
            writeln!(
                out,
                " {} points (rank {})",
                format_points(entry.score),
                entry.rank
            )?;
        }
        writeln!(out)?;

        let t = &view.transport;
        let preset = t
            .active_preset
            .map(|p| format!(" ({})", p.label()))
            .unwrap_or_default();
        writeln!(
            out,
            "[{}]  speed: {} ms{preset}",
            t.play_button.label(),
            t.speed_ms
        )?;

        let s = &t.scrub;
        let cells = self.bar_cells.max(2);
        let thumb = if s.max == 0 {
            0
        } else {
            s.value.min(s.max) * (cells - 1) / s.max
        };
        let track: String = (0..cells)
            .map(|i| match i.cmp(&thumb) {
                std::cmp::Ordering::Less => '=',
                std::cmp::Ordering::Equal => 'o',
                std::cmp::Ordering::Greater => '-',
            })
            .collect();
        let axis: Vec<&str> = s.axis.iter().map(|(_, label)| label.as_str()).collect();
        writeln!(out, "|{track}|  {}", axis.join(" .. "))
    }
}

/// Bar of `fraction` (clamped to `[0, 1]`) across `cells` characters, using eighth blocks.
pub fn bar_glyphs(fraction: f64, cells: usize) -> String {
    let eighths = (fraction.clamp(0.0, 1.0) * (cells * 8) as f64).round() as usize;
    let mut s = "█".repeat(eighths / 8);
    let rest = eighths % 8;
    if rest > 0 {
        s.push(EIGHTHS[rest]);
    }
    let used = s.chars().count();
    s.extend(std::iter::repeat_n(' ', cells.saturating_sub(used)));
    s
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
