use std::fmt::{self, Write as _};

use crate::{
    foundation::core::{Rect, Rgb8},
    foundation::error::{RaceError, RaceResult},
    playback::controller::SpeedPreset,
    render::{backend::ChartStyle, layout::ChartLayout},
    view::{
        chart::{ChartView, PlayButton, format_gain, format_points},
        color::TextTone,
    },
};

const INK: Rgb8 = Rgb8::new(0x11, 0x18, 0x27);
const MUTED: Rgb8 = Rgb8::new(0x6b, 0x72, 0x80);
const TRACK: Rgb8 = Rgb8::new(0xe5, 0xe7, 0xeb);
const ACCENT: Rgb8 = Rgb8::new(0x25, 0x63, 0xeb);
const BADGE: Rgb8 = Rgb8::new(0xfe, 0xf3, 0xc7);
const FONT: &str = "sans-serif";

/// Build the SVG document for one chart state.
///
/// `widths` are the displayed bar fractions in `view.entries` order; missing values draw empty
/// bars.
pub fn chart_svg(view: &ChartView, widths: &[f64], style: &ChartStyle) -> RaceResult<String> {
    let layout = ChartLayout::new(style.canvas, view.entries.len());
    let mut out = String::with_capacity(16 * 1024);
    write_scene(&mut out, view, widths, style, &layout)
        .map_err(|e| RaceError::render(format!("build chart svg: {e}")))?;
    Ok(out)
}

/// Escape text for use in SVG character data and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn write_scene(
    out: &mut String,
    view: &ChartView,
    widths: &[f64],
    style: &ChartStyle,
    l: &ChartLayout,
) -> fmt::Result {
    let (w, h) = (style.canvas.width, style.canvas.height);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT}">"#
    )?;
    writeln!(
        out,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
        style.background.to_hex()
    )?;

    write_header(out, view, l)?;
    write_status(out, view, l)?;
    write_bars(out, view, widths, l)?;
    write_transport(out, view, l)?;
    write_scrub(out, view, l)?;
    write_legend(out, view, l)?;

    writeln!(out, "</svg>")
}

fn write_header(out: &mut String, view: &ChartView, l: &ChartLayout) -> fmt::Result {
    let base = l.header.y1 - l.header.height() * 0.25;
    text(
        out,
        l.header.x0,
        base,
        l.font_size * 1.6,
        INK,
        "start",
        true,
        &view.title,
    )?;
    text(
        out,
        l.header.x1,
        base,
        l.font_size * 1.2,
        MUTED,
        "end",
        false,
        &view.round_label,
    )
}

fn write_status(out: &mut String, view: &ChartView, l: &ChartLayout) -> fmt::Result {
    let base = l.status.y0 + l.status.height() * 0.65;
    let status = format!("Standings after {}", view.round_label);
    text(out, l.status.x0, base, l.font_size, INK, "start", false, &status)?;

    let Some(top) = &view.top_performer else {
        return Ok(());
    };
    let badge = format!(
        "Top performer: {} ({} points)",
        top.name,
        format_gain(top.delta)
    );
    let badge_w = estimate_text_width(&badge, l.font_size) + l.font_size;
    let rect = Rect::new(
        l.status.x1 - badge_w,
        l.status.y0 + l.status.height() * 0.1,
        l.status.x1,
        l.status.y1 - l.status.height() * 0.1,
    );
    rounded_rect(out, rect, rect.height() / 2.0, BADGE)?;
    text(
        out,
        rect.center().x,
        base,
        l.font_size,
        INK,
        "middle",
        true,
        &badge,
    )
}

fn write_bars(out: &mut String, view: &ChartView, widths: &[f64], l: &ChartLayout) -> fmt::Result {
    let fs = (l.row_height * 0.4).clamp(8.0, l.font_size);
    for (slot, entry) in view.entries.iter().enumerate() {
        let track = l.bar_track(slot);
        let fraction = widths.get(slot).copied().unwrap_or(0.0);
        let bar = l.bar_rect(slot, fraction);
        let base = track.center().y + fs * 0.35;

        text(
            out,
            track.x0 - fs * 0.6,
            base,
            fs,
            INK,
            "end",
            true,
            &entry.name,
        )?;
        rounded_rect(out, track, 3.0, TRACK)?;
        if bar.width() > 0.0 {
            rounded_rect(out, bar, 3.0, entry.color)?;
        }

        let caption = format!(
            "{} points (rank {})",
            format_points(entry.score),
            entry.rank
        );
        let caption_w = estimate_text_width(&caption, fs);
        if bar.width() >= caption_w + fs {
            let tone = TextTone::for_background(entry.color);
            text(
                out,
                bar.x1 - fs * 0.5,
                base,
                fs,
                tone.color(),
                "end",
                false,
                &caption,
            )?;
        } else {
            text(
                out,
                bar.x1 + fs * 0.5,
                base,
                fs,
                INK,
                "start",
                false,
                &caption,
            )?;
        }
    }
    Ok(())
}

fn write_transport(out: &mut String, view: &ChartView, l: &ChartLayout) -> fmt::Result {
    let t = &view.transport;
    let fs = l.font_size;
    let bh = l.transport.height() * 0.8;
    let y0 = l.transport.y0 + (l.transport.height() - bh) / 2.0;
    let gap = fs * 0.6;
    let mut x = l.transport.x0;

    let mut button = |out: &mut String, label: &str, active: bool| -> fmt::Result {
        let bw = estimate_text_width(label, fs) + fs * 1.6;
        let rect = Rect::new(x, y0, x + bw, y0 + bh);
        let (fill, ink) = if active {
            (ACCENT, Rgb8::new(0xff, 0xff, 0xff))
        } else {
            (TRACK, INK)
        };
        rounded_rect(out, rect, 4.0, fill)?;
        text(
            out,
            rect.center().x,
            rect.center().y + fs * 0.35,
            fs,
            ink,
            "middle",
            active,
            label,
        )?;
        x += bw + gap;
        Ok(())
    };

    button(out, "Reset", false)?;
    button(
        out,
        t.play_button.label(),
        t.play_button == PlayButton::Pause,
    )?;
    for preset in SpeedPreset::ALL {
        button(out, preset.label(), t.active_preset == Some(preset))?;
    }

    text(
        out,
        l.transport.x1,
        l.transport.center().y + fs * 0.35,
        fs,
        MUTED,
        "end",
        false,
        &format!("{} ms / round", t.speed_ms),
    )
}

fn write_scrub(out: &mut String, view: &ChartView, l: &ChartLayout) -> fmt::Result {
    let s = &view.transport.scrub;
    let fs = l.font_size * 0.85;
    let track_y = l.scrub.y0 + l.scrub.height() * 0.3;
    let track = Rect::new(l.scrub.x0, track_y - 2.0, l.scrub.x1, track_y + 2.0);
    rounded_rect(out, track, 2.0, TRACK)?;

    let thumb_x = l.scrub_x(s.value, s.max);
    let filled = Rect::new(l.scrub.x0, track.y0, thumb_x, track.y1);
    if filled.width() > 0.0 {
        rounded_rect(out, filled, 2.0, ACCENT)?;
    }
    writeln!(
        out,
        r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
        thumb_x,
        track_y,
        (l.scrub.height() * 0.15).max(4.0),
        ACCENT.to_hex()
    )?;

    let base = l.scrub.y1 - l.scrub.height() * 0.1;
    for (round, label) in &s.axis {
        let anchor = if *round == 0 {
            "start"
        } else if *round == s.max {
            "end"
        } else {
            "middle"
        };
        text(out, l.scrub_x(*round, s.max), base, fs, MUTED, anchor, false, label)?;
    }
    Ok(())
}

fn write_legend(out: &mut String, view: &ChartView, l: &ChartLayout) -> fmt::Result {
    let fs = l.font_size * 0.85;
    let swatch = fs;
    let base = l.legend.center().y + fs * 0.35;
    let mut x = l.legend.x0;
    for item in &view.legend {
        let rect = Rect::new(x, base - swatch * 0.85, x + swatch, base + swatch * 0.15);
        rounded_rect(out, rect, 2.0, item.color)?;
        text(out, rect.x1 + fs * 0.4, base, fs, INK, "start", false, &item.name)?;
        x = rect.x1 + fs * 0.4 + estimate_text_width(&item.name, fs) + fs * 1.2;
        if x > l.legend.x1 {
            break;
        }
    }
    Ok(())
}

fn rounded_rect(out: &mut String, r: Rect, radius: f64, fill: Rgb8) -> fmt::Result {
    writeln!(
        out,
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{radius:.1}" fill="{}"/>"#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
        fill.to_hex()
    )
}

#[allow(clippy::too_many_arguments)]
fn text(
    out: &mut String,
    x: f64,
    y: f64,
    size: f64,
    fill: Rgb8,
    anchor: &str,
    bold: bool,
    content: &str,
) -> fmt::Result {
    let weight = if bold { "bold" } else { "normal" };
    writeln!(
        out,
        r#"<text x="{x:.1}" y="{y:.1}" font-size="{size:.1}" font-weight="{weight}" fill="{}" text-anchor="{anchor}">{}</text>"#,
        fill.to_hex(),
        escape_xml(content)
    )
}

// Layout decisions only need an approximation; glyph metrics come from the rasterizer's fonts.
fn estimate_text_width(s: &str, font_size: f64) -> f64 {
    s.chars().count() as f64 * font_size * 0.56
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
