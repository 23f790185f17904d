use crate::foundation::{
    core::Rgb8,
    error::{RaceError, RaceResult},
};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Round `v` up to the next multiple of `step` (`step > 0`).
pub(crate) fn ceil_to_multiple(v: f64, step: f64) -> f64 {
    if step <= 0.0 || !v.is_finite() {
        return v;
    }
    (v / step).ceil() * step
}

/// Composite premultiplied RGBA8 pixels over an opaque background into opaque RGBA8.
///
/// `dst` and `src_premul` must have the same length, a multiple of 4.
pub(crate) fn flatten_premul_over_bg(dst: &mut [u8], src_premul: &[u8], bg: Rgb8) -> RaceResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(RaceError::validation(
            "flatten_premul_over_bg expects equal-length rgba8 buffers",
        ));
    }

    let (bg_r, bg_g, bg_b) = (u16::from(bg.r), u16::from(bg.g), u16::from(bg.b));
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        d[0] = (u16::from(s[0]) + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
