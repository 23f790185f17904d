use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::{
        ffmpeg::ensure_parent_dir,
        sink::{FrameSink, SinkConfig},
    },
    foundation::{
        core::Rgb8,
        error::{RaceError, RaceResult},
        math::flatten_premul_over_bg,
    },
    render::backend::FrameRGBA,
};

/// Write `frame` as an opaque PNG, flattening alpha over `bg`.
pub fn write_png(path: &Path, frame: &FrameRGBA, bg: Rgb8) -> RaceResult<()> {
    let mut rgba = vec![0u8; frame.data.len()];
    if frame.premultiplied {
        flatten_premul_over_bg(&mut rgba, &frame.data, bg)?;
    } else {
        rgba.copy_from_slice(&frame.data);
    }
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Sink that writes `frame_000000.png`, `frame_000001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    bg: Rgb8,
    cfg: Option<SinkConfig>,
    last_idx: Option<u64>,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing into `dir` (created on `begin`), flattening alpha over `bg`.
    pub fn new(dir: impl Into<PathBuf>, bg: Rgb8) -> Self {
        Self {
            dir: dir.into(),
            bg,
            cfg: None,
            last_idx: None,
            written: 0,
        }
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("frame_{idx:06}.png"))
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> RaceResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create png sequence dir '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> RaceResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| RaceError::encode("png sequence sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(RaceError::encode(
                "png sequence sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(RaceError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        write_png(&self.frame_path(idx), frame, self.bg)?;
        self.last_idx = Some(idx);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> RaceResult<()> {
        tracing::info!(frames = self.written, dir = %self.dir.display(), "png sequence written");
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
