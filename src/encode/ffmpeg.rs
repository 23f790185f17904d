use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Rgb8;
use crate::foundation::error::{RaceError, RaceResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background used to flatten alpha.
    pub bg: Rgb8,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg: Rgb8::new(0, 0, 0),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams opaque RGBA frames to its stdin.
///
/// The chart has no audio, so the output is a silent H.264 MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<u64>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> RaceResult<()> {
        check_mp4_config(&cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(RaceError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(RaceError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        self.encoder = Some(Encoder::spawn(mp4_args(&self.opts, &cfg))?);
        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> RaceResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| RaceError::encode("ffmpeg sink not started"))?;
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(RaceError::encode(format!(
                "frame {idx} arrived out of order for the mp4 stream"
            )));
        }
        if frame.width != cfg.width
            || frame.height != cfg.height
            || frame.data.len() != self.scratch.len()
        {
            return Err(RaceError::validation(format!(
                "frame is {}x{} ({} bytes), the mp4 stream expects {}x{}",
                frame.width,
                frame.height,
                frame.data.len(),
                cfg.width,
                cfg.height
            )));
        }
        self.last_idx = Some(idx);

        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.scratch, &frame.data, self.opts.bg)?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| RaceError::encode("ffmpeg sink is already finalized"))?;
        encoder.write(&self.scratch)
    }

    fn end(&mut self) -> RaceResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| RaceError::encode("ffmpeg sink not started"))?;
        encoder.finish()?;
        tracing::info!(
            out = %self.opts.out_path.display(),
            frames = self.last_idx.map_or(0, |i| i + 1),
            "mp4 written"
        );
        self.cfg = None;
        Ok(())
    }
}

/// A running `ffmpeg` child with its stdin pipe and a thread collecting stderr.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
}

impl Encoder {
    fn spawn(args: Vec<OsString>) -> RaceResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RaceError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RaceError::encode("ffmpeg stdin is not piped"))?;
        let mut pipe = child
            .stderr
            .take()
            .ok_or_else(|| RaceError::encode("ffmpeg stderr is not piped"))?;
        // ffmpeg blocks once its stderr pipe fills up, so it is read on the side.
        let stderr = std::thread::spawn(move || {
            let mut log = Vec::new();
            pipe.read_to_end(&mut log)?;
            Ok(log)
        });
        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn write(&mut self, rgba: &[u8]) -> RaceResult<()> {
        self.stdin
            .write_all(rgba)
            .map_err(|e| RaceError::encode(format!("failed to stream frame to ffmpeg: {e}")))
    }

    fn finish(self) -> RaceResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
        } = self;
        // Closing stdin is ffmpeg's end-of-stream signal.
        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| RaceError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| RaceError::encode("ffmpeg stderr reader panicked"))?
            .map_err(|e| RaceError::encode(format!("failed to read ffmpeg stderr: {e}")))?;
        if !status.success() {
            return Err(RaceError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        Ok(())
    }
}

/// Reject configurations that a yuv420p H.264 stream cannot represent.
fn check_mp4_config(cfg: &SinkConfig) -> RaceResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(RaceError::validation("mp4 frame rate must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(RaceError::validation("mp4 frame size must be non-zero"));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(RaceError::validation(format!(
            "mp4 frame size must be even for yuv420p, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Command line for one silent MP4 fed with raw RGBA frames on stdin.
///
/// The rational frame rate goes before `-i` so it sets the input rate of the raw stream.
fn mp4_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<OsString> {
    let overwrite = if opts.overwrite { "-y" } else { "-n" };
    let size = format!("{}x{}", cfg.width, cfg.height);
    let rate = format!("{}/{}", cfg.fps.num, cfg.fps.den);
    let mut args: Vec<OsString> = [
        overwrite,
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        size.as_str(),
        "-r",
        rate.as_str(),
        "-i",
        "pipe:0",
        "-an",
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> RaceResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
