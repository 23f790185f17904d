//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order and are driven by `RaceSession::render_script`.

/// `ffmpeg`-based MP4 output via the system `ffmpeg`.
pub(crate) mod ffmpeg;
/// PNG files and PNG sequences.
pub(crate) mod png;
/// Generic frame sink trait and the in-memory sink.
pub(crate) mod sink;
