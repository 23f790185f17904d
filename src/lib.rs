//! racechart renders animated "bar chart race" standings for prediction leagues.
//!
//! The public API is session-oriented:
//!
//! - Load and validate a [`Dataset`] (per-round scores and ranks of every participant)
//! - Query standings, gains and the top performer with a [`RankingComputer`]
//! - Drive a [`RaceSession`] with [`TransportCommand`]s on an explicit clock
//! - Render frames through a [`RenderBackend`] (SVG rasterized by `resvg`) or as terminal text,
//!   and stream scripted renders into a [`FrameSink`] (PNG sequence or MP4 via `ffmpeg`)
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod dataset;
pub(crate) mod encode;
pub(crate) mod playback;
pub(crate) mod ranking;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod view;

pub use crate::foundation::core::{Canvas, Fps, Point, Rect, Rgb8, Size};
pub use crate::foundation::error::{RaceError, RaceResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{Lerp, Tween};
pub use crate::dataset::load::{load_dataset, parse_dataset};
pub use crate::dataset::model::{Dataset, DatasetDef, Participant, ParticipantDef, Round};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::playback::controller::{
    MIN_SPEED_MS, PlaybackController, PlaybackEvent, PlaybackPhase, PlaybackState, SpeedPreset,
};
pub use crate::playback::script::{ScriptCursor, ScriptEvent, TransportCommand, TransportScript};
pub use crate::playback::timer::{IntervalTimer, TimerId};
pub use crate::ranking::computer::{Gain, RankingComputer, RankingEntry};
pub use crate::render::animator::BarAnimator;
pub use crate::render::backend::{ChartStyle, FrameRGBA, RenderBackend};
pub use crate::render::layout::{ChartLayout, width_fraction};
pub use crate::render::raster::{SvgBackend, SvgRasterizer};
pub use crate::render::svg::{chart_svg, escape_xml};
pub use crate::render::text::{TextRenderer, bar_glyphs};
pub use crate::session::race_session::{RaceSession, RaceSessionOpts, RenderStats};
pub use crate::view::chart::{
    ChartView, DEFAULT_TITLE, LegendEntry, PlayButton, ScrubView, TransportView, format_gain,
    format_points,
};
pub use crate::view::color::{BRIGHTNESS_THRESHOLD, TextTone};
