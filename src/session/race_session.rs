use std::time::Duration;

use crate::{
    dataset::model::Dataset,
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::Fps,
    foundation::error::{RaceError, RaceResult},
    playback::{
        controller::{PlaybackController, SpeedPreset},
        script::{ScriptCursor, TransportCommand, TransportScript},
    },
    ranking::computer::RankingComputer,
    render::{
        animator::BarAnimator,
        backend::{ChartStyle, FrameRGBA, RenderBackend},
        text::TextRenderer,
    },
    view::chart::ChartView,
};

/// Options controlling a [`RaceSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct RaceSessionOpts {
    /// Output frame rate of offline renders.
    pub fps: Fps,
    /// Initial milliseconds per round.
    pub speed_ms: u64,
    /// How long the final, settled state stays on screen before a scripted render ends.
    pub tail_hold: Duration,
    /// Hard cap on rendered duration; scripts that never settle are cut here.
    pub max_duration: Duration,
    /// Reuse the previous frame when the displayed state has not changed.
    pub static_frame_elision: bool,
}

impl Default for RaceSessionOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            speed_ms: SpeedPreset::Normal.ms(),
            tail_hold: Duration::from_millis(1500),
            max_duration: Duration::from_secs(600),
            static_frame_elision: true,
        }
    }
}

impl RaceSessionOpts {
    /// Check frame rate and duration bounds.
    pub fn validate(&self) -> RaceResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.max_duration.is_zero() {
            return Err(RaceError::validation("max_duration must be > 0"));
        }
        Ok(())
    }
}

/// Scripted render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames actually rendered by the backend.
    pub frames_rendered: u64,
    /// Frames reused from the previous frame.
    pub frames_elided: u64,
}

/// Dataset, playback controller and bar animator advanced by one clock.
///
/// Round changes are pulled from the controller after every operation; each one recomputes the
/// standings and re-aims the bar tweens at the session's current time.
pub struct RaceSession {
    dataset: Dataset,
    controller: PlaybackController,
    animator: BarAnimator,
    transition: Duration,
    now: Duration,
    shown_round: usize,
    opts: RaceSessionOpts,
}

impl RaceSession {
    /// Start a session idle at round 0; the bars grow in from zero.
    pub fn new(dataset: Dataset, style: &ChartStyle, opts: RaceSessionOpts) -> RaceResult<Self> {
        opts.validate()?;
        let controller = PlaybackController::new(dataset.round_count(), opts.speed_ms);
        let mut animator = BarAnimator::new(style.transition, style.ease);
        animator.retarget(
            Duration::ZERO,
            &RankingComputer::new(&dataset).entries(0),
            dataset.max_scale(),
        );
        Ok(Self {
            dataset,
            controller,
            animator,
            transition: style.transition,
            now: Duration::ZERO,
            shown_round: 0,
            opts,
        })
    }

    /// Loaded dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Playback state machine.
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Session clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Session options.
    pub fn opts(&self) -> &RaceSessionOpts {
        &self.opts
    }

    /// Apply a transport command at the current time.
    pub fn apply(&mut self, cmd: TransportCommand) {
        tracing::debug!(?cmd, now_ms = self.now.as_millis(), "transport command");
        cmd.apply(&mut self.controller);
        self.sync_round();
    }

    /// Move the clock forward by `dt`, applying every due tick at its exact time.
    ///
    /// Returns the number of ticks applied.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let mut remaining = dt;
        let mut ticks = 0;
        while let Some(next) = self.controller.until_next_tick() {
            if next > remaining {
                break;
            }
            self.now += next;
            remaining -= next;
            ticks += self.controller.advance(next);
            self.sync_round();
        }
        self.now += remaining;
        ticks += self.controller.advance(remaining);
        self.sync_round();
        ticks
    }

    /// Advance to the absolute session time `t` (no-op if already past it).
    pub fn advance_to(&mut self, t: Duration) -> usize {
        self.advance(t.saturating_sub(self.now))
    }

    /// Stop playback and let the bars finish their transition.
    pub fn settle(&mut self) {
        if self.controller.is_playing() {
            self.controller.toggle_play();
            self.sync_round();
        }
        self.advance(self.transition);
    }

    /// Whether playback is stopped and no bar is moving.
    pub fn is_settled(&self) -> bool {
        !self.controller.is_playing() && self.animator.is_settled(self.now)
    }

    /// Display values for the current state.
    pub fn view(&self) -> ChartView {
        ChartView::build(&self.dataset, &self.controller)
    }

    /// Displayed bar fractions for `view.entries` at the current time.
    pub fn widths(&self, view: &ChartView) -> Vec<f64> {
        self.animator.widths(&view.entries, self.now)
    }

    /// Render the current state with `backend`.
    pub fn render_frame(&self, backend: &mut dyn RenderBackend) -> RaceResult<FrameRGBA> {
        let view = self.view();
        let widths = self.widths(&view);
        backend.render_frame(&view, &widths)
    }

    /// Render the current state as terminal text.
    pub fn render_text(&self, renderer: &TextRenderer) -> RaceResult<String> {
        let view = self.view();
        renderer.render(&view, &self.widths(&view))
    }

    /// Scrub to `round`, settle the bars and render that state.
    #[tracing::instrument(skip(self, backend))]
    pub fn render_round(
        &mut self,
        round: usize,
        backend: &mut dyn RenderBackend,
    ) -> RaceResult<FrameRGBA> {
        self.apply(TransportCommand::Scrub { round });
        self.settle();
        self.render_frame(backend)
    }

    /// Replay `script` on a virtual clock at the output frame rate and stream frames to `sink`.
    ///
    /// Script times are relative to the session clock when the call starts. Events due between two
    /// frames are applied at their own time, not at the next frame. Rendering stops once the script
    /// is exhausted, playback has stopped and the bars have settled for `tail_hold`, or when
    /// `max_duration` is reached.
    #[tracing::instrument(skip_all, fields(events = script.events.len()))]
    pub fn render_script(
        &mut self,
        script: &TransportScript,
        backend: &mut dyn RenderBackend,
        sink: &mut dyn FrameSink,
    ) -> RaceResult<RenderStats> {
        script.validate()?;
        let canvas = backend.canvas();
        let fps = self.opts.fps;
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
        })?;

        let origin = self.now;
        let mut cursor = ScriptCursor::new(script);
        let mut stats = RenderStats::default();
        let mut previous: Option<(ChartView, Vec<f64>, FrameRGBA)> = None;
        let mut settled_since: Option<Duration> = None;

        for idx in 0u64.. {
            let t = fps.frame_time(idx);
            if t > self.opts.max_duration {
                tracing::warn!(
                    max_ms = self.opts.max_duration.as_millis(),
                    frames = stats.frames_total,
                    "render stopped at max_duration"
                );
                break;
            }

            while let Some(ev) = cursor.pop_due(t) {
                self.advance_to(origin + ev.at());
                self.apply(ev.command);
            }
            self.advance_to(origin + t);

            let view = self.view();
            let widths = self.widths(&view);
            let reuse = self.opts.static_frame_elision
                && previous
                    .as_ref()
                    .is_some_and(|(v, w, _)| *v == view && *w == widths);
            if reuse {
                stats.frames_elided += 1;
            } else {
                let frame = backend.render_frame(&view, &widths)?;
                stats.frames_rendered += 1;
                previous = Some((view, widths, frame));
            }
            let Some((_, _, frame)) = previous.as_ref() else {
                return Err(RaceError::render("no frame rendered"));
            };
            sink.push_frame(idx, frame)?;
            stats.frames_total += 1;

            if cursor.is_exhausted() && self.is_settled() {
                let since = *settled_since.get_or_insert(t);
                if t >= since + self.opts.tail_hold {
                    break;
                }
            } else {
                settled_since = None;
            }
        }

        sink.end()?;
        tracing::info!(
            frames = stats.frames_total,
            rendered = stats.frames_rendered,
            elided = stats.frames_elided,
            "script render finished"
        );
        Ok(stats)
    }

    fn sync_round(&mut self) {
        for event in self.controller.drain_events() {
            tracing::trace!(?event, now_ms = self.now.as_millis(), "playback event");
        }
        let round = self.controller.round();
        if round == self.shown_round {
            return;
        }
        let entries = RankingComputer::new(&self.dataset).entries(round);
        self.animator
            .retarget(self.now, &entries, self.dataset.max_scale());
        self.shown_round = round;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/race_session.rs"]
mod tests;
