use std::time::Duration;

use crate::playback::timer::{IntervalTimer, TimerId};

/// Lower bound for the tick interval.
pub const MIN_SPEED_MS: u64 = 1;

/// Discrete speed settings offered by the transport controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPreset {
    /// 2000 ms per round.
    Slow,
    /// 1000 ms per round.
    #[default]
    Normal,
    /// 500 ms per round.
    Fast,
}

impl SpeedPreset {
    /// All presets, slowest first.
    pub const ALL: [SpeedPreset; 3] = [Self::Slow, Self::Normal, Self::Fast];

    /// Tick interval in milliseconds.
    pub fn ms(self) -> u64 {
        match self {
            Self::Slow => 2000,
            Self::Normal => 1000,
            Self::Fast => 500,
        }
    }

    /// The preset whose interval is exactly `ms`, if any.
    pub fn from_ms(ms: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.ms() == ms)
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
        }
    }
}

/// Coarse controller state, derived from the round index and the play flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlaybackPhase {
    /// Not playing and not parked on the last round.
    Idle,
    /// A timer is running.
    Playing,
    /// Not playing and parked on the last round.
    Finished,
}

/// Snapshot of the controller's mutable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlaybackState {
    /// Current round, always inside `[0, round_count - 1]`.
    pub round: usize,
    /// Whether autoplay is active.
    pub playing: bool,
    /// Milliseconds per tick.
    pub speed_ms: u64,
}

/// Observable side effects of controller operations, in the order they happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Autoplay began.
    Started,
    /// Autoplay stopped before the last round.
    Paused,
    /// Autoplay reached the last round and stopped.
    Finished,
    /// The current round changed.
    RoundChanged {
        /// Previous round.
        from: usize,
        /// New round.
        to: usize,
    },
    /// A new timer was created.
    TimerStarted(TimerId),
    /// A timer was torn down.
    TimerCancelled(TimerId),
}

/// Autoplay/scrub state machine owning exactly zero or one interval timer.
///
/// The controller is clock-agnostic: callers report elapsed time through
/// [`PlaybackController::advance`], and ticks are applied synchronously inside that call. Any
/// operation that stops or restarts playback removes the current timer before it returns, so no
/// stale tick can run afterwards. Dropping the controller disposes it.
#[derive(Debug)]
pub struct PlaybackController {
    round_count: usize,
    state: PlaybackState,
    timer: Option<IntervalTimer>,
    next_timer_id: u64,
    disposed: bool,
    events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Controller for `round_count` rounds (at least one), idle at round 0.
    pub fn new(round_count: usize, speed_ms: u64) -> Self {
        Self {
            round_count: round_count.max(1),
            state: PlaybackState {
                round: 0,
                playing: false,
                speed_ms: speed_ms.max(MIN_SPEED_MS),
            },
            timer: None,
            next_timer_id: 1,
            disposed: false,
            events: Vec::new(),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current phase.
    pub fn phase(&self) -> PlaybackPhase {
        if self.state.playing {
            PlaybackPhase::Playing
        } else if self.state.round >= self.last_round() {
            PlaybackPhase::Finished
        } else {
            PlaybackPhase::Idle
        }
    }

    /// Current round.
    pub fn round(&self) -> usize {
        self.state.round
    }

    /// Whether autoplay is active.
    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    /// Milliseconds per tick.
    pub fn speed_ms(&self) -> u64 {
        self.state.speed_ms
    }

    /// Number of rounds.
    pub fn round_count(&self) -> usize {
        self.round_count
    }

    /// Index of the last round.
    pub fn last_round(&self) -> usize {
        self.round_count - 1
    }

    /// Id of the running timer, if any.
    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer.as_ref().map(IntervalTimer::id)
    }

    /// Time until the running timer's next tick, if any.
    pub fn until_next_tick(&self) -> Option<Duration> {
        self.timer.as_ref().map(IntervalTimer::until_next)
    }

    /// Whether [`PlaybackController::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Play/pause. From the finished state this restarts at round 0.
    pub fn toggle_play(&mut self) {
        if self.disposed {
            return;
        }
        match self.phase() {
            PlaybackPhase::Finished => {
                self.set_round(0);
                self.play();
            }
            PlaybackPhase::Playing => self.pause(),
            PlaybackPhase::Idle => self.play(),
        }
    }

    /// Jump to round 0 and stop.
    pub fn reset(&mut self) {
        if self.disposed {
            return;
        }
        if self.state.playing {
            self.pause();
        }
        self.cancel_timer();
        self.set_round(0);
    }

    /// Jump to `round` (clamped). A scrub always pauses playback.
    pub fn scrub(&mut self, round: usize) {
        if self.disposed {
            return;
        }
        let target = round.min(self.last_round());
        if target != round {
            tracing::warn!(requested = round, clamped = target, "scrub target clamped");
        }
        if self.state.playing {
            self.pause();
        }
        self.set_round(target);
    }

    /// Change the tick interval.
    ///
    /// While playing, the running timer is replaced by one at the new interval whose first tick is
    /// one full new interval away. Setting the current speed again changes nothing.
    pub fn set_speed(&mut self, speed_ms: u64) {
        if self.disposed {
            return;
        }
        let speed_ms = speed_ms.max(MIN_SPEED_MS);
        if speed_ms == self.state.speed_ms {
            return;
        }
        tracing::debug!(from = self.state.speed_ms, to = speed_ms, "speed changed");
        self.state.speed_ms = speed_ms;
        if self.state.playing {
            self.cancel_timer();
            self.start_timer();
        }
    }

    /// Feed `elapsed` time to the timer and apply every tick that becomes due, in order.
    ///
    /// Returns the number of ticks applied. Ticks stop as soon as playback stops.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.disposed {
            return 0;
        }
        let mut remaining = elapsed;
        let mut ticks = 0;
        while let Some(timer) = self.timer.as_mut() {
            let Some(rest) = timer.fire_within(remaining) else {
                break;
            };
            remaining = rest;
            ticks += 1;
            self.on_tick();
        }
        ticks
    }

    /// Tear down the timer and ignore every later operation.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_timer();
        self.state.playing = false;
        self.disposed = true;
        tracing::debug!(round = self.state.round, "playback controller disposed");
    }

    fn on_tick(&mut self) {
        if !self.state.playing {
            return;
        }
        let last = self.last_round();
        if self.state.round >= last {
            self.finish();
            return;
        }
        self.set_round(self.state.round + 1);
        if self.state.round >= last {
            self.finish();
        }
    }

    fn play(&mut self) {
        self.state.playing = true;
        self.start_timer();
        self.events.push(PlaybackEvent::Started);
        tracing::debug!(
            round = self.state.round,
            speed_ms = self.state.speed_ms,
            "playback started"
        );
    }

    fn pause(&mut self) {
        self.cancel_timer();
        self.state.playing = false;
        self.events.push(PlaybackEvent::Paused);
        tracing::debug!(round = self.state.round, "playback paused");
    }

    fn finish(&mut self) {
        self.cancel_timer();
        self.state.playing = false;
        self.events.push(PlaybackEvent::Finished);
        tracing::debug!(round = self.state.round, "playback finished");
    }

    fn start_timer(&mut self) {
        self.cancel_timer();
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        self.timer = Some(IntervalTimer::start(
            id,
            Duration::from_millis(self.state.speed_ms),
        ));
        self.events.push(PlaybackEvent::TimerStarted(id));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.events.push(PlaybackEvent::TimerCancelled(timer.id()));
        }
    }

    fn set_round(&mut self, to: usize) {
        let from = self.state.round;
        if from != to {
            self.state.round = to;
            self.events.push(PlaybackEvent::RoundChanged { from, to });
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
