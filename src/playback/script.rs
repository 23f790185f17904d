use std::{path::Path, str::FromStr, time::Duration};

use anyhow::Context as _;

use crate::{
    foundation::error::{RaceError, RaceResult},
    playback::controller::{PlaybackController, SpeedPreset},
};

/// A user-facing transport operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransportCommand {
    /// Play/pause (restart when finished).
    TogglePlay,
    /// Rewind to round 0 and stop.
    Reset,
    /// Jump to a round and pause.
    Scrub {
        /// Target round (clamped).
        round: usize,
    },
    /// Set an explicit tick interval.
    SetSpeed {
        /// Milliseconds per round.
        ms: u64,
    },
    /// Select a speed preset.
    Speed {
        /// Preset to select.
        preset: SpeedPreset,
    },
}

impl TransportCommand {
    /// Apply the command to a controller.
    pub fn apply(self, controller: &mut PlaybackController) {
        match self {
            Self::TogglePlay => controller.toggle_play(),
            Self::Reset => controller.reset(),
            Self::Scrub { round } => controller.scrub(round),
            Self::SetSpeed { ms } => controller.set_speed(ms),
            Self::Speed { preset } => controller.set_speed(preset.ms()),
        }
    }
}

impl FromStr for TransportCommand {
    type Err = RaceError;

    /// Parse the short command language of the interactive player.
    ///
    /// `p`/`play`/`pause`, `r`/`reset`, `s N`/`scrub N`, `slow`/`normal`/`fast`, `speed MS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(RaceError::validation("empty command"));
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(RaceError::validation(format!("too many arguments in '{s}'")));
        }

        let number = |what: &str| -> RaceResult<u64> {
            let Some(raw) = arg else {
                return Err(RaceError::validation(format!("'{head}' needs {what}")));
            };
            raw.parse::<u64>()
                .map_err(|e| RaceError::validation(format!("invalid {what} '{raw}': {e}")))
        };

        let cmd = match head.to_ascii_lowercase().as_str() {
            "p" | "play" | "pause" | "toggle" => Self::TogglePlay,
            "r" | "reset" => Self::Reset,
            "s" | "scrub" => Self::Scrub {
                round: usize::try_from(number("a round number")?).unwrap_or(usize::MAX),
            },
            "speed" => Self::SetSpeed {
                ms: number("milliseconds")?,
            },
            "slow" => Self::Speed {
                preset: SpeedPreset::Slow,
            },
            "normal" => Self::Speed {
                preset: SpeedPreset::Normal,
            },
            "fast" => Self::Speed {
                preset: SpeedPreset::Fast,
            },
            other => {
                return Err(RaceError::validation(format!("unknown command '{other}'")));
            }
        };

        let takes_arg = matches!(cmd, Self::Scrub { .. } | Self::SetSpeed { .. });
        if !takes_arg && arg.is_some() {
            return Err(RaceError::validation(format!("'{head}' takes no argument")));
        }
        Ok(cmd)
    }
}

/// A transport command scheduled at an absolute time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptEvent {
    /// Milliseconds from the start of the session.
    pub at_ms: u64,
    /// Command to apply.
    pub command: TransportCommand,
}

impl ScriptEvent {
    /// Event time as a duration.
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// Timed list of transport commands replayed by offline renders.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransportScript {
    /// Events sorted by `at_ms`.
    pub events: Vec<ScriptEvent>,
}

impl TransportScript {
    /// Press play at `t = 0` and let the race run to the end.
    pub fn autoplay() -> Self {
        Self {
            events: vec![ScriptEvent {
                at_ms: 0,
                command: TransportCommand::TogglePlay,
            }],
        }
    }

    /// Check ordering and values.
    pub fn validate(&self) -> RaceResult<()> {
        if !self.events.windows(2).all(|w| w[0].at_ms <= w[1].at_ms) {
            return Err(RaceError::validation(
                "transport script events must be sorted by at_ms",
            ));
        }
        if self
            .events
            .iter()
            .any(|e| matches!(e.command, TransportCommand::SetSpeed { ms: 0 }))
        {
            return Err(RaceError::validation("set_speed ms must be > 0"));
        }
        Ok(())
    }

    /// Parse and validate a script from JSON; an empty event list means [`TransportScript::autoplay`].
    pub fn parse(json: &str) -> RaceResult<Self> {
        let script: Self = serde_json::from_str(json)
            .map_err(|e| RaceError::serde(format!("parse transport script JSON: {e}")))?;
        script.validate()?;
        if script.events.is_empty() {
            return Ok(Self::autoplay());
        }
        Ok(script)
    }

    /// Read, parse and validate a script file.
    pub fn load(path: &Path) -> RaceResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read transport script '{}'", path.display()))?;
        Self::parse(&text)
    }

    /// Time of the last event.
    pub fn end(&self) -> Duration {
        self.events.last().map(ScriptEvent::at).unwrap_or_default()
    }
}

/// Replay position within a [`TransportScript`].
#[derive(Clone, Debug)]
pub struct ScriptCursor {
    events: Vec<ScriptEvent>,
    next: usize,
}

impl ScriptCursor {
    /// Start at the first event.
    pub fn new(script: &TransportScript) -> Self {
        Self {
            events: script.events.clone(),
            next: 0,
        }
    }

    /// The next pending event if it is due at or before `now`; consumes it.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScriptEvent> {
        let ev = *self.events.get(self.next)?;
        if ev.at() > now {
            return None;
        }
        self.next += 1;
        Some(ev)
    }

    /// Whether every event has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.next >= self.events.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/script.rs"]
mod tests;
