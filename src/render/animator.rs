use std::{collections::HashMap, time::Duration};

use crate::{
    animation::{ease::Ease, tween::Tween},
    ranking::computer::RankingEntry,
    render::layout::width_fraction,
};

/// Per-participant bar width tweens.
///
/// Widths are fractions of the bar track. A participant seen for the first time grows from 0.
/// Retargeting mid-transition continues from the displayed width, and the transition length does
/// not depend on the playback speed.
#[derive(Clone, Debug)]
pub struct BarAnimator {
    duration: Duration,
    ease: Ease,
    bars: HashMap<String, Tween<f64>>,
}

impl BarAnimator {
    /// Animator whose transitions take `duration` along `ease`.
    pub fn new(duration: Duration, ease: Ease) -> Self {
        Self {
            duration,
            ease,
            bars: HashMap::new(),
        }
    }

    /// Aim every bar at its width for `entries` on a `max_scale` axis.
    pub fn retarget(&mut self, now: Duration, entries: &[RankingEntry], max_scale: f64) {
        for entry in entries {
            let target = width_fraction(entry.score, max_scale);
            let (duration, ease) = (self.duration, self.ease);
            self.bars
                .entry(entry.name.clone())
                .or_insert_with(|| Tween::settled(0.0).with_timing(duration, ease))
                .retarget(now, target);
        }
    }

    /// Displayed width of `name` at `now`; unknown bars are empty.
    pub fn width(&self, name: &str, now: Duration) -> f64 {
        self.bars.get(name).map_or(0.0, |t| t.sample(now))
    }

    /// Displayed widths for `entries`, in their order.
    pub fn widths(&self, entries: &[RankingEntry], now: Duration) -> Vec<f64> {
        entries.iter().map(|e| self.width(&e.name, now)).collect()
    }

    /// Width `name` is heading to.
    pub fn target(&self, name: &str) -> Option<f64> {
        self.bars.get(name).map(|t| *t.target())
    }

    /// `true` once no bar is moving at `now`.
    pub fn is_settled(&self, now: Duration) -> bool {
        self.bars.values().all(|t| t.is_settled(now))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/animator.rs"]
mod tests;
