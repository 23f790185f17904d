use std::time::Duration;

/// Identity of one started timer. Ids increase monotonically per controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct TimerId(pub u64);

/// A recurring timer on an externally driven clock.
///
/// The timer never observes wall time; its owner feeds elapsed durations through
/// [`IntervalTimer::fire_within`] and handles each due tick before asking for the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalTimer {
    id: TimerId,
    period: Duration,
    until_next: Duration,
}

impl IntervalTimer {
    /// Start a timer whose first tick is one full `period` away.
    pub fn start(id: TimerId, period: Duration) -> Self {
        Self {
            id,
            period,
            until_next: period,
        }
    }

    /// Timer identity.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Tick interval.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left until the next tick.
    pub fn until_next(&self) -> Duration {
        self.until_next
    }

    /// Spend up to `elapsed` waiting for the next tick.
    ///
    /// Returns the unspent remainder if a tick became due, `None` if `elapsed` ran out first.
    pub fn fire_within(&mut self, elapsed: Duration) -> Option<Duration> {
        if elapsed >= self.until_next {
            let rest = elapsed - self.until_next;
            self.until_next = self.period;
            Some(rest)
        } else {
            self.until_next -= elapsed;
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/timer.rs"]
mod tests;
