use std::time::Duration;

use crate::animation::ease::Ease;

/// Values that can be linearly interpolated.
pub trait Lerp: Sized {
    /// Interpolate from `a` (t = 0) to `b` (t = 1).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// A fixed-duration eased transition between two values on an absolute clock.
///
/// Times are offsets from an arbitrary epoch shared by all tweens of one animator.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: Duration,
    duration: Duration,
    ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone + PartialEq,
{
    /// Start a transition from `from` to `to` at time `start`.
    pub fn new(from: T, to: T, start: Duration, duration: Duration, ease: Ease) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            ease,
        }
    }

    /// A tween that already rests at `value`.
    pub fn settled(value: T) -> Self {
        Self::new(
            value.clone(),
            value,
            Duration::ZERO,
            Duration::ZERO,
            Ease::Linear,
        )
    }

    /// Target value.
    pub fn target(&self) -> &T {
        &self.to
    }

    /// Value at time `now`.
    pub fn sample(&self, now: Duration) -> T {
        if self.duration.is_zero() || now >= self.start + self.duration {
            return self.to.clone();
        }
        if now <= self.start {
            return self.from.clone();
        }
        let t = (now - self.start).as_secs_f64() / self.duration.as_secs_f64();
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }

    /// `true` once the tween has reached its target at `now`.
    pub fn is_settled(&self, now: Duration) -> bool {
        self.duration.is_zero() || now >= self.start + self.duration || self.from == self.to
    }

    /// Re-aim at `to`, continuing from whatever value is displayed at `now`.
    ///
    /// Re-aiming at the current target is a no-op so in-flight transitions keep their timing.
    pub fn retarget(&mut self, now: Duration, to: T) {
        if self.to == to {
            return;
        }
        let current = self.sample(now);
        self.from = current;
        self.to = to;
        self.start = now;
    }

    /// Replace duration and ease used by the next [`Tween::retarget`].
    pub fn with_timing(mut self, duration: Duration, ease: Ease) -> Self {
        self.duration = duration;
        self.ease = ease;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
