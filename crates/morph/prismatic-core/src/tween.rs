//! Tween evaluation: (from, to, elapsed, duration, ease) -> value.
//!
//! Pure and allocation free. Timelines (see `timeline`) compose these into
//! parallel tracks with cue points.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Overshoot used by the back ease.
pub const BACK_OVERSHOOT: f32 = 1.70158;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    /// `1 - (1 - t)^2`
    QuadOut,
    /// Back-out: overshoots the target then settles. Not bounded to [0, 1].
    BackOut,
}

impl Ease {
    /// Map normalized time `t` in [0, 1] to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::BackOut => {
                let u = t - 1.0;
                u * u * ((BACK_OVERSHOOT + 1.0) * u + BACK_OVERSHOOT) + 1.0
            }
        }
    }
}

/// Values a tween can interpolate.
pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

impl Lerp for Vector3<f32> {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

/// One evaluated tick of a tween.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample<V> {
    pub value: V,
    pub completed: bool,
}

/// Evaluate a tween at `elapsed`. Once `elapsed >= duration` the exact end
/// value is returned and `completed` is set.
pub fn sample<V: Lerp>(from: V, to: V, elapsed: f32, duration: f32, ease: Ease) -> Sample<V> {
    if duration <= 0.0 || elapsed >= duration {
        return Sample {
            value: to,
            completed: true,
        };
    }
    let t = (elapsed / duration).max(0.0);
    Sample {
        value: V::lerp(from, to, ease.apply(t)),
        completed: false,
    }
}

/// A single timed interpolation starting `delay` after its timeline starts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tween<V> {
    pub from: V,
    pub to: V,
    pub delay: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl<V: Lerp> Tween<V> {
    pub fn new(from: V, to: V, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay: 0.0,
            duration,
            ease,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Time at which this tween finishes, relative to its timeline's start.
    #[inline]
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }

    /// Sample at timeline-local time `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Sample<V> {
        sample(self.from, self.to, t - self.delay, self.duration, self.ease)
    }
}
