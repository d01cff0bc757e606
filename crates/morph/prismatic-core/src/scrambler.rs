//! Scrambler noise driver.
//!
//! Runs every frame regardless of phase. Inside the first `window_ms` of every
//! `period_ms`, on the first millisecond of each `stride_ms`, a fresh uniform
//! seed is drawn. While enabled the current seed goes to the `factor` uniform.

use rand::Rng;

use crate::config::ScramblerConfig;

/// True when `clock_ms` lands on a reseed slot.
pub fn reseed_due(clock_ms: f64, cfg: &ScramblerConfig) -> bool {
    let span = clock_ms.rem_euclid(cfg.period_ms);
    span < cfg.window_ms && span.rem_euclid(cfg.stride_ms) < 1.0
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scrambler {
    cfg: ScramblerConfig,
    enabled: bool,
    seed: f32,
}

impl Scrambler {
    pub fn new(cfg: ScramblerConfig) -> Self {
        Self {
            enabled: cfg.enabled,
            cfg,
            seed: 0.0,
        }
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn seed(&self) -> f32 {
        self.seed
    }

    /// Flip the keyboard toggle; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// 1.0 when enabled, else 0.0 (the `scramblerActive` uniform encoding).
    #[inline]
    pub fn active_flag(&self) -> f32 {
        if self.enabled {
            1.0
        } else {
            0.0
        }
    }

    /// Reseed if due and return the value for the `factor` uniform, if any.
    pub fn tick<R: Rng>(&mut self, clock_ms: f64, rng: &mut R) -> Option<f32> {
        if reseed_due(clock_ms, &self.cfg) {
            self.seed = rng.random::<f32>();
        }
        self.enabled.then_some(self.seed)
    }
}
