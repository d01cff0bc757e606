//! Core configuration for prismatic-core.
//!
//! Every constant of the motion design lives here so hosts can tune the
//! choreography from JSON without touching the engine.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};
use crate::labels::LabelSpec;

/// Top-level engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for every random draw (spawn positions, particle speeds, scrambler seeds).
    pub seed: u64,
    pub prism: PrismConfig,
    /// One label per prism side; the label count also fixes the prism's segment count.
    pub labels: Vec<LabelSpec>,
    pub label_scale: f32,
    /// Labels sit on their anchor vertex pushed outwards by this factor.
    pub label_vertex_scale: f32,
    /// Opacity added to each label per frame during the labels phase.
    pub label_fade_step: f32,
    pub morph: MorphConfig,
    pub swarm: SwarmConfig,
    pub scrambler: ScramblerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0x5eed_f00d,
            prism: PrismConfig::default(),
            labels: LabelSpec::default_payload(),
            label_scale: 12.0,
            label_vertex_scale: 1.2,
            label_fade_step: 0.1,
            morph: MorphConfig::default(),
            swarm: SwarmConfig::default(),
            scrambler: ScramblerConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON config. Missing fields fall back to defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would break the engine's preconditions.
    pub fn validate(&self) -> Result<()> {
        if self.labels.len() < 3 {
            return Err(MorphError::invalid(format!(
                "need at least 3 labels to build a prism, got {}",
                self.labels.len()
            )));
        }
        if self.swarm.particles_per_vertex == 0 {
            return Err(MorphError::invalid("particles_per_vertex must be > 0"));
        }
        if !(self.swarm.max_speed > 0.0) {
            return Err(MorphError::invalid("swarm.max_speed must be > 0"));
        }
        if !(self.swarm.blend_weight >= 0.0) {
            return Err(MorphError::invalid("swarm.blend_weight must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.morph.reveal_cue) {
            return Err(MorphError::invalid(format!(
                "morph.reveal_cue must be a fraction in [0, 1], got {}",
                self.morph.reveal_cue
            )));
        }
        if !(self.morph.unfold_duration > 0.0) {
            return Err(MorphError::invalid("morph.unfold_duration must be > 0"));
        }
        for (name, m) in [
            ("shape", &self.morph.shape),
            ("solid", &self.morph.solid),
            ("wire", &self.morph.wire),
            ("points", &self.morph.points),
        ] {
            if !(m.rotation_duration > 0.0 && m.scale_duration > 0.0) {
                return Err(MorphError::invalid(format!(
                    "morph.{name} durations must be > 0"
                )));
            }
        }
        if !(self.label_fade_step > 0.0) {
            return Err(MorphError::invalid("label_fade_step must be > 0"));
        }
        if self.scrambler.period_ms <= 0.0 || self.scrambler.stride_ms <= 0.0 {
            return Err(MorphError::invalid(
                "scrambler period_ms and stride_ms must be > 0",
            ));
        }
        Ok(())
    }
}

/// Dimensions of the faceted form.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismConfig {
    pub radius: f32,
    pub height: f32,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            height: 2.0,
        }
    }
}

/// Rotation/scale targets for one mesh during `toPrism`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MeshMorph {
    pub rotation: [f32; 3],
    pub rotation_duration: f32,
    pub scale: f32,
    pub scale_duration: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub shape: MeshMorph,
    pub solid: MeshMorph,
    pub wire: MeshMorph,
    pub points: MeshMorph,
    /// Fraction of the point-form timeline at which the facet forms are revealed.
    pub reveal_cue: f32,
    pub unfold_duration: f32,
    pub fold_intensity_start: f32,
    pub fold_intensity_end: f32,
}

const PRISM_ROTATION: [f32; 3] = [PI * 6.4, -PI * 8.1, PI * 4.0];

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            shape: MeshMorph {
                rotation: [PI * 5.0, -PI * 0.25, PI * 2.0],
                rotation_duration: 2.0,
                scale: 0.4,
                scale_duration: 1.0,
            },
            solid: MeshMorph {
                rotation: PRISM_ROTATION,
                rotation_duration: 1.2,
                scale: 3.2,
                scale_duration: 1.5,
            },
            wire: MeshMorph {
                rotation: PRISM_ROTATION,
                rotation_duration: 1.2,
                scale: 3.55,
                scale_duration: 1.5,
            },
            points: MeshMorph {
                rotation: PRISM_ROTATION,
                rotation_duration: 1.2,
                scale: 3.55,
                scale_duration: 1.5,
            },
            reveal_cue: 0.7,
            unfold_duration: 1.0,
            fold_intensity_start: 2.0,
            fold_intensity_end: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub particles_per_vertex: usize,
    /// Particles spawn uniformly in `[-spawn_extent, spawn_extent)` on each axis.
    pub spawn_extent: f32,
    /// Speeds are drawn uniformly from `[0, max_speed)`.
    pub max_speed: f32,
    /// Distance under which a particle counts as arrived.
    pub arrive_distance: f32,
    /// Weight of the old position in the labels-phase blend `(old*w + target) / (w + 1)`.
    pub blend_weight: f32,
    /// Clamp each swarm step to the remaining distance instead of overshooting.
    pub clamp_overshoot: bool,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            particles_per_vertex: 60,
            spawn_extent: 400.0,
            max_speed: 0.1,
            arrive_distance: 0.2,
            blend_weight: 4.0,
            clamp_overshoot: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScramblerConfig {
    pub enabled: bool,
    pub period_ms: f64,
    /// Reseeds happen only while `clock % period < window`.
    pub window_ms: f64,
    /// ... and only on the first millisecond of every stride inside the window.
    pub stride_ms: f64,
}

impl Default for ScramblerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period_ms: 300.0,
            window_ms: 70.0,
            stride_ms: 10.0,
        }
    }
}
