//! Morph phases and the transition table.

use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};

/// Current step of the morph sequence. Exactly one per engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    /// Shape spins down while the facet forms spin up.
    ToPrism,
    /// Fold intensity eases from its start value to its end value.
    Unfold,
    /// Labels fade in; particles converge on the facet vertices.
    Labels,
    /// One frame: particles get bound to graph edges.
    ToParticles,
    /// Steady state: particles drift back and forth along their edges.
    SwapParticles,
}

impl Phase {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ToPrism => "toPrism",
            Self::Unfold => "unfold",
            Self::Labels => "labels",
            Self::ToParticles => "toParticles",
            Self::SwapParticles => "swapParticles",
        }
    }
}

/// Anything that can move the machine: host interactions and conditions the
/// engine observes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Pointer-down on the main shape.
    Primary,
    /// Pointer-down on a facet form. In `toPrism` either pick unfolds.
    Secondary,
    UnfoldComplete,
    ParticlesConverged,
    TravelAssigned,
}

/// The whole transition table. Every pair not listed is illegal.
pub fn transition(from: Phase, trigger: Trigger) -> Result<Phase> {
    use Phase::*;
    use Trigger::*;
    match (from, trigger) {
        (Idle, Primary) => Ok(ToPrism),
        // any pick counts: before the reveal cue the shape is the only target
        (ToPrism, Primary | Secondary) => Ok(Unfold),
        (Unfold, UnfoldComplete) => Ok(Labels),
        (Labels, ParticlesConverged) => Ok(ToParticles),
        (ToParticles, TravelAssigned) => Ok(SwapParticles),
        _ => Err(MorphError::IllegalTransition { from, trigger }),
    }
}
