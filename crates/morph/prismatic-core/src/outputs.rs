//! Output contracts from the core engine.
//!
//! Outputs carry the full renderer-facing state for this tick plus a list of
//! semantic events. The particle buffer is only rewritten when particles moved
//! (see `particles_dirty`).

use serde::{Deserialize, Serialize};

use crate::inputs::Hover;
use crate::labels::LabelState;
use crate::phase::{Phase, Trigger};
use crate::scene::SceneState;
use crate::uniforms::UniformWrite;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Auto,
    Pointer,
}

impl Cursor {
    /// Pointer over clickable things, and over empty space while the morph
    /// waits for its second click.
    ///
    /// `Hover::Other` (facet forms, particle cloud) resets to `Auto` rather
    /// than keeping whatever cursor the previous frame showed; the hint is a
    /// pure function of this frame's phase and hover.
    pub fn for_hover(phase: Phase, hover: Hover) -> Self {
        match hover {
            Hover::Shape | Hover::Label => Cursor::Pointer,
            Hover::Nothing if phase == Phase::ToPrism => Cursor::Pointer,
            Hover::Nothing | Hover::Other => Cursor::Auto,
        }
    }
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreEvent {
    PhaseChanged { from: Phase, to: Phase },
    /// The reveal cue fired: shape hidden, facet forms shown.
    FacetsRevealed,
    InteractionIgnored { phase: Phase, trigger: Trigger },
    OpenLink { title: String, link: String },
    ScramblerToggled { enabled: bool },
}

/// Outputs returned by Engine::update().
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Outputs {
    pub epoch: u64,
    pub phase: Phase,
    pub scene: SceneState,
    #[serde(default)]
    pub labels: Vec<LabelState>,
    /// Flat xyz buffer; valid when `particles_dirty` is set.
    #[serde(skip)]
    pub particle_positions: Vec<f32>,
    pub particles_dirty: bool,
    /// Uniform values pushed to every shader ref this tick.
    pub uniforms: UniformWrite,
    pub cursor: Cursor,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    pub(crate) fn new(scene: SceneState) -> Self {
        Self {
            epoch: 0,
            phase: Phase::Idle,
            scene,
            labels: Vec::new(),
            particle_positions: Vec::new(),
            particles_dirty: false,
            uniforms: UniformWrite::default(),
            cursor: Cursor::Auto,
            events: Vec::new(),
        }
    }

    /// Reset per-tick fields. The particle buffer keeps its last contents.
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.uniforms = UniformWrite::default();
        self.particles_dirty = false;
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    pub fn phase_changes(&self) -> impl Iterator<Item = (Phase, Phase)> + '_ {
        self.events.iter().filter_map(|e| match e {
            CoreEvent::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
    }
}
