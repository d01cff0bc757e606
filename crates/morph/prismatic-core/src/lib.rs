//! Prismatic Core (renderer-agnostic)
//!
//! Drives the shape -> facets -> labels -> particle swarm morph. The host
//! renderer calls `Engine::update()` once per display refresh with the frame's
//! `dt` and any pointer/keyboard interactions, then applies the returned
//! `Outputs` (transforms, visibility, label opacity, particle buffer) and lets
//! the uniform bridge write shader scalars.
//!
//! Building blocks, leaves first: `topology` (adjacency from faces), `tween`
//! and `timeline` (explicitly-driven easing), `swarm` (particle pool),
//! `phase` (transition table), `uniforms` (one-way shader bridge).

pub mod config;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod labels;
pub mod mesh;
pub mod outputs;
pub mod phase;
pub mod scene;
pub mod scrambler;
pub mod swarm;
pub mod timeline;
pub mod topology;
pub mod tween;
pub mod uniforms;

// Re-exports for consumers (adapters)
pub use config::{Config, MorphConfig, ScramblerConfig, SwarmConfig};
pub use engine::Engine;
pub use error::MorphError;
pub use inputs::{Hover, Inputs, Interaction};
pub use labels::{LabelSpec, LabelState};
pub use mesh::{Face, Mesh, Vertex};
pub use outputs::{CoreEvent, Cursor, Outputs};
pub use phase::{transition, Phase, Trigger};
pub use scene::{MeshKind, MeshState, SceneState, Transform};
pub use swarm::{Particle, ParticlePool};
pub use topology::TopologyGraph;
pub use tween::{sample, Ease, Sample, Tween};
pub use uniforms::{ShaderId, UniformBridge, UniformName, UniformSet, UniformSink, UniformWrite};
