//! One-way bridge from the engine to the renderer's shader uniforms.
//!
//! Adapters (WASM/native) register one sink per compiled material. The engine
//! only ever writes; it never reads uniforms back.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ShaderId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum UniformName {
    #[serde(rename = "intensity")]
    Intensity,
    #[serde(rename = "factor")]
    Factor,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "scramblerActive")]
    ScramblerActive,
}

impl UniformName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intensity => "intensity",
            Self::Factor => "factor",
            Self::Time => "time",
            Self::ScramblerActive => "scramblerActive",
        }
    }
}

/// Opaque handle to an external uniform set.
/// Adapters implement this and pass it into `Engine::register_shader()`.
pub trait UniformSink {
    fn write(&mut self, name: UniformName, value: f32);
}

/// Plain in-memory uniform set. Handy for hosts that poll values and for tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UniformSet {
    pub intensity: f32,
    pub factor: f32,
    pub time: f32,
    #[serde(rename = "scramblerActive")]
    pub scrambler_active: f32,
}

impl UniformSink for UniformSet {
    fn write(&mut self, name: UniformName, value: f32) {
        match name {
            UniformName::Intensity => self.intensity = value,
            UniformName::Factor => self.factor = value,
            UniformName::Time => self.time = value,
            UniformName::ScramblerActive => self.scrambler_active = value,
        }
    }
}

/// Scalars to write this frame. `None` leaves the uniform untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UniformWrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f32>,
    #[serde(
        rename = "scramblerActive",
        skip_serializing_if = "Option::is_none"
    )]
    pub scrambler_active: Option<f32>,
}

impl UniformWrite {
    fn entries(&self) -> impl Iterator<Item = (UniformName, f32)> {
        [
            (UniformName::Intensity, self.intensity),
            (UniformName::Factor, self.factor),
            (UniformName::Time, self.time),
            (UniformName::ScramblerActive, self.scrambler_active),
        ]
        .into_iter()
        .filter_map(|(n, v)| v.map(|v| (n, v)))
    }
}

/// Registered shader refs, written in registration order.
#[derive(Default)]
pub struct UniformBridge {
    next_id: u32,
    refs: Vec<(ShaderId, Box<dyn UniformSink>)>,
}

impl fmt::Debug for UniformBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformBridge")
            .field("refs", &self.refs.iter().map(|(id, _)| *id).collect::<Vec<_>>())
            .finish()
    }
}

impl UniformBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink and seed it with `initial`.
    pub fn register(&mut self, mut sink: Box<dyn UniformSink>, initial: &UniformWrite) -> ShaderId {
        for (name, value) in initial.entries() {
            sink.write(name, value);
        }
        let id = ShaderId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.refs.push((id, sink));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unregister(&mut self, id: ShaderId) -> bool {
        let before = self.refs.len();
        self.refs.retain(|(rid, _)| *rid != id);
        self.refs.len() != before
    }

    /// Write every present scalar into every registered ref.
    pub fn push(&mut self, write: &UniformWrite) {
        for (name, value) in write.entries() {
            for (_, sink) in &mut self.refs {
                sink.write(name, value);
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
