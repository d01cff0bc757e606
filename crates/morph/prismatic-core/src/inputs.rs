//! Input contracts for the core engine.
//!
//! Adapters (web/native) hit-test pointer events against their own scene and
//! pass the results into Engine::update() each frame.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Discrete events since the previous frame, applied in order.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    /// What the pointer is currently over.
    #[serde(default)]
    pub hover: Hover,
}

impl Inputs {
    pub fn with(interactions: impl IntoIterator<Item = Interaction>) -> Self {
        Self {
            interactions: interactions.into_iter().collect(),
            hover: Hover::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    /// Pointer-down hit the main shape.
    Primary,
    /// Pointer-down hit one of the facet forms.
    Secondary,
    /// Pointer-down hit a label sprite.
    LabelPicked { index: usize },
    /// Keyboard toggle for the scrambler.
    ToggleScrambler,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hover {
    #[default]
    Nothing,
    Shape,
    Label,
    /// Some other mesh (facet forms, particle cloud).
    Other,
}
