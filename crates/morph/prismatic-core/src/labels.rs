//! Label sprites anchored to the facet form's base ring.

use hashbrown::HashMap;
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};
use crate::scene::to_world;

/// Text and link shown on one label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub link: String,
}

impl LabelSpec {
    pub fn new(title: &str, subtitle: &str, link: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            link: link.to_string(),
        }
    }

    pub(crate) fn default_payload() -> Vec<Self> {
        vec![
            Self::new("Google", "Search engine", "https://www.google.com"),
            Self::new("Bing", "Search engine", "https://www.bing.com"),
            Self::new("Amazon", "Electronic store", "https://www.amazon.com"),
        ]
    }

    /// Sprite name used for picking: the lower-cased title.
    pub fn key(&self) -> String {
        self.title.to_lowercase()
    }
}

/// Renderer-facing state of one label.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelState {
    pub position: Vector3<f32>,
    pub scale: f32,
    pub visible: bool,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct LabelBoard {
    specs: Vec<LabelSpec>,
    states: Vec<LabelState>,
    /// Frames spent fading in, per label. Opacity is derived from this so it
    /// lands on exactly 1.0.
    fade_frames: Vec<u32>,
    by_key: HashMap<String, usize>,
    fade_step: f32,
    vertex_scale: f32,
}

impl LabelBoard {
    pub fn new(specs: Vec<LabelSpec>, scale: f32, vertex_scale: f32, fade_step: f32) -> Self {
        let by_key = specs
            .iter()
            .enumerate()
            .map(|(i, s)| (s.key(), i))
            .collect();
        let states = vec![
            LabelState {
                position: Vector3::zeros(),
                scale,
                visible: false,
                opacity: 0.0,
            };
            specs.len()
        ];
        Self {
            fade_frames: vec![0; specs.len()],
            specs,
            states,
            by_key,
            fade_step,
            vertex_scale,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn spec(&self, index: usize) -> Option<&LabelSpec> {
        self.specs.get(index)
    }

    pub fn states(&self) -> &[LabelState] {
        &self.states
    }

    /// Look a label up by sprite name (case-insensitive title).
    pub fn find(&self, name: &str) -> Result<(usize, &LabelSpec)> {
        self.by_key
            .get(&name.to_lowercase())
            .map(|&i| (i, &self.specs[i]))
            .ok_or_else(|| MorphError::UnknownLabel {
                name: name.to_string(),
            })
    }

    /// Place label `i` on facet vertex `i + 1` (pushed out by the vertex scale
    /// and taken to world space) and fade it in by one step.
    pub fn reveal_step(&mut self, local_vertices: &[Vector3<f32>], world: &Matrix4<f32>) {
        for (i, state) in self.states.iter_mut().enumerate() {
            let anchor = local_vertices[i + 1] * self.vertex_scale;
            state.position = to_world(world, &anchor);
            state.visible = true;
            if state.opacity < 1.0 {
                self.fade_frames[i] += 1;
                state.opacity = (self.fade_frames[i] as f32 * self.fade_step).min(1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use approx::assert_relative_eq;

    fn board() -> LabelBoard {
        LabelBoard::new(LabelSpec::default_payload(), 12.0, 1.2, 0.1)
    }

    #[test]
    fn opacity_climbs_by_step_then_holds() {
        let mesh = Mesh::prism(4.0, 2.0, 3);
        let local: Vec<_> = mesh.positions().copied().collect();
        let mut b = board();
        let mut prev = 0.0;
        for frame in 1..=10 {
            b.reveal_step(&local, &Matrix4::identity());
            let o = b.states()[0].opacity;
            assert_relative_eq!(o - prev, 0.1, epsilon = 1e-5);
            assert_relative_eq!(o, frame as f32 * 0.1, epsilon = 1e-5);
            prev = o;
        }
        assert_eq!(b.states()[0].opacity, 1.0);
        b.reveal_step(&local, &Matrix4::identity());
        assert_eq!(b.states()[2].opacity, 1.0);
    }

    #[test]
    fn labels_sit_on_scaled_ring_vertices() {
        let mesh = Mesh::prism(4.0, 2.0, 3);
        let local: Vec<_> = mesh.positions().copied().collect();
        let mut b = board();
        let world = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -4.0));
        b.reveal_step(&local, &world);
        for (i, s) in b.states().iter().enumerate() {
            let want = local[i + 1] * 1.2 + Vector3::new(0.0, 0.0, -4.0);
            assert_relative_eq!(s.position, want, epsilon = 1e-5);
            assert!(s.visible);
            assert_eq!(s.scale, 12.0);
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let b = board();
        let (i, spec) = b.find("BING").unwrap();
        assert_eq!(i, 1);
        assert_eq!(spec.link, "https://www.bing.com");
        assert!(matches!(b.find("yahoo"), Err(MorphError::UnknownLabel { .. })));
    }
}
