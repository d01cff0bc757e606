//! Mesh transforms and visibility handed to the renderer.

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Position, Euler rotation (XYZ order, radians) and scale.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }
}

impl Transform {
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vector3::repeat(s);
        self
    }

    /// World matrix: translate * Rx * Ry * Rz * scale.
    pub fn matrix(&self) -> Matrix4<f32> {
        let r = Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z);
        Matrix4::new_translation(&self.position)
            * r.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// Apply a world matrix to a local-space point.
#[inline]
pub fn to_world(m: &Matrix4<f32>, local: &Vector3<f32>) -> Vector3<f32> {
    m.transform_point(&Point3::from(*local)).coords
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    /// The solid shape the user first clicks.
    Shape,
    SolidFacets,
    WireFacets,
    PointFacets,
    ParticleCloud,
}

impl MeshKind {
    pub const ALL: [MeshKind; 5] = [
        MeshKind::Shape,
        MeshKind::SolidFacets,
        MeshKind::WireFacets,
        MeshKind::PointFacets,
        MeshKind::ParticleCloud,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshState {
    pub transform: Transform,
    pub visible: bool,
}

/// Renderer-facing state of every mesh the engine drives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    pub shape: MeshState,
    pub solid: MeshState,
    pub wire: MeshState,
    pub points: MeshState,
    pub cloud: MeshState,
    pub fold_intensity: f32,
    pub controls_enabled: bool,
}

impl SceneState {
    /// Initial layout: only the shape is visible; facet forms wait at their rest scale.
    pub fn initial(fold_intensity: f32) -> Self {
        let hidden = |t: Transform| MeshState {
            transform: t,
            visible: false,
        };
        Self {
            shape: MeshState {
                transform: Transform::default().with_rotation(0.6, -0.3, 0.0),
                visible: true,
            },
            solid: hidden(Transform::default()),
            wire: hidden(Transform::default().with_uniform_scale(1.1)),
            points: hidden(Transform::default().with_uniform_scale(1.1)),
            cloud: hidden(Transform::default()),
            fold_intensity,
            controls_enabled: false,
        }
    }

    pub fn mesh(&self, kind: MeshKind) -> &MeshState {
        match kind {
            MeshKind::Shape => &self.shape,
            MeshKind::SolidFacets => &self.solid,
            MeshKind::WireFacets => &self.wire,
            MeshKind::PointFacets => &self.points,
            MeshKind::ParticleCloud => &self.cloud,
        }
    }

    pub fn mesh_mut(&mut self, kind: MeshKind) -> &mut MeshState {
        match kind {
            MeshKind::Shape => &mut self.shape,
            MeshKind::SolidFacets => &mut self.solid,
            MeshKind::WireFacets => &mut self.wire,
            MeshKind::PointFacets => &mut self.points,
            MeshKind::ParticleCloud => &mut self.cloud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_leaves_points_alone() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(to_world(&Transform::default().matrix(), &p), p);
    }

    #[test]
    fn scale_then_rotate_then_translate() {
        let mut t = Transform::default()
            .with_uniform_scale(2.0)
            .with_rotation(0.0, 0.0, FRAC_PI_2);
        t.position = Vector3::new(0.0, 0.0, 5.0);
        let w = to_world(&t.matrix(), &Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(w, Vector3::new(0.0, 2.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn euler_order_is_xyz() {
        // Rx(90) * Ry(90): y-rotation is applied to the point first
        let t = Transform::default().with_rotation(FRAC_PI_2, FRAC_PI_2, 0.0);
        let w = to_world(&t.matrix(), &Vector3::new(1.0, 0.0, 0.0));
        // Ry(90) sends +x to -z, then Rx(90) sends -z to +y
        assert_relative_eq!(w, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn initial_scene_shows_only_the_shape() {
        let s = SceneState::initial(2.0);
        for kind in MeshKind::ALL {
            assert_eq!(s.mesh(kind).visible, kind == MeshKind::Shape, "{kind:?}");
        }
        assert_eq!(s.wire.transform.scale, Vector3::repeat(1.1));
    }
}
