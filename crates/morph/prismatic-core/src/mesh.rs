//! Vertex/face data for the faceted form.

use std::f32::consts::TAU;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub index: u32,
    pub position: Vector3<f32>,
}

/// Ordered triple of vertex indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}

/// Immutable base mesh. Built once at engine construction.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Build a mesh from raw positions; vertex indices follow slice order.
    pub fn from_positions(positions: &[[f32; 3]], faces: Vec<Face>) -> Self {
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, p)| Vertex {
                index: i as u32,
                position: Vector3::new(p[0], p[1], p[2]),
            })
            .collect();
        Self { vertices, faces }
    }

    /// A closed pyramid with a `segments`-gon base, centred on the origin.
    ///
    /// Layout: vertex 0 is the apex, vertices `1..=segments` walk the base ring,
    /// and the final vertex is the base centre. Ring vertex `i + 1` is the anchor
    /// of label `i`.
    pub fn prism(radius: f32, height: f32, segments: u32) -> Self {
        assert!(segments >= 3, "prism needs at least 3 segments, got {segments}");
        let half = height * 0.5;
        let mut positions = Vec::with_capacity(segments as usize + 2);
        positions.push([0.0, half, 0.0]);
        for i in 0..segments {
            let theta = i as f32 / segments as f32 * TAU;
            positions.push([radius * theta.sin(), -half, radius * theta.cos()]);
        }
        let centre = segments + 1;
        positions.push([0.0, -half, 0.0]);

        let mut faces = Vec::with_capacity(segments as usize * 2);
        for i in 0..segments {
            let cur = 1 + i;
            let next = 1 + (i + 1) % segments;
            faces.push(Face::new(0, cur, next));
            faces.push(Face::new(centre, next, cur));
        }
        Self::from_positions(&positions, faces)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Vector3<f32>> + '_ {
        self.vertices.iter().map(|v| &v.position)
    }
}
