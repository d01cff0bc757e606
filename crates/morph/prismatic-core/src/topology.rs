//! Vertex adjacency derived from a face list.
//!
//! Every vertex of a face is linked to the other two vertices of that face.
//! Neighbour lists are deduplicated and sorted ascending so iteration order is
//! reproducible. Symmetry is whatever the faces imply; nothing is forced.

use serde::{Deserialize, Serialize};

use crate::mesh::{Face, Vertex};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyGraph {
    neighbors: Vec<Vec<u32>>,
}

impl TopologyGraph {
    /// Build the graph for `vertices` from `faces`.
    ///
    /// Panics if a face references a vertex index outside `vertices`.
    pub fn build(vertices: &[Vertex], faces: &[Face]) -> Self {
        let n = vertices.len();
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); n];
        for face in faces {
            let idx = face.indices();
            for (slot, &v) in idx.iter().enumerate() {
                assert!(
                    (v as usize) < n,
                    "face {face:?} references vertex {v} but mesh has {n} vertices"
                );
                let list = &mut neighbors[v as usize];
                for (other_slot, &o) in idx.iter().enumerate() {
                    // degenerate faces may repeat an index; never link a vertex to itself
                    if other_slot != slot && o != v {
                        list.push(o);
                    }
                }
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        Self { neighbors }
    }

    /// Sorted neighbours of `v`. Empty for vertices no face references.
    #[inline]
    pub fn neighbors(&self, v: u32) -> &[u32] {
        &self.neighbors[v as usize]
    }

    /// Round-robin travel target for particle slot `slot` of vertex `v`.
    ///
    /// Panics if `v` has no neighbours.
    pub fn travel_target(&self, v: u32, slot: usize) -> u32 {
        let list = self.neighbors(v);
        assert!(
            !list.is_empty(),
            "vertex {v} carries particles but has no neighbours"
        );
        list[slot % list.len()]
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.neighbors
            .iter()
            .enumerate()
            .map(|(i, l)| (i as u32, l.as_slice()))
    }
}
