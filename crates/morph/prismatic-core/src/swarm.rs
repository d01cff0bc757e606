//! Particle swarm: a fixed pool of particles per vertex.
//!
//! Particles are stored flat, indexed by `(vertex, slot)`. The pool never
//! resizes and a particle never changes its home vertex. Three operations act
//! on it:
//! - `converge`: exponential approach towards each home vertex (labels phase)
//! - `initialize_travel`: bind every particle to one graph edge (round-robin)
//! - `advance`: one swarm step along the bound edge, reversing at the ends

use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SwarmConfig;
use crate::topology::TopologyGraph;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vector3<f32>,
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    speed: f32,
}

/// What a single swarm step did to a particle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    Moved,
    /// Arrived: start and end were swapped, nothing moved this step.
    Reversed,
}

impl Particle {
    pub fn new(position: Vector3<f32>, speed: f32) -> Self {
        Self {
            position,
            start: position,
            end: position,
            speed,
        }
    }

    /// Per-step displacement, fixed at creation.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Unit vector from `start` to `end`; zero when they coincide.
    pub fn direction(&self) -> Vector3<f32> {
        (self.end - self.start)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    #[inline]
    pub fn distance_to_end(&self) -> f32 {
        (self.end - self.position).norm()
    }

    /// Move `speed` along start->end, or swap the endpoints once within
    /// `arrive_distance` of `end`. Direction is recomputed every call.
    pub fn step(&mut self, cfg: &SwarmConfig) -> StepOutcome {
        let remaining = self.distance_to_end();
        if remaining < cfg.arrive_distance {
            std::mem::swap(&mut self.start, &mut self.end);
            return StepOutcome::Reversed;
        }
        let delta = if cfg.clamp_overshoot {
            self.speed.min(remaining)
        } else {
            self.speed
        };
        self.position += self.direction() * delta;
        StepOutcome::Moved
    }
}

/// Arena of `vertex_count * per_vertex` particles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticlePool {
    vertex_count: usize,
    per_vertex: usize,
    particles: Vec<Particle>,
}

impl ParticlePool {
    /// Scatter particles uniformly in `[-extent, extent)^3` with speeds in `[0, max_speed)`.
    pub fn scatter<R: Rng>(
        vertex_count: usize,
        per_vertex: usize,
        cfg: &SwarmConfig,
        rng: &mut R,
    ) -> Self {
        let extent = cfg.spawn_extent;
        let coord = |rng: &mut R| rng.random::<f32>() * 2.0 * extent - extent;
        let particles = (0..vertex_count * per_vertex)
            .map(|_| {
                let p = Vector3::new(coord(rng), coord(rng), coord(rng));
                Particle::new(p, rng.random::<f32>() * cfg.max_speed)
            })
            .collect();
        Self {
            vertex_count,
            per_vertex,
            particles,
        }
    }

    /// Build a pool from explicit particles, laid out vertex-major.
    pub fn from_particles(vertex_count: usize, per_vertex: usize, particles: Vec<Particle>) -> Self {
        assert_eq!(
            particles.len(),
            vertex_count * per_vertex,
            "pool needs vertex_count * per_vertex particles"
        );
        Self {
            vertex_count,
            per_vertex,
            particles,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn per_vertex(&self) -> usize {
        self.per_vertex
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    fn index(&self, vertex: usize, slot: usize) -> usize {
        assert!(
            vertex < self.vertex_count && slot < self.per_vertex,
            "particle ({vertex}, {slot}) out of range"
        );
        vertex * self.per_vertex + slot
    }

    pub fn get(&self, vertex: usize, slot: usize) -> &Particle {
        &self.particles[self.index(vertex, slot)]
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Iterate `(vertex, slot, particle)` mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut Particle)> + '_ {
        let per = self.per_vertex;
        self.particles
            .iter_mut()
            .enumerate()
            .map(move |(i, p)| (i / per, i % per, p))
    }

    /// Overwrite `out` with xyz triples of every particle position.
    pub fn write_positions(&self, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(self.particles.len() * 3);
        for p in &self.particles {
            out.extend_from_slice(&[p.position.x, p.position.y, p.position.z]);
        }
    }
}

/// Pull every particle towards its home vertex by `(old*w + target) / (w + 1)`.
///
/// Returns true if any particle was already within `arrive_distance` of its
/// target before blending.
pub fn converge(pool: &mut ParticlePool, world_vertices: &[Vector3<f32>], cfg: &SwarmConfig) -> bool {
    assert_eq!(world_vertices.len(), pool.vertex_count());
    let w = cfg.blend_weight;
    let inv = 1.0 / (w + 1.0);
    let mut arrived = false;
    for (v, _, p) in pool.iter_mut() {
        let target = world_vertices[v];
        if (p.position - target).norm() < cfg.arrive_distance {
            arrived = true;
        }
        p.position = (p.position * w + target) * inv;
    }
    arrived
}

/// Bind particle `(v, s)` to the edge from its current position to
/// `neighbors(v)[s mod len]`, in world space.
pub fn initialize_travel(pool: &mut ParticlePool, graph: &TopologyGraph, world_vertices: &[Vector3<f32>]) {
    assert_eq!(graph.vertex_count(), pool.vertex_count());
    assert_eq!(world_vertices.len(), pool.vertex_count());
    for (v, s, p) in pool.iter_mut() {
        let target = graph.travel_target(v as u32, s);
        p.start = p.position;
        p.end = world_vertices[target as usize];
    }
}

/// One swarm step for every particle.
///
/// Takes no `dt`: each call moves a particle by its fixed per-step speed
/// whatever the frame duration, so the caller's frame rate sets the on-screen
/// velocity. Edges are fixed by `initialize_travel`, so the graph is not
/// needed here. Returns how many particles reversed this step.
pub fn advance(pool: &mut ParticlePool, cfg: &SwarmConfig) -> usize {
    pool.particles
        .iter_mut()
        .map(|p| p.step(cfg))
        .filter(|o| *o == StepOutcome::Reversed)
        .count()
}
