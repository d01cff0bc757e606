//! Engine: owns every piece of morph state and runs the per-frame tick.
//!
//! Tick order (fixed):
//! 0. apply triggers observed last frame, then this frame's host interactions
//! 1. advance running timelines and fire due cues
//! 2. run the current phase's per-frame behaviour
//! 3. scrambler reseed check
//! 4. push uniforms through the bridge and fill Outputs
//!
//! Conditions observed during 1-2 (tween finished, particles arrived) only
//! change the phase at step 0 of the next tick.

use log::{debug, info, trace};
use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{Config, MeshMorph};
use crate::error::{MorphError, Result};
use crate::inputs::{Inputs, Interaction};
use crate::labels::{LabelBoard, LabelSpec};
use crate::mesh::Mesh;
use crate::outputs::{CoreEvent, Cursor, Outputs};
use crate::phase::{transition, Phase, Trigger};
use crate::scene::{to_world, MeshKind, SceneState};
use crate::scrambler::Scrambler;
use crate::swarm::{self, ParticlePool};
use crate::timeline::{CueAction, Timeline};
use crate::topology::TopologyGraph;
use crate::tween::Ease;
use crate::uniforms::{ShaderId, UniformBridge, UniformSink, UniformWrite};

#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    rng: ChaCha8Rng,

    // Built once
    mesh: Mesh,
    graph: TopologyGraph,
    local_vertices: Vec<Vector3<f32>>,

    // Mutated per tick
    phase: Phase,
    pending: Vec<Trigger>,
    scene: SceneState,
    timelines: Vec<Timeline>,
    pool: ParticlePool,
    labels: LabelBoard,
    scrambler: Scrambler,
    bridge: UniformBridge,
    clock_ms: f64,
    world_vertices: Vec<Vector3<f32>>,

    outputs: Outputs,
}

impl Engine {
    /// Create an engine around the default faceted form (one side per label).
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        let mesh = Mesh::prism(cfg.prism.radius, cfg.prism.height, cfg.labels.len() as u32);
        Self::with_mesh(cfg, mesh)
    }

    /// Create an engine around a caller-supplied mesh.
    ///
    /// The mesh must have a vertex `i + 1` for every label `i`. Every vertex
    /// must have at least one neighbour; a mesh that breaks this panics.
    pub fn with_mesh(cfg: Config, mesh: Mesh) -> Result<Self> {
        cfg.validate()?;
        if mesh.vertex_count() <= cfg.labels.len() {
            return Err(MorphError::invalid(format!(
                "mesh has {} vertices, {} labels need at least {}",
                mesh.vertex_count(),
                cfg.labels.len(),
                cfg.labels.len() + 1
            )));
        }

        let graph = TopologyGraph::build(&mesh.vertices, &mesh.faces);
        for (v, n) in graph.iter() {
            assert!(!n.is_empty(), "vertex {v} carries particles but has no neighbours");
        }

        let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
        let pool = ParticlePool::scatter(
            mesh.vertex_count(),
            cfg.swarm.particles_per_vertex,
            &cfg.swarm,
            &mut rng,
        );
        let labels = LabelBoard::new(
            cfg.labels.clone(),
            cfg.label_scale,
            cfg.label_vertex_scale,
            cfg.label_fade_step,
        );
        let scene = SceneState::initial(cfg.morph.fold_intensity_start);
        let local_vertices: Vec<_> = mesh.positions().copied().collect();

        info!(
            "prismatic engine: {} vertices, {} faces, {} particles",
            mesh.vertex_count(),
            mesh.faces.len(),
            pool.len()
        );

        let mut outputs = Outputs::new(scene.clone());
        pool.write_positions(&mut outputs.particle_positions);

        Ok(Self {
            scrambler: Scrambler::new(cfg.scrambler),
            rng,
            world_vertices: Vec::with_capacity(local_vertices.len()),
            local_vertices,
            mesh,
            graph,
            phase: Phase::Idle,
            pending: Vec::new(),
            scene,
            timelines: Vec::new(),
            pool,
            labels,
            bridge: UniformBridge::new(),
            clock_ms: 0.0,
            outputs,
            cfg,
        })
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    #[inline]
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    #[inline]
    pub fn labels(&self) -> &LabelBoard {
        &self.labels
    }

    #[inline]
    pub fn scrambler(&self) -> &Scrambler {
        &self.scrambler
    }

    /// Accumulated frame clock in milliseconds.
    #[inline]
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Last tick's outputs.
    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Number of timelines still running.
    #[inline]
    pub fn running_timelines(&self) -> usize {
        self.timelines.len()
    }

    /// Look a label up by sprite name.
    pub fn label(&self, name: &str) -> Result<&LabelSpec> {
        self.labels.find(name).map(|(_, spec)| spec)
    }

    /// Register a shader ref. Its uniforms are initialised immediately.
    pub fn register_shader(&mut self, sink: Box<dyn UniformSink>) -> ShaderId {
        let initial = UniformWrite {
            intensity: Some(self.scene.fold_intensity),
            factor: Some(0.0),
            time: Some(0.0),
            scrambler_active: Some(0.0),
        };
        let id = self.bridge.register(sink, &initial);
        debug!("registered shader ref {id:?}");
        id
    }

    pub fn unregister_shader(&mut self, id: ShaderId) -> bool {
        self.bridge.unregister(id)
    }

    /// Advance one frame by `dt` seconds.
    pub fn update(&mut self, dt: f32, inputs: Inputs) -> &Outputs {
        self.outputs.clear();
        self.outputs.epoch = self.outputs.epoch.wrapping_add(1);
        self.clock_ms += f64::from(dt) * 1000.0;

        // 0) Transitions
        for trigger in std::mem::take(&mut self.pending) {
            self.fire(trigger);
        }
        for interaction in inputs.interactions {
            self.interact(interaction);
        }

        // 1) Timelines
        self.advance_timelines(dt);

        // 2) Phase behaviour
        self.run_phase();

        // 3) Scrambler
        self.outputs.uniforms.factor = self.scrambler.tick(self.clock_ms, &mut self.rng);

        // 4) Uniforms + outputs
        self.outputs.uniforms.time = Some((self.clock_ms * 0.001).cos() as f32);
        self.bridge.push(&self.outputs.uniforms);

        if self.outputs.particles_dirty {
            self.pool.write_positions(&mut self.outputs.particle_positions);
        }
        self.outputs.phase = self.phase;
        self.outputs.scene.clone_from(&self.scene);
        self.outputs.labels.clear();
        self.outputs.labels.extend_from_slice(self.labels.states());
        self.outputs.cursor = Cursor::for_hover(self.phase, inputs.hover);

        &self.outputs
    }

    fn interact(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::Primary => self.fire(Trigger::Primary),
            Interaction::Secondary => self.fire(Trigger::Secondary),
            Interaction::ToggleScrambler => {
                let enabled = self.scrambler.toggle();
                debug!("scrambler toggled: {enabled}");
                self.outputs
                    .push_event(CoreEvent::ScramblerToggled { enabled });
            }
            Interaction::LabelPicked { index } => {
                let visible = self
                    .labels
                    .states()
                    .get(index)
                    .is_some_and(|s| s.visible);
                match self.labels.spec(index) {
                    Some(spec) if visible => self.outputs.push_event(CoreEvent::OpenLink {
                        title: spec.title.clone(),
                        link: spec.link.clone(),
                    }),
                    _ => trace!("label pick {index} ignored"),
                }
            }
        }
    }

    /// Run the transition table; illegal pairs are reported, not propagated.
    fn fire(&mut self, trigger: Trigger) {
        let from = self.phase;
        match transition(from, trigger) {
            Ok(to) => {
                debug!("phase {} -> {}", from.name(), to.name());
                self.phase = to;
                self.outputs.push_event(CoreEvent::PhaseChanged { from, to });
                self.enter(to);
            }
            Err(e) => {
                trace!("{e}");
                self.outputs.push_event(CoreEvent::InteractionIgnored {
                    phase: from,
                    trigger,
                });
            }
        }
    }

    fn enter(&mut self, phase: Phase) {
        match phase {
            Phase::ToPrism => self.start_morph(),
            Phase::Unfold => {
                let m = &self.cfg.morph;
                let tl = Timeline::new("unfold")
                    .fold_intensity(
                        self.scene.fold_intensity,
                        m.fold_intensity_end,
                        m.unfold_duration,
                        Ease::BackOut,
                    )
                    .then(Trigger::UnfoldComplete);
                self.timelines.push(tl);
            }
            Phase::Labels => self.scene.cloud.visible = true,
            Phase::Idle | Phase::ToParticles | Phase::SwapParticles => {}
        }
    }

    /// Four parallel timelines: shape and the three facet forms.
    fn start_morph(&mut self) {
        let morph = self.cfg.morph.clone();
        let build = |name: &'static str, kind: MeshKind, m: &MeshMorph, scene: &SceneState| {
            Timeline::new(name)
                .rotate(scene, kind, m.rotation, m.rotation_duration, Ease::QuadOut)
                .scale(scene, kind, m.scale, m.scale_duration, Ease::QuadOut)
        };
        let shape = build("shape", MeshKind::Shape, &morph.shape, &self.scene);
        let solid = build("solid", MeshKind::SolidFacets, &morph.solid, &self.scene);
        let wire = build("wire", MeshKind::WireFacets, &morph.wire, &self.scene);
        let points = build("points", MeshKind::PointFacets, &morph.points, &self.scene)
            .cue(morph.reveal_cue, CueAction::RevealFacets);
        self.timelines.extend([shape, solid, wire, points]);
    }

    fn advance_timelines(&mut self, dt: f32) {
        let mut fired = Vec::new();
        for tl in &mut self.timelines {
            let step = tl.advance(dt, &mut self.scene);
            fired.extend(step.fired);
            if step.completed {
                trace!("timeline {} complete", tl.name());
                if let Some(trigger) = tl.on_complete() {
                    self.pending.push(trigger);
                }
            }
        }
        self.timelines.retain(|tl| !tl.is_complete());
        for action in fired {
            self.cue(action);
        }
    }

    fn cue(&mut self, action: CueAction) {
        match action {
            CueAction::RevealFacets => {
                debug!("facet forms revealed");
                self.scene.shape.visible = false;
                self.scene.solid.visible = true;
                self.scene.wire.visible = true;
                self.scene.points.visible = true;
                self.scene.controls_enabled = true;
                self.outputs.uniforms.scrambler_active = Some(self.scrambler.active_flag());
                self.outputs.push_event(CoreEvent::FacetsRevealed);
            }
        }
    }

    /// World-space facet vertices, read from one matrix snapshot.
    fn snapshot_world_vertices(&mut self) {
        let world = self.scene.points.transform.matrix();
        self.world_vertices.clear();
        self.world_vertices
            .extend(self.local_vertices.iter().map(|v| to_world(&world, v)));
    }

    fn run_phase(&mut self) {
        match self.phase {
            Phase::Idle | Phase::ToPrism => {}
            Phase::Unfold => {
                self.outputs.uniforms.intensity = Some(self.scene.fold_intensity);
            }
            Phase::Labels => {
                let world = self.scene.points.transform.matrix();
                self.labels.reveal_step(&self.local_vertices, &world);
                self.snapshot_world_vertices();
                if swarm::converge(&mut self.pool, &self.world_vertices, &self.cfg.swarm) {
                    self.pending.push(Trigger::ParticlesConverged);
                }
                self.outputs.particles_dirty = true;
            }
            Phase::ToParticles => {
                self.snapshot_world_vertices();
                swarm::initialize_travel(&mut self.pool, &self.graph, &self.world_vertices);
                self.pending.push(Trigger::TravelAssigned);
            }
            Phase::SwapParticles => {
                swarm::advance(&mut self.pool, &self.cfg.swarm);
                self.outputs.particles_dirty = true;
            }
        }
    }
}
