use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use prismatic_core::scene::to_world;
use prismatic_core::{
    Config, CoreEvent, Cursor, Engine, Hover, Inputs, Interaction, Phase, Trigger, UniformName,
    UniformSet, UniformSink,
};

/// Shares a UniformSet with the test so writes can be inspected after update().
struct SharedSet(Rc<RefCell<UniformSet>>);

impl UniformSink for SharedSet {
    fn write(&mut self, name: UniformName, value: f32) {
        self.0.borrow_mut().write(name, value);
    }
}

fn mk_engine() -> Engine {
    let mut cfg = Config::default();
    cfg.swarm.particles_per_vertex = 6;
    Engine::new(cfg).expect("engine")
}

fn tick(eng: &mut Engine, dt: f32) {
    eng.update(dt, Inputs::default());
}

fn click(eng: &mut Engine, i: Interaction) {
    eng.update(0.016, Inputs::with([i]));
}

/// Drive the engine until `phase` is reached; returns frames spent.
fn run_until(eng: &mut Engine, phase: Phase, max_frames: usize) -> usize {
    for n in 0..max_frames {
        if eng.phase() == phase {
            return n;
        }
        tick(eng, 0.016);
    }
    panic!("never reached {} (stuck in {})", phase.name(), eng.phase().name());
}

#[test]
fn idle_only_moves_on_primary() {
    let mut eng = mk_engine();
    let out = eng.update(
        0.016,
        Inputs::with([
            Interaction::Secondary,
            Interaction::ToggleScrambler,
            Interaction::LabelPicked { index: 1 },
        ]),
    );
    assert_eq!(out.phase, Phase::Idle);
    assert!(out.events.contains(&CoreEvent::InteractionIgnored {
        phase: Phase::Idle,
        trigger: Trigger::Secondary,
    }));

    click(&mut eng, Interaction::Primary);
    assert_eq!(eng.phase(), Phase::ToPrism);
    click(&mut eng, Interaction::Secondary);
    assert_eq!(eng.phase(), Phase::Unfold);
}

#[test]
fn second_shape_click_unfolds_before_the_reveal() {
    let mut eng = mk_engine();
    click(&mut eng, Interaction::Primary);
    assert_eq!(eng.running_timelines(), 4);
    for _ in 0..18 {
        tick(&mut eng, 0.016);
    }
    // facets still hidden: the host can only report a hit on the shape
    assert!(eng.scene().shape.visible);
    assert!(!eng.scene().points.visible);

    let out = eng.update(0.016, Inputs::with([Interaction::Primary])).clone();
    assert_eq!(out.phase, Phase::Unfold);
    assert_eq!(
        out.phase_changes().collect::<Vec<_>>(),
        vec![(Phase::ToPrism, Phase::Unfold)]
    );
    // morph keeps running alongside the unfold tween, nothing restarts
    assert_eq!(eng.running_timelines(), 5);
    assert!(out.uniforms.intensity.is_some());
}

#[test]
fn reveal_cue_fires_at_seventy_percent_of_the_facet_timeline() {
    let mut eng = mk_engine();
    let set = Rc::new(RefCell::new(UniformSet::default()));
    eng.register_shader(Box::new(SharedSet(set.clone())));

    // primary frame + 9 more: 1.0s elapsed, cue is due at 1.05s
    eng.update(0.1, Inputs::with([Interaction::Primary]));
    for _ in 0..9 {
        tick(&mut eng, 0.1);
    }
    assert!(eng.scene().shape.visible);
    assert!(!eng.scene().points.visible);
    assert!(!eng.scene().controls_enabled);
    assert_eq!(set.borrow().scrambler_active, 0.0);

    let out = eng.update(0.1, Inputs::default());
    assert!(out.events.contains(&CoreEvent::FacetsRevealed));
    assert!(!out.scene.shape.visible);
    assert!(out.scene.solid.visible && out.scene.wire.visible && out.scene.points.visible);
    assert!(out.scene.controls_enabled);
    assert_eq!(set.borrow().scrambler_active, 1.0);

    // one-shot
    let out = eng.update(0.1, Inputs::default());
    assert!(!out.events.contains(&CoreEvent::FacetsRevealed));
}

#[test]
fn morph_tracks_land_on_their_targets() {
    let mut eng = mk_engine();
    eng.update(0.5, Inputs::with([Interaction::Primary]));
    for _ in 0..4 {
        tick(&mut eng, 0.5);
    }
    let m = eng.config().morph.clone();
    let s = eng.scene();
    assert_relative_eq!(s.shape.transform.scale.x, m.shape.scale);
    assert_relative_eq!(s.solid.transform.scale.y, m.solid.scale);
    assert_relative_eq!(s.wire.transform.scale.z, m.wire.scale);
    assert_relative_eq!(s.points.transform.rotation.x, m.points.rotation[0]);
    assert_relative_eq!(s.shape.transform.rotation.y, m.shape.rotation[1]);
    assert_eq!(eng.running_timelines(), 0);
}

#[test]
fn unfold_pushes_intensity_every_frame() {
    let mut eng = mk_engine();
    let set = Rc::new(RefCell::new(UniformSet::default()));
    eng.register_shader(Box::new(SharedSet(set.clone())));
    assert_eq!(set.borrow().intensity, 2.0);

    click(&mut eng, Interaction::Primary);
    let out = eng.update(0.25, Inputs::with([Interaction::Secondary]));
    let pushed = out.uniforms.intensity.expect("intensity pushed during unfold");
    assert!(pushed < 2.0);
    assert_eq!(set.borrow().intensity, pushed);
    assert_eq!(pushed, eng.scene().fold_intensity);

    // back-out overshoots past the end value before settling on it
    let mut low = f32::MAX;
    for _ in 0..60 {
        let out = eng.update(0.016, Inputs::default());
        if let Some(v) = out.uniforms.intensity {
            low = low.min(v);
        }
    }
    assert!(low < 0.0, "low={low}");
    assert_eq!(set.borrow().intensity, 0.0);
}

#[test]
fn labels_fade_in_by_a_tenth_per_frame() {
    let mut eng = mk_engine();
    click(&mut eng, Interaction::Primary);
    click(&mut eng, Interaction::Secondary);
    run_until(&mut eng, Phase::Labels, 200);

    // the entering frame already faded once
    let mut prev: Vec<f32> = eng.labels().states().iter().map(|l| l.opacity).collect();
    assert!(prev.iter().all(|&o| (o - 0.1).abs() < 1e-5));
    for _ in 0..12 {
        let out = eng.update(0.016, Inputs::default());
        if out.phase != Phase::Labels {
            break;
        }
        for (i, l) in out.labels.iter().enumerate() {
            assert!(l.visible);
            if prev[i] < 1.0 {
                assert_relative_eq!(l.opacity - prev[i], 0.1, epsilon = 1e-5);
            } else {
                assert_eq!(l.opacity, 1.0);
            }
            prev[i] = l.opacity;
        }
    }
    assert!(prev.iter().all(|&o| o == 1.0));
}

#[test]
fn full_sequence_reaches_the_swarm() {
    let mut eng = mk_engine();
    click(&mut eng, Interaction::Primary);
    // let the morph finish so the facet matrix is settled
    for _ in 0..150 {
        tick(&mut eng, 0.016);
    }
    click(&mut eng, Interaction::Secondary);
    run_until(&mut eng, Phase::Labels, 200);
    run_until(&mut eng, Phase::ToParticles, 500);

    // toParticles is a single frame
    let out = eng.update(0.016, Inputs::default());
    assert_eq!(out.phase, Phase::SwapParticles);
    assert!(out.particles_dirty);

    // nothing leaves the terminal phase
    let out = eng.update(
        0.016,
        Inputs::with([Interaction::Primary, Interaction::Secondary]),
    );
    assert_eq!(out.phase, Phase::SwapParticles);
    assert_eq!(out.phase_changes().count(), 0);
}

#[test]
fn particles_bind_round_robin_to_neighbours() {
    let mut eng = mk_engine();
    click(&mut eng, Interaction::Primary);
    for _ in 0..150 {
        tick(&mut eng, 0.016);
    }
    click(&mut eng, Interaction::Secondary);
    run_until(&mut eng, Phase::SwapParticles, 1000);

    let world = eng.scene().points.transform.matrix();
    let pool = eng.pool();
    let graph = eng.graph();
    for v in 0..pool.vertex_count() {
        let n = graph.neighbors(v as u32);
        for s in 0..pool.per_vertex() {
            let target = eng.mesh().vertices[n[s % n.len()] as usize].position;
            let want = to_world(&world, &target);
            let p = pool.get(v, s);
            // end/start may have swapped already; one of them is the neighbour
            let hit = (p.end - want).norm() < 1e-3 || (p.start - want).norm() < 1e-3;
            assert!(hit, "particle ({v}, {s}) not bound to neighbour {}", n[s % n.len()]);
        }
    }
}

#[test]
fn particle_buffer_only_changes_when_particles_move() {
    let mut eng = mk_engine();
    let expected_len = eng.pool().len() * 3;
    let first = eng.update(0.016, Inputs::default()).clone();
    assert!(!first.particles_dirty);
    assert_eq!(first.particle_positions.len(), expected_len);

    click(&mut eng, Interaction::Primary);
    click(&mut eng, Interaction::Secondary);
    run_until(&mut eng, Phase::Labels, 200);
    let before = eng.outputs().particle_positions.clone();
    let out = eng.update(0.016, Inputs::default());
    assert!(out.particles_dirty);
    assert_eq!(out.particle_positions.len(), expected_len);
    assert_ne!(out.particle_positions, before);
}

#[test]
fn scrambler_toggle_gates_factor_writes() {
    let mut eng = mk_engine();
    let set = Rc::new(RefCell::new(UniformSet::default()));
    eng.register_shader(Box::new(SharedSet(set.clone())));

    // clock lands at 0.5ms: inside the first reseed slot
    let out = eng.update(0.0005, Inputs::default());
    let seed = out.uniforms.factor.expect("enabled by default");
    assert_eq!(set.borrow().factor, seed);

    let out = eng.update(0.1, Inputs::with([Interaction::ToggleScrambler]));
    assert!(out
        .events
        .contains(&CoreEvent::ScramblerToggled { enabled: false }));
    assert_eq!(out.uniforms.factor, None);
    assert!(!eng.scrambler().enabled());
}

#[test]
fn time_uniform_follows_the_clock() {
    let mut eng = mk_engine();
    let out = eng.update(0.5, Inputs::default());
    assert_relative_eq!(out.uniforms.time.unwrap(), (500.0f64 * 0.001).cos() as f32);
    assert_relative_eq!(eng.clock_ms(), 500.0, epsilon = 1e-6);
}

#[test]
fn picked_label_opens_its_link_once_visible() {
    let mut eng = mk_engine();
    click(&mut eng, Interaction::Primary);
    click(&mut eng, Interaction::Secondary);
    run_until(&mut eng, Phase::Labels, 200);
    tick(&mut eng, 0.016);

    let out = eng.update(0.016, Inputs::with([Interaction::LabelPicked { index: 2 }]));
    assert!(out.events.contains(&CoreEvent::OpenLink {
        title: "Amazon".into(),
        link: "https://www.amazon.com".into(),
    }));
    assert_eq!(eng.label("amazon").unwrap().subtitle, "Electronic store");
}

#[test]
fn cursor_hint_tracks_hover_and_phase() {
    let mut eng = mk_engine();
    let out = eng.update(
        0.016,
        Inputs {
            interactions: vec![],
            hover: Hover::Shape,
        },
    );
    assert_eq!(out.cursor, Cursor::Pointer);
    let out = eng.update(0.016, Inputs::default());
    assert_eq!(out.cursor, Cursor::Auto);
    click(&mut eng, Interaction::Primary);
    let out = eng.update(0.016, Inputs::default());
    assert_eq!(out.cursor, Cursor::Pointer);
}

#[test]
fn same_seed_same_run() {
    let mut a = mk_engine();
    let mut b = mk_engine();
    for eng in [&mut a, &mut b] {
        click(eng, Interaction::Primary);
        click(eng, Interaction::Secondary);
        for _ in 0..120 {
            tick(eng, 0.016);
        }
    }
    assert_eq!(a.pool(), b.pool());
    assert_eq!(a.outputs().particle_positions, b.outputs().particle_positions);
}
