use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use prismatic_core::swarm;
use prismatic_core::{Mesh, ParticlePool, SwarmConfig, TopologyGraph};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn swarm_step(c: &mut Criterion) {
    let cfg = SwarmConfig::default();
    for sides in [3u32, 12, 48] {
        let mesh = Mesh::prism(4.0, 2.0, sides);
        let graph = TopologyGraph::build(&mesh.vertices, &mesh.faces);
        let world: Vec<_> = mesh.positions().copied().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pool =
            ParticlePool::scatter(mesh.vertex_count(), cfg.particles_per_vertex, &cfg, &mut rng);
        swarm::initialize_travel(&mut pool, &graph, &world);

        let mut buf = Vec::with_capacity(pool.len() * 3);
        c.bench_with_input(BenchmarkId::new("advance", pool.len()), &sides, |b, _| {
            b.iter(|| {
                swarm::advance(&mut pool, &cfg);
                pool.write_positions(&mut buf);
            })
        });
    }
}

fn converge_step(c: &mut Criterion) {
    let cfg = SwarmConfig::default();
    let mesh = Mesh::prism(4.0, 2.0, 12);
    let world: Vec<_> = mesh.positions().copied().collect();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut pool =
        ParticlePool::scatter(mesh.vertex_count(), cfg.particles_per_vertex, &cfg, &mut rng);
    c.bench_function("converge", |b| {
        b.iter(|| swarm::converge(&mut pool, &world, &cfg))
    });
}

criterion_group!(benches, swarm_step, converge_step);
criterion_main!(benches);
