use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nbody_engine::constants::G;
use nbody_engine::forces::{create_gravity, FieldSource, GravityAlgorithm};
use nbody_engine::math::Vector3;
use nbody_engine::{BodyCore, BodyState, NBodyWorld, SimulationConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn cloud(count: usize) -> Vec<FieldSource> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..count)
        .map(|_| {
            let position = Vector3::new(
                rng.gen_range(-1.0e10..1.0e10),
                rng.gen_range(-1.0e10..1.0e10),
                rng.gen_range(-1.0e9..1.0e9),
            );
            let mass = rng.gen_range(1.0e20..1.0e24);
            FieldSource::new(position, mass, G * mass, 1.0e3)
        })
        .collect()
}

fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_all_pairs");

    for count in [100, 1_000, 4_000] {
        let sources = cloud(count);
        for algorithm in [GravityAlgorithm::Direct, GravityAlgorithm::BarnesHut] {
            // Direct is quadratic; skip the largest cloud
            if algorithm == GravityAlgorithm::Direct && count > 1_000 {
                continue;
            }
            let mut gravity = create_gravity(algorithm, 0.5, 16);
            group.bench_with_input(BenchmarkId::new(algorithm.name(), count), &sources, |b, sources| {
                b.iter(|| {
                    gravity.prepare(sources);
                    let mut sum = Vector3::ZERO;
                    for (index, source) in sources.iter().enumerate() {
                        sum += gravity.acceleration_at(&source.position, Some(index));
                    }
                    black_box(sum)
                });
            });
        }
    }
    group.finish();
}

fn bench_world_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");

    for algorithm in [GravityAlgorithm::Direct, GravityAlgorithm::BarnesHut] {
        let config = SimulationConfig {
            dt: 60.0,
            gravity_algorithm: algorithm,
            ..SimulationConfig::default()
        };
        let mut world = NBodyWorld::with_config(config).unwrap();
        for (index, source) in cloud(500).into_iter().enumerate() {
            let core = BodyCore::massive(format!("body-{}", index), "Body", source.mass, 1.0e5);
            world.add_body(core, BodyState::new(source.position, Vector3::ZERO)).unwrap();
        }

        group.bench_function(algorithm.name(), |b| {
            b.iter(|| world.tick(60.0).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_field, bench_world_tick);
criterion_main!(benches);
