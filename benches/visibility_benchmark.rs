// benches/visibility_benchmark.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use rand::Rng;

use room_viewer::config::SceneConfig;
use room_viewer::engine_lib::assembler::SceneAssembler;
use room_viewer::engine_lib::demo_room::create_demo_room;
use room_viewer::engine_lib::visibility::{SealingFloorPolicy, VisibilityResolver};

fn random_camera(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-15.0..15.0),
        rng.gen_range(-15.0..15.0),
        rng.gen_range(-15.0..15.0),
    )
}

fn visibility_benchmark_fn(c: &mut Criterion) {
    let mut rng = rand::thread_rng();

    const NUM_CAMERA_POSITIONS: usize = 100;
    let cameras: Vec<Vec3> = (0..NUM_CAMERA_POSITIONS).map(|_| random_camera(&mut rng)).collect();

    let mut scene = SceneAssembler::new(&SceneConfig::default())
        .assemble(create_demo_room())
        .expect("demo room has every reserved part");

    let mut group = c.benchmark_group("VisibilityResolver");

    for (label, policy) in [
        ("resolve_distance_policy", SealingFloorPolicy::Distance),
        ("resolve_vertical_threshold_policy", SealingFloorPolicy::vertical_threshold()),
    ] {
        let resolver = VisibilityResolver::new(policy);
        group.bench_function(label, |b| {
            let mut camera_iter = cameras.iter().cycle();
            b.iter(|| {
                let camera = camera_iter.next().unwrap();
                resolver.resolve(black_box(*camera), black_box(&mut scene))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, visibility_benchmark_fn);
criterion_main!(benches);
