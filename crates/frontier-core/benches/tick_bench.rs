//! Criterion benchmarks for the Frontier tick engine.
//!
//! Two benchmark groups:
//! - `single_region`: one region filled to its slot cap -- the common case.
//! - `many_regions`: 32 activated regions of mixed buildings, with active
//!   research, measuring a full engine pass.

use criterion::{Criterion, criterion_group, criterion_main};
use frontier_core::engine::Engine;
use frontier_core::test_utils::*;

/// Fill the current region of `engine` with miners, smelters, and a lab.
fn populate_region(engine: &mut Engine) {
    fund(engine, iron_plate(), 1_000_000.0);
    fund(engine, gear(), 1_000_000.0);
    fund(engine, iron_ore(), 1_000.0);
    fund(engine, science_pack(), 1_000_000.0);
    // 4 + 4 + 2 = 10 slots, the basin's capacity.
    for _ in 0..4 {
        engine.build(miner(), Some(0), None).unwrap();
    }
    for _ in 0..4 {
        engine.build(smelter(), None, Some(smelt_iron())).unwrap();
    }
    engine.build(lab(), None, None).unwrap();
}

fn build_single_region() -> Engine {
    let mut engine = engine_with_region();
    populate_region(&mut engine);
    engine.research(automation()).unwrap();
    engine
}

fn build_many_regions() -> Engine {
    let mut engine = engine_with_region();
    populate_region(&mut engine);
    for _ in 1..32 {
        let region = engine.activate_region(basin()).unwrap();
        engine.set_current_region(region).unwrap();
        populate_region(&mut engine);
    }
    engine.research(automation()).unwrap();
    engine
}

fn bench_tick(c: &mut Criterion) {
    let dt = fixed(0.1);

    c.bench_function("single_region", |b| {
        let mut engine = build_single_region();
        b.iter(|| engine.tick(dt).unwrap());
    });

    c.bench_function("many_regions", |b| {
        let mut engine = build_many_regions();
        b.iter(|| engine.tick(dt).unwrap());
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
