//! Benchmark for the enclosure flood fill

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use biodome::core::types::{CellPos, CellRect};
use biodome::enclosure::EnclosureGraph;
use biodome::terrain::{TerrainGrid, TileKind};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// 128x128 grid with a lattice of sealed rooms
fn roomy_grid() -> TerrainGrid {
    let mut grid = TerrainGrid::new(128, 128);
    for room_y in 0..6 {
        for room_x in 0..6 {
            let min = CellPos::new(4 + room_x * 20, 4 + room_y * 20);
            let max = CellPos::new(min.x + 10, min.y + 10);
            for x in min.x..=max.x {
                grid.set_tile(CellPos::new(x, min.y), TileKind::Wall);
                grid.set_tile(CellPos::new(x, max.y), TileKind::Wall);
            }
            for y in min.y..=max.y {
                grid.set_tile(CellPos::new(min.x, y), TileKind::Wall);
                grid.set_tile(CellPos::new(max.x, y), TileKind::Wall);
            }
        }
    }
    grid
}

fn bench_full_recompute(c: &mut Criterion) {
    let grid = roomy_grid();
    c.bench_function("full_recompute_128x128_36_rooms", |b| {
        b.iter(|| {
            let mut graph = EnclosureGraph::new(120);
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            graph.full_recompute(black_box(&grid), &mut rng, 100.0);
            black_box(graph.region_count())
        })
    });
}

fn bench_incremental_recompute(c: &mut Criterion) {
    let mut grid = roomy_grid();
    let mut graph = EnclosureGraph::new(250);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    graph.full_recompute(&grid, &mut rng, 100.0);

    // toggle one door-sized wall segment back and forth
    let door = CellPos::new(9, 4);
    c.bench_function("incremental_recompute_single_edit", |b| {
        let mut open = false;
        b.iter(|| {
            open = !open;
            let kind = if open { TileKind::Open } else { TileKind::Wall };
            grid.set_tile(door, kind);
            let outcome = graph.incremental_recompute(
                CellRect::from_cell(door),
                black_box(&grid),
                &mut rng,
                100.0,
            );
            black_box(outcome.new_regions.len())
        })
    });
}

criterion_group!(benches, bench_full_recompute, bench_incremental_recompute);
criterion_main!(benches);
