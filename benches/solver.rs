use criterion::{criterion_group, criterion_main, Criterion};

use wfc_core::{
    BitsetSuperposition, DenseRuleset, GridRelation, GridTopology, Relation, Solver,
    SolverOptions, TileSuperposition,
};

fn checkerboard_ruleset() -> DenseRuleset<GridRelation, BitsetSuperposition> {
    let mut table = wfc_core::NdArray::new([2, 2, GridRelation::COUNT], false);
    for &r in GridRelation::all() {
        table.set_at([0, 1, r.index()], true);
        table.set_at([1, 0, r.index()], true);
    }
    DenseRuleset::new(2, table).unwrap()
}

fn solve_checkerboard_32x32(c: &mut Criterion) {
    let topo = GridTopology::new(32, 32);
    let ruleset = checkerboard_ruleset();

    c.bench_function("solve_checkerboard_32x32", |b| {
        b.iter(|| {
            let mut solver = Solver::new(
                &topo,
                &ruleset,
                BitsetSuperposition::full(2),
                SolverOptions {
                    random_seed: 1,
                    ..SolverOptions::default()
                },
            );
            assert!(solver.solve(true));
        })
    });
}

fn solve_five_tile_32x32(c: &mut Criterion) {
    let topo = GridTopology::new(32, 32);
    let mut table = wfc_core::NdArray::new([5, 5, GridRelation::COUNT], true);
    for &r in GridRelation::all() {
        // Tile 0 is a "wall" tile that may only neighbor itself.
        for other in 1..5 {
            table.set_at([0, other, r.index()], false);
            table.set_at([other, 0, r.index()], false);
        }
    }
    let ruleset: DenseRuleset<GridRelation, BitsetSuperposition> =
        DenseRuleset::new(5, table).unwrap();

    c.bench_function("solve_five_tile_32x32", |b| {
        b.iter(|| {
            let mut solver = Solver::new(
                &topo,
                &ruleset,
                BitsetSuperposition::full(5),
                SolverOptions {
                    random_seed: 2,
                    ..SolverOptions::default()
                },
            );
            solver.solve(true);
        })
    });
}

criterion_group!(solver_bench, solve_checkerboard_32x32, solve_five_tile_32x32);
criterion_main!(solver_bench);
