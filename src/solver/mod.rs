//! Owns per-slot superpositions and the PRNG; runs the observe-propagate
//! loop with restart.
//!
//! [`Solver`] is generic over a [`crate::topology::Relation`], a
//! [`crate::ruleset::Ruleset`] and a [`crate::topology::SlotTopology`]; it
//! borrows the topology and ruleset for its lifetime and owns everything
//! else (the slot vector, the restart baseline, the PRNG, and statistics).

mod subscriber;

pub use subscriber::{CollapseHistorySubscriber, DebugSubscriber, Subscriber};

use std::cmp::Ordering;
use std::marker::PhantomData;

use rand::Rng;

use crate::ruleset::Ruleset;
use crate::superposition::TileSuperposition;
use crate::topology::{Relation, SlotTopology};
use crate::Lcg;

/// Tunable limits and behavior switches for [`Solver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// Upper bound on observe-propagate iterations per attempt.
    pub max_steps: usize,
    /// Number of fresh attempts before reporting failure.
    pub max_attempts: usize,
    /// Seeds the PRNG at [`Solver::reset`].
    pub random_seed: u64,
    /// Chooses the propagation walk: depth-first recursion (`true`) or an
    /// iterative LIFO-stack walk (`false`). Both reach the same fixpoint;
    /// see [`Solver::propagate_recursive`]/[`Solver::propagate_iterative`].
    pub use_recursive: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_steps: 100_000,
            max_attempts: 20,
            random_seed: 0,
            use_recursive: false,
        }
    }
}

/// A snapshot of the neighborhood around a slot that became empty during
/// propagation, retained for diagnostics.
///
/// `neighbors` pairs each relation out of the failing slot with a *clone* of
/// that neighbor's superposition at the moment of failure — not just its
/// index — since the restart baseline overwrites `Solver::slots` before a
/// caller ever gets to inspect the statistics, so the index alone can't be
/// resolved back to a state afterward.
#[derive(Debug, Clone)]
pub struct ImpossibleNeighborhood<R, S> {
    pub slot: usize,
    pub neighbors: Vec<(R, S)>,
}

/// Counts and diagnostics accumulated across a [`Solver::solve`] call.
#[derive(Debug, Clone)]
pub struct SolverStats<R, S> {
    pub attempts: usize,
    pub observations: usize,
    /// Observations whose pre-observation cardinality was greater than one.
    /// Counts branching decisions made, not a logarithmic "bits of choice"
    /// measure.
    pub choices: usize,
    pub impossible_neighborhoods: Vec<ImpossibleNeighborhood<R, S>>,
}

impl<R, S> Default for SolverStats<R, S> {
    fn default() -> Self {
        Self {
            attempts: 0,
            observations: 0,
            choices: 0,
            impossible_neighborhoods: Vec::new(),
        }
    }
}

/// Outcome of a single [`Solver::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every slot has cardinality <= 1 and propagation is consistent.
    Finished,
    /// A slot's superposition became empty.
    Failed,
    /// Progress was made; more steps remain.
    Continue,
}

/// Owns per-slot superpositions, the PRNG, and statistics; runs the
/// observe-propagate loop with restart.
///
/// `topology` and `ruleset` are borrowed for the solver's lifetime and must
/// outlive it; they are not mutated during [`Solver::solve`].
pub struct Solver<'a, R, Ru, Topo>
where
    R: Relation,
    Ru: Ruleset<R>,
    Topo: SlotTopology<R>,
{
    topology: &'a Topo,
    ruleset: &'a Ru,
    options: SolverOptions,
    rng: Lcg,
    slots: Vec<Ru::Superposition>,
    restart_baseline: Vec<Ru::Superposition>,
    scratch: Ru::Superposition,
    stats: SolverStats<R, Ru::Superposition>,
    apply_initial_constraints: Option<Box<dyn FnMut(&mut [Ru::Superposition]) -> bool>>,
    subscriber: Option<Box<dyn Subscriber>>,
    _relation: PhantomData<R>,
}

impl<'a, R, Ru, Topo> Solver<'a, R, Ru, Topo>
where
    R: Relation,
    Ru: Ruleset<R>,
    Topo: SlotTopology<R>,
{
    /// Builds a solver over `topology` and `ruleset`, with every slot
    /// initialized to a clone of `prototype` (normally "all tiles
    /// possible").
    pub fn new(
        topology: &'a Topo,
        ruleset: &'a Ru,
        prototype: Ru::Superposition,
        options: SolverOptions,
    ) -> Self {
        let slots = vec![prototype.clone(); topology.slot_count()];
        let restart_baseline = slots.clone();
        let scratch = prototype.empty_like();
        Self {
            topology,
            ruleset,
            rng: Lcg::new(options.random_seed),
            options,
            slots,
            restart_baseline,
            scratch,
            stats: SolverStats::default(),
            apply_initial_constraints: None,
            subscriber: None,
            _relation: PhantomData,
        }
    }

    /// Attaches a pre-restriction hook, run once per [`Solver::reset`]
    /// before the initial propagation pass. Returning `false` (e.g. because
    /// it emptied a slot) aborts the reset and fails the upcoming solve.
    pub fn with_initial_constraints(
        mut self,
        constraints: impl FnMut(&mut [Ru::Superposition]) -> bool + 'static,
    ) -> Self {
        self.apply_initial_constraints = Some(Box::new(constraints));
        self
    }

    /// Attaches a subscriber notified on every observation.
    pub fn with_subscriber(mut self, subscriber: Box<dyn Subscriber>) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn stats(&self) -> &SolverStats<R, Ru::Superposition> {
        &self.stats
    }

    /// Current per-slot superpositions. Every entry has cardinality one
    /// after a successful [`Solver::solve`]; after a failed one, this
    /// equals the restart baseline.
    pub fn slots(&self) -> &[Ru::Superposition] {
        &self.slots
    }

    /// The single tile a slot has collapsed to, or `None` if it still holds
    /// more than one possibility.
    pub fn tile_at(&self, slot: usize) -> Option<usize> {
        let superposition = &self.slots[slot];
        (superposition.tile_count() == 1)
            .then(|| superposition.iter().next())
            .flatten()
    }

    /// Restores every slot to "all tiles possible", re-seeds the PRNG,
    /// clears statistics, applies the initial-constraints hook (if any),
    /// and runs one propagation pass per slot. Snapshots the result as the
    /// restart baseline.
    ///
    /// Returns `false` if the constraints hook or the initial propagation
    /// pass empties a slot; `solve` then fails without attempting a single
    /// step.
    pub fn reset(&mut self) -> bool {
        for slot in &mut self.slots {
            slot.set_to_all();
        }
        self.rng.seed(self.options.random_seed);
        self.stats = SolverStats::default();

        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber.on_generation_start();
        }

        if let Some(constraints) = self.apply_initial_constraints.as_mut() {
            if !constraints(&mut self.slots) {
                return false;
            }
        }

        for slot in 0..self.slots.len() {
            if !self.propagate(slot) {
                return false;
            }
        }

        self.restart_baseline = self.slots.clone();
        true
    }

    /// Runs the full lifecycle: optionally [`Solver::reset`], then up to
    /// `max_attempts` independent [`Solver::try_solve`] runs, restoring the
    /// restart baseline (without re-seeding the PRNG) between failures.
    pub fn solve(&mut self, reset_before: bool) -> bool {
        if reset_before && !self.reset() {
            return false;
        }

        for _ in 0..self.options.max_attempts {
            self.stats.attempts += 1;
            if self.try_solve() {
                return true;
            }
            self.slots.clone_from(&self.restart_baseline);
        }
        false
    }

    /// Up to `max_steps` observe-propagate iterations, starting from the
    /// current `slots` state. Returns `true` on reaching a fully collapsed,
    /// consistent state; `false` on contradiction or step-budget exhaustion.
    fn try_solve(&mut self) -> bool {
        for _ in 0..self.options.max_steps {
            match self.step() {
                Status::Finished => return true,
                Status::Failed => return false,
                Status::Continue => {}
            }
        }
        false
    }

    /// One observe-propagate iteration.
    pub fn step(&mut self) -> Status {
        match self.observe() {
            None => Status::Finished,
            Some(slot) => {
                if self.propagate(slot) {
                    Status::Continue
                } else {
                    Status::Failed
                }
            }
        }
    }

    /// Picks the least-entropic non-collapsed slot (uniform tie-break among
    /// the argmin set), collapses it to a single tile, and returns its
    /// index. `None` if every slot already has cardinality <= 1.
    fn observe(&mut self) -> Option<usize> {
        let mut best_entropy = usize::MAX;
        let mut argmin = Vec::new();
        for (slot, superposition) in self.slots.iter().enumerate() {
            let entropy = superposition.entropy();
            if entropy == 0 {
                continue;
            }
            match entropy.cmp(&best_entropy) {
                Ordering::Less => {
                    best_entropy = entropy;
                    argmin.clear();
                    argmin.push(slot);
                }
                Ordering::Equal => argmin.push(slot),
                Ordering::Greater => {}
            }
        }

        if argmin.is_empty() {
            return None;
        }

        let pick = if argmin.len() == 1 {
            0
        } else {
            self.rng.gen_range(0..argmin.len())
        };
        let slot = argmin[pick];

        self.stats.observations += 1;
        debug_assert!(self.slots[slot].tile_count() > 1);
        self.stats.choices += 1;
        self.slots[slot].observe(&mut self.rng);

        if let Some(subscriber) = self.subscriber.as_mut() {
            if let Some(tile) = self.slots[slot].iter().next() {
                subscriber.on_collapse(slot, tile);
            }
        }

        Some(slot)
    }

    /// Propagates the consequences of collapsing `slot`, via the walk
    /// configured by [`SolverOptions::use_recursive`]. Both walks reach the
    /// same fixpoint since every ruleset here is monotone; they may differ
    /// in intermediate order.
    fn propagate(&mut self, slot: usize) -> bool {
        if self.options.use_recursive {
            self.propagate_recursive(slot)
        } else {
            self.propagate_iterative(slot)
        }
    }

    /// Depth-first propagation, the canonical variant: recurses into a
    /// neighbor immediately after it shrinks.
    fn propagate_recursive(&mut self, slot: usize) -> bool {
        for &relation in R::all() {
            let Some((neighbor, dual)) = self.topology.neighbor_of(slot, relation) else {
                continue;
            };
            self.ruleset
                .allowed_states_into(&mut self.scratch, &self.slots[slot], relation, dual);
            let changed = self.slots[neighbor].mask_by(&self.scratch);
            if self.slots[neighbor].is_empty() {
                self.record_impossible_neighborhood(neighbor);
                return false;
            }
            if changed && !self.propagate_recursive(neighbor) {
                return false;
            }
        }
        true
    }

    /// Iterative propagation via an explicit LIFO stack: pops a slot,
    /// propagates to all its neighbors, and pushes any neighbor whose
    /// superposition shrank.
    fn propagate_iterative(&mut self, slot: usize) -> bool {
        let mut stack = vec![slot];
        while let Some(current) = stack.pop() {
            for &relation in R::all() {
                let Some((neighbor, dual)) = self.topology.neighbor_of(current, relation) else {
                    continue;
                };
                self.ruleset.allowed_states_into(
                    &mut self.scratch,
                    &self.slots[current],
                    relation,
                    dual,
                );
                let changed = self.slots[neighbor].mask_by(&self.scratch);
                if self.slots[neighbor].is_empty() {
                    self.record_impossible_neighborhood(neighbor);
                    return false;
                }
                if changed {
                    stack.push(neighbor);
                }
            }
        }
        true
    }

    fn record_impossible_neighborhood(&mut self, slot: usize) {
        let neighbors = R::all()
            .iter()
            .filter_map(|&relation| {
                self.topology
                    .neighbor_of(slot, relation)
                    .map(|(neighbor, _)| (relation, self.slots[neighbor].clone()))
            })
            .collect();
        self.stats
            .impossible_neighborhoods
            .push(ImpossibleNeighborhood { slot, neighbors });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::DenseRuleset;
    use crate::superposition::bitset::BitsetSuperposition;
    use crate::topology::grid::{GridRelation, GridTopology};
    use crate::topology::mesh::{Face, MeshRelation, MeshTopology};
    use crate::NdArray;

    fn checkerboard_ruleset() -> DenseRuleset<GridRelation, BitsetSuperposition> {
        let mut table: NdArray<bool, 3> = NdArray::new([2, 2, GridRelation::COUNT], false);
        for &r in GridRelation::all() {
            table.set_at([0, 1, r.index()], true);
            table.set_at([1, 0, r.index()], true);
        }
        DenseRuleset::new(2, table).unwrap()
    }

    #[test]
    fn checkerboard_alternates() {
        let topo = GridTopology::new(5, 6);
        let ruleset = checkerboard_ruleset();
        let mut solver = Solver::new(
            &topo,
            &ruleset,
            BitsetSuperposition::full(2),
            SolverOptions::default(),
        );
        assert!(solver.solve(true));

        let origin = solver.tile_at(topo.index(0, 0)).unwrap();
        for y in 0..6 {
            for x in 0..5 {
                let tile = solver.tile_at(topo.index(x, y)).unwrap();
                let expect_flip = (x + y) % 2 == 1;
                assert_eq!(tile != origin, expect_flip, "mismatch at ({x},{y})");
            }
        }
    }

    #[test]
    fn single_tile_universe_collapses_without_choices() {
        let topo = GridTopology::new(3, 3);
        let table: NdArray<bool, 3> = NdArray::new([1, 1, GridRelation::COUNT], true);
        let ruleset: DenseRuleset<GridRelation, BitsetSuperposition> =
            DenseRuleset::new(1, table).unwrap();
        let mut solver = Solver::new(
            &topo,
            &ruleset,
            BitsetSuperposition::full(1),
            SolverOptions::default(),
        );
        assert!(solver.solve(true));
        assert_eq!(solver.stats().choices, 0);
        for slot in 0..topo.slot_count() {
            assert_eq!(solver.tile_at(slot), Some(0));
        }
    }

    #[test]
    fn unsatisfiable_pair_fails_at_initial_propagation() {
        let topo = GridTopology::new(2, 1);
        let table: NdArray<bool, 3> = NdArray::new([2, 2, GridRelation::COUNT], false);
        let ruleset: DenseRuleset<GridRelation, BitsetSuperposition> =
            DenseRuleset::new(2, table).unwrap();
        let mut solver = Solver::new(
            &topo,
            &ruleset,
            BitsetSuperposition::full(2),
            SolverOptions::default(),
        );
        assert!(!solver.solve(true));
        assert!(!solver.stats().impossible_neighborhoods.is_empty());
        assert_eq!(solver.stats().attempts, 0);
    }

    fn cube_topology() -> MeshTopology {
        // Faces: 0=+X, 1=-X, 2=+Y, 3=-Y, 4=+Z, 5=-Z; see the identical,
        // dual-consistency-verified table in `topology::mesh`'s tests.
        let adjacency: [[(usize, MeshRelation); 4]; 6] = [
            [
                (2, MeshRelation::Neighbor1),
                (4, MeshRelation::Neighbor0),
                (3, MeshRelation::Neighbor0),
                (5, MeshRelation::Neighbor1),
            ],
            [
                (4, MeshRelation::Neighbor2),
                (2, MeshRelation::Neighbor3),
                (5, MeshRelation::Neighbor3),
                (3, MeshRelation::Neighbor2),
            ],
            [
                (4, MeshRelation::Neighbor1),
                (0, MeshRelation::Neighbor0),
                (5, MeshRelation::Neighbor0),
                (1, MeshRelation::Neighbor1),
            ],
            [
                (0, MeshRelation::Neighbor2),
                (4, MeshRelation::Neighbor3),
                (1, MeshRelation::Neighbor3),
                (5, MeshRelation::Neighbor2),
            ],
            [
                (0, MeshRelation::Neighbor1),
                (2, MeshRelation::Neighbor0),
                (1, MeshRelation::Neighbor0),
                (3, MeshRelation::Neighbor1),
            ],
            [
                (2, MeshRelation::Neighbor2),
                (0, MeshRelation::Neighbor3),
                (3, MeshRelation::Neighbor3),
                (1, MeshRelation::Neighbor2),
            ],
        ];
        let faces = (0..6)
            .map(|i| {
                let mut face = Face::new(i);
                for &rel in MeshRelation::all() {
                    let (neighbor, dual) = adjacency[i][rel.index()];
                    face.set_neighbor(rel, neighbor, dual);
                }
                face
            })
            .collect();
        MeshTopology::new(faces)
    }

    #[test]
    fn uniform_ruleset_on_cube_observes_every_face() {
        let topo = cube_topology();
        let table: NdArray<bool, 3> = NdArray::new([3, 3, MeshRelation::COUNT], true);
        let ruleset: DenseRuleset<MeshRelation, BitsetSuperposition> =
            DenseRuleset::new(3, table).unwrap();
        let mut solver = Solver::new(
            &topo,
            &ruleset,
            BitsetSuperposition::full(3),
            SolverOptions::default(),
        );
        assert!(solver.solve(true));
        assert_eq!(solver.stats().observations, topo.slot_count());
        for slot in 0..topo.slot_count() {
            assert!(solver.tile_at(slot).is_some());
        }
    }

    #[test]
    fn determinism_same_seed_same_result() {
        let topo = GridTopology::new(4, 4);
        let ruleset = checkerboard_ruleset();
        let options = SolverOptions {
            random_seed: 42,
            ..SolverOptions::default()
        };

        let mut first = Solver::new(&topo, &ruleset, BitsetSuperposition::full(2), options);
        assert!(first.solve(true));
        let first_tiles: Vec<_> = (0..topo.slot_count()).map(|s| first.tile_at(s)).collect();

        let mut second = Solver::new(&topo, &ruleset, BitsetSuperposition::full(2), options);
        assert!(second.solve(true));
        let second_tiles: Vec<_> = (0..topo.slot_count()).map(|s| second.tile_at(s)).collect();

        assert_eq!(first_tiles, second_tiles);
    }

    #[test]
    fn recursive_and_iterative_propagation_agree_on_final_state() {
        let topo = GridTopology::new(4, 5);
        let ruleset = checkerboard_ruleset();

        let mut recursive = Solver::new(
            &topo,
            &ruleset,
            BitsetSuperposition::full(2),
            SolverOptions {
                use_recursive: true,
                random_seed: 7,
                ..SolverOptions::default()
            },
        );
        let mut iterative = Solver::new(
            &topo,
            &ruleset,
            BitsetSuperposition::full(2),
            SolverOptions {
                use_recursive: false,
                random_seed: 7,
                ..SolverOptions::default()
            },
        );

        assert!(recursive.solve(true));
        assert!(iterative.solve(true));

        let recursive_tiles: Vec<_> = (0..topo.slot_count()).map(|s| recursive.tile_at(s)).collect();
        let iterative_tiles: Vec<_> = (0..topo.slot_count()).map(|s| iterative.tile_at(s)).collect();
        assert_eq!(recursive_tiles, iterative_tiles);
    }

    #[test]
    fn initial_constraints_can_fail_the_solve() {
        let topo = GridTopology::new(2, 2);
        let table: NdArray<bool, 3> = NdArray::new([2, 2, GridRelation::COUNT], true);
        let ruleset: DenseRuleset<GridRelation, BitsetSuperposition> =
            DenseRuleset::new(2, table).unwrap();
        let mut solver = Solver::new(
            &topo,
            &ruleset,
            BitsetSuperposition::full(2),
            SolverOptions::default(),
        )
        .with_initial_constraints(|slots| {
            slots[0].set_to_none();
            false
        });
        assert!(!solver.solve(true));
    }

    #[test]
    fn restart_baseline_is_restored_after_exhausted_attempts() {
        // A 3-tile ring where only adjacent-by-one labels connect: with a
        // tiny attempt budget and an unlucky seed this can legitimately
        // exhaust attempts; either way slots must end up consistent with the
        // baseline contract (every entry has cardinality >= 1).
        let topo = GridTopology::new(3, 1);
        let mut table: NdArray<i32, 2> = NdArray::new([3, GridRelation::COUNT], 0);
        for (tile, label) in [0, 1, -1].into_iter().enumerate() {
            for &r in GridRelation::all() {
                table.set_at([tile, r.index()], label);
            }
        }
        let ruleset = crate::ruleset::SignedWangRuleset::<GridRelation, BitsetSuperposition>::new(
            3, table,
        )
        .unwrap();
        let options = SolverOptions {
            max_attempts: 5,
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(&topo, &ruleset, BitsetSuperposition::full(3), options);
        solver.solve(true);
        for slot in solver.slots() {
            assert!(slot.tile_count() >= 1);
        }
    }
}
