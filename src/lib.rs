//! # Tile-based constraint solver (Wave Function Collapse core)
//!
//! Given a [`topology::SlotTopology`] describing which slots neighbor which
//! along which relation, a [`ruleset::Ruleset`] describing which tile pairs
//! are admissible across a relation, and a prototype
//! [`superposition::TileSuperposition`], [`solver::Solver`] collapses every
//! slot to exactly one tile such that all adjacency constraints are
//! satisfied, or reports failure after a bounded search budget.
//!
//! ## Main distinction
//!
//! The crate is organized in dependency order, leaves first:
//!
//! - [`array`] — fixed-rank, fixed-shape contiguous storage used by rulesets.
//! - [`superposition`] — the set of tiles still possible at a slot. Two
//!   implementations are provided: [`superposition::naive::NaiveSuperposition`]
//!   (a reference oracle) and [`superposition::bitset::BitsetSuperposition`]
//!   (the fast, packed representation used in practice).
//! - [`ruleset`] — the oracle answering whether tile `X` may face tile `Y`
//!   across a pair of relations.
//! - [`topology`] — the neighbor oracle over slots: a regular 2D grid or an
//!   arbitrary mesh face graph.
//! - [`solver`] — owns per-slot superpositions and the PRNG; runs the
//!   observe/propagate loop with restart.
//!
//! This is a library with no CLI, no environment variables and no persisted
//! state of its own; all persistence is left to the caller.

pub mod array;
pub mod ruleset;
pub mod solver;
pub mod superposition;
pub mod topology;

mod rng;

pub use array::NdArray;
pub use rng::Lcg;
pub use ruleset::{DenseRuleset, FastSignedWangRuleset, Ruleset, RulesetError, SignedWangRuleset};
pub use solver::{Solver, SolverOptions, SolverStats, Status, Subscriber};
pub use superposition::{bitset::BitsetSuperposition, naive::NaiveSuperposition, TileSuperposition};
pub use topology::{
    grid::{GridRelation, GridTopology},
    mesh::{Face, MeshRelation, MeshTopology},
    Relation, SlotTopology,
};
