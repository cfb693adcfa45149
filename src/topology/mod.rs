//! The neighbor oracle over slots.
//!
//! Two realizations are provided: a regular [`grid::GridTopology`] with four
//! relations, and a general [`mesh::MeshTopology`] face graph with up to four
//! neighbors per face.

pub mod grid;
pub mod mesh;

/// A tagged variant drawn from a fixed, finite set specific to a topology
/// kind. Relations always come in dual pairs: if slot `A` sees slot `B` via
/// relation `r_a`, then `B` sees `A` via some relation `r_b`, and the
/// topology guarantees this duality.
pub trait Relation: Copy + Eq + std::fmt::Debug + 'static {
    /// Number of distinct relations in this kind of topology.
    const COUNT: usize;

    /// All relations, in the order their index is assigned.
    fn all() -> &'static [Self];

    /// Dense index in `[0, Self::COUNT)`.
    fn index(&self) -> usize;
}

/// A function `slot × relation → Option<(slot, dual_relation)>`.
///
/// Invariants:
/// - Total within the slot set: returns `None` exactly at domain boundaries.
/// - Duality: if `neighbor_of(a, r) == Some((b, r'))`, then
///   `neighbor_of(b, r') == Some((a, r))`.
pub trait SlotTopology<R: Relation> {
    /// Total number of slots.
    fn slot_count(&self) -> usize;

    /// The slot that is in relation `relation` with `slot`, together with
    /// the dual relation by which it sees `slot` back. `None` at a domain
    /// boundary.
    fn neighbor_of(&self, slot: usize, relation: R) -> Option<(usize, R)>;
}
