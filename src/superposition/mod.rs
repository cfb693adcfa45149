//! The set of tiles still possible at a slot.
//!
//! Two implementations share the [`TileSuperposition`] contract: a reference
//! [`naive`] one (an ordered set of tile ids) and a fast [`bitset`] one,
//! packed into fixed-width machine words. The solver is generic over this
//! trait; the bitset implementation is the hot path.

pub mod bitset;
pub mod naive;

/// A subset of the tile universe at one slot.
///
/// Invariants upheld by every implementor:
/// - Monotone shrinking during a solve attempt: [`mask_by`](TileSuperposition::mask_by)
///   may only remove tiles.
/// - [`entropy`](TileSuperposition::entropy) returns `max(0, |S| - 1)`; zero
///   when one or zero tiles remain.
/// - [`observe`](TileSuperposition::observe) is defined only when
///   `tile_count() >= 1` and leaves `tile_count() == 1`.
/// - Equality is set-equality; insertion order is irrelevant.
pub trait TileSuperposition: Clone + PartialEq {
    /// Returns the full superposition over a universe of `universe_size`
    /// tiles (all bits set), with cardinality `universe_size`.
    fn full(universe_size: usize) -> Self;

    /// Returns an *empty* superposition over the same universe as `self`.
    /// This is how new superpositions are allocated during ruleset
    /// evaluation (the "prototype" pattern).
    fn empty_like(&self) -> Self;

    /// Size of the tile universe this superposition ranges over.
    fn universe_size(&self) -> usize;

    /// Sets every tile as possible. Idempotent.
    fn set_to_all(&mut self);

    /// Clears every tile. Idempotent.
    fn set_to_none(&mut self);

    /// Whether `tile` is currently possible.
    fn contains(&self, tile: usize) -> bool;

    /// Adds a single tile. Cardinality increases by 0 or 1.
    fn add(&mut self, tile: usize);

    /// Unions `other` into `self` (bitwise OR). Returns `true` iff any new
    /// tile was added.
    fn add_other(&mut self, other: &Self) -> bool;

    /// Intersects `self` with `other` (bitwise AND), keeping only tiles
    /// present in both. Returns `true` iff any tile was removed. This is the
    /// hot path of propagation.
    fn mask_by(&mut self, other: &Self) -> bool;

    /// Number of tiles still possible.
    fn tile_count(&self) -> usize;

    /// Whether no tile is possible anymore (a contradiction).
    fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }

    /// `max(0, tile_count() - 1)`. Zero for a collapsed or empty superposition.
    fn entropy(&self) -> usize {
        self.tile_count().saturating_sub(1)
    }

    /// Replaces the superposition with a single tile chosen uniformly from
    /// its current contents. A no-op if already collapsed to a single tile.
    /// Undefined (may panic in debug builds) if empty.
    fn observe<R: rand_core::RngCore>(&mut self, rng: &mut R);

    /// Iterates over the tiles still possible. Implementations are free to
    /// choose their order, except the bitset implementation, which is
    /// required to yield ids in strictly ascending order (see
    /// [`bitset::BitsetSuperposition`]).
    fn iter(&self) -> impl Iterator<Item = usize> + '_;
}
