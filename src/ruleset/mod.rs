//! The oracle answering "may tile `X` face tile `Y` across relations
//! `(rX, rY)`?" and, for optimization, "given superposition `S` on one side,
//! what superposition is induced on the other side?"
//!
//! Three concrete forms are provided: a [`dense::DenseRuleset`] boolean
//! table, a [`wang::SignedWangRuleset`] signed-label table, and a
//! [`fast_wang::FastSignedWangRuleset`] memoized specialization for
//! [`crate::superposition::bitset::BitsetSuperposition`].

pub mod dense;
pub mod error;
pub mod fast_wang;
pub mod wang;

pub use dense::DenseRuleset;
pub use error::RulesetError;
pub use fast_wang::FastSignedWangRuleset;
pub use wang::SignedWangRuleset;

use crate::superposition::TileSuperposition;
use crate::topology::Relation;

/// A stateless function over `(Tile, Relation, Tile, Relation) -> bool`, with
/// a bulk projection `(Superposition, Relation, Relation) -> Superposition`.
///
/// Invariants:
/// - *Symmetry under dual relations*: for a canonical dual pair `(r, r')`,
///   `allows(x, r, y, r') == allows(y, r', x, r)`.
/// - The projection is equivalent to the per-element predicate:
///   `allowed_states(S, rX, rY) == { y : exists x in S, allows(x, rX, y, rY) }`.
pub trait Ruleset<R: Relation> {
    /// The superposition representation this ruleset evaluates against.
    type Superposition: TileSuperposition;

    /// Size of the tile universe.
    fn tile_count(&self) -> usize;

    /// Whether tile `x`, seen through relation `rX`, may face tile `y`, seen
    /// through the dual relation `rY`.
    fn allows(&self, x: usize, rx: R, y: usize, ry: R) -> bool;

    /// All tiles `y` admissible for some `x` in `s`, across `(rX, rY)`.
    fn allowed_states(&self, s: &Self::Superposition, rx: R, ry: R) -> Self::Superposition {
        let mut out = s.empty_like();
        self.allowed_states_into(&mut out, s, rx, ry);
        out
    }

    /// Same as [`allowed_states`](Ruleset::allowed_states), but writes into a
    /// caller-owned scratch buffer instead of allocating a fresh
    /// superposition. The solver reuses one scratch buffer across every
    /// propagation edge in an attempt.
    ///
    /// The default implementation is the direct `O(|S| * N)` scan described
    /// by the projection-consistency law; [`fast_wang::FastSignedWangRuleset`]
    /// overrides it with a memoized union.
    fn allowed_states_into(
        &self,
        out: &mut Self::Superposition,
        s: &Self::Superposition,
        rx: R,
        ry: R,
    ) {
        out.set_to_none();
        for y in 0..self.tile_count() {
            if s.iter().any(|x| self.allows(x, rx, y, ry)) {
                out.add(y);
            }
        }
    }
}
