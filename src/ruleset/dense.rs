use std::marker::PhantomData;

use super::{error::RulesetError, Ruleset};
use crate::array::NdArray;
use crate::superposition::TileSuperposition;
use crate::topology::Relation;

/// A dense boolean ruleset: a 3D array of shape `(tile_count, tile_count,
/// Relation::COUNT)`. `allows(x, rX, y, rY)` returns `table[x, y, rX]` — the
/// second relation is unused, since the dual direction is encoded implicitly
/// by the caller's duality guarantee (see [`crate::topology::SlotTopology`]).
///
/// The table must be symmetric across dual relations; this is the caller's
/// contract (see [`DenseRuleset::is_symmetric_under`]).
#[derive(Debug, Clone)]
pub struct DenseRuleset<R: Relation, S: TileSuperposition> {
    tile_count: usize,
    table: NdArray<bool, 3>,
    _marker: PhantomData<(R, S)>,
}

impl<R: Relation, S: TileSuperposition> DenseRuleset<R, S> {
    /// Builds a dense ruleset from a `(tile_count, tile_count,
    /// Relation::COUNT)`-shaped table.
    pub fn new(tile_count: usize, table: NdArray<bool, 3>) -> Result<Self, RulesetError> {
        let expected = (tile_count, tile_count, R::COUNT);
        let actual = (table.shape(0), table.shape(1), table.shape(2));
        if actual != expected {
            return Err(RulesetError::DenseTableShapeMismatch { expected, actual });
        }
        Ok(Self {
            tile_count,
            table,
            _marker: PhantomData,
        })
    }

    /// Checks dual symmetry for every provided `(r, r')` pair: debug-time
    /// validation of the caller's contract that
    /// `allows(x, r, y, r') == allows(y, r', x, r)`.
    pub fn is_symmetric_under(&self, dual_pairs: &[(R, R)]) -> bool {
        for &(r, r_dual) in dual_pairs {
            for x in 0..self.tile_count {
                for y in 0..self.tile_count {
                    if self.allows(x, r, y, r_dual) != self.allows(y, r_dual, x, r) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl<R: Relation, S: TileSuperposition> Ruleset<R> for DenseRuleset<R, S> {
    type Superposition = S;

    fn tile_count(&self) -> usize {
        self.tile_count
    }

    fn allows(&self, x: usize, rx: R, y: usize, _ry: R) -> bool {
        self.table.get_at([x, y, rx.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::superposition::bitset::BitsetSuperposition;
    use crate::topology::grid::GridRelation;

    fn checkerboard_ruleset() -> DenseRuleset<GridRelation, BitsetSuperposition> {
        // Tile 0 and 1 may never touch their own kind, always each other.
        let mut table: NdArray<bool, 3> = NdArray::new([2, 2, 4], false);
        for &r in GridRelation::all() {
            table.set_at([0, 1, r.index()], true);
            table.set_at([1, 0, r.index()], true);
        }
        DenseRuleset::new(2, table).unwrap()
    }

    #[test]
    fn rejects_mismatched_shape() {
        let table: NdArray<bool, 3> = NdArray::new([2, 2, 1], false);
        let err = DenseRuleset::<GridRelation, BitsetSuperposition>::new(2, table).unwrap_err();
        assert!(matches!(err, RulesetError::DenseTableShapeMismatch { .. }));
    }

    #[test]
    fn checkerboard_is_symmetric() {
        let ruleset = checkerboard_ruleset();
        let dual_pairs = [
            (GridRelation::PosX, GridRelation::NegX),
            (GridRelation::PosY, GridRelation::NegY),
        ];
        assert!(ruleset.is_symmetric_under(&dual_pairs));
    }

    #[test]
    fn allowed_states_matches_predicate() {
        let ruleset = checkerboard_ruleset();
        let mut s = BitsetSuperposition::full(2);
        s.mask_by(&{
            let mut only_zero = s.empty_like();
            only_zero.add(0);
            only_zero
        });
        let allowed = ruleset.allowed_states(&s, GridRelation::PosX, GridRelation::NegX);
        assert!(allowed.contains(1));
        assert!(!allowed.contains(0));
    }
}
