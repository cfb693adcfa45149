use std::marker::PhantomData;

use super::{error::RulesetError, Ruleset};
use crate::array::NdArray;
use crate::superposition::TileSuperposition;
use crate::topology::Relation;

/// A signed-Wang ruleset: each tile edge carries a signed integer label, and
/// two tiles connect iff their labels are negations of each other.
///
/// Backed by a `(tile_count, Relation::COUNT)`-shaped table of labels.
/// `allows(x, rX, y, rY) == (label[x, rX] == -label[y, rY])`.
#[derive(Debug, Clone)]
pub struct SignedWangRuleset<R: Relation, S: TileSuperposition> {
    tile_count: usize,
    table: NdArray<i32, 2>,
    _marker: PhantomData<(R, S)>,
}

impl<R: Relation, S: TileSuperposition> SignedWangRuleset<R, S> {
    pub fn new(tile_count: usize, table: NdArray<i32, 2>) -> Result<Self, RulesetError> {
        let expected = (tile_count, R::COUNT);
        let actual = (table.shape(0), table.shape(1));
        if actual != expected {
            return Err(RulesetError::LabelTableShapeMismatch { expected, actual });
        }
        Ok(Self {
            tile_count,
            table,
            _marker: PhantomData,
        })
    }

    pub fn label(&self, tile: usize, relation: R) -> i32 {
        self.table.get_at([tile, relation.index()])
    }

    pub fn table(&self) -> &NdArray<i32, 2> {
        &self.table
    }
}

impl<R: Relation, S: TileSuperposition> Ruleset<R> for SignedWangRuleset<R, S> {
    type Superposition = S;

    fn tile_count(&self) -> usize {
        self.tile_count
    }

    fn allows(&self, x: usize, rx: R, y: usize, ry: R) -> bool {
        self.label(x, rx) == -self.label(y, ry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::superposition::bitset::BitsetSuperposition;
    use crate::topology::grid::GridRelation;

    fn opposite_sign_ruleset() -> SignedWangRuleset<GridRelation, BitsetSuperposition> {
        // 3 tiles, labels the same on every side: +1, -1, +2.
        let mut table: NdArray<i32, 2> = NdArray::new([3, 4], 0);
        let labels = [1, -1, 2];
        for (tile, &label) in labels.iter().enumerate() {
            for &r in GridRelation::all() {
                table.set_at([tile, r.index()], label);
            }
        }
        SignedWangRuleset::new(3, table).unwrap()
    }

    #[test]
    fn opposite_signs_connect() {
        let ruleset = opposite_sign_ruleset();
        assert!(ruleset.allows(0, GridRelation::PosX, 1, GridRelation::NegX));
        assert!(!ruleset.allows(0, GridRelation::PosX, 0, GridRelation::NegX));
        assert!(!ruleset.allows(0, GridRelation::PosX, 2, GridRelation::NegX));
    }

    #[test]
    fn dual_symmetry_holds() {
        let ruleset = opposite_sign_ruleset();
        for x in 0..3 {
            for y in 0..3 {
                assert_eq!(
                    ruleset.allows(x, GridRelation::PosX, y, GridRelation::NegX),
                    ruleset.allows(y, GridRelation::NegX, x, GridRelation::PosX)
                );
            }
        }
    }
}
