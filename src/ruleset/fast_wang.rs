use std::marker::PhantomData;

use super::{error::RulesetError, Ruleset};
use crate::array::NdArray;
use crate::superposition::{bitset::BitsetSuperposition, TileSuperposition};
use crate::topology::Relation;

/// A memoized specialization of [`super::wang::SignedWangRuleset`] for
/// [`BitsetSuperposition`]. Replaces the `O(|S| * N)` scan of the naive
/// projection with `O(|S| + Relation::COUNT * max_label + popcount work)`.
///
/// At construction, for every `(label, relation)` pair with
/// `|label| <= max_label`, precomputes the superposition of all tiles `y`
/// such that `label[y, relation] == -label`.
#[derive(Debug, Clone)]
pub struct FastSignedWangRuleset<R: Relation> {
    tile_count: usize,
    table: NdArray<i32, 2>,
    max_label: i32,
    /// Indexed by `(max_label + label) * Relation::COUNT + relation.index()`.
    memo: Vec<BitsetSuperposition>,
    _marker: PhantomData<R>,
}

impl<R: Relation> FastSignedWangRuleset<R> {
    pub fn new(tile_count: usize, table: NdArray<i32, 2>) -> Result<Self, RulesetError> {
        let expected = (tile_count, R::COUNT);
        let actual = (table.shape(0), table.shape(1));
        if actual != expected {
            return Err(RulesetError::LabelTableShapeMismatch { expected, actual });
        }

        let mut max_label = 0i32;
        for tile in 0..tile_count {
            for rel in 0..R::COUNT {
                max_label = max_label.max(table.get_at([tile, rel]).abs());
            }
        }

        let mut memo = Vec::with_capacity((2 * max_label as usize + 1) * R::COUNT);
        for label in -max_label..=max_label {
            for rel in 0..R::COUNT {
                let mut entry = BitsetSuperposition::full(tile_count);
                entry.set_to_none();
                for y in 0..tile_count {
                    if table.get_at([y, rel]) == -label {
                        entry.add(y);
                    }
                }
                memo.push(entry);
            }
        }

        Ok(Self {
            tile_count,
            table,
            max_label,
            memo,
            _marker: PhantomData,
        })
    }

    fn memo_index(&self, label: i32, relation_index: usize) -> usize {
        debug_assert!(label.abs() <= self.max_label);
        (self.max_label + label) as usize * R::COUNT + relation_index
    }

    pub fn table(&self) -> &NdArray<i32, 2> {
        &self.table
    }
}

impl<R: Relation> Ruleset<R> for FastSignedWangRuleset<R> {
    type Superposition = BitsetSuperposition;

    fn tile_count(&self) -> usize {
        self.tile_count
    }

    fn allows(&self, x: usize, rx: R, y: usize, ry: R) -> bool {
        self.table.get_at([x, rx.index()]) == -self.table.get_at([y, ry.index()])
    }

    fn allowed_states_into(
        &self,
        out: &mut BitsetSuperposition,
        s: &BitsetSuperposition,
        rx: R,
        ry: R,
    ) {
        out.set_to_none();

        let mut use_memoized = vec![false; self.memo.len()];
        for x in s.iter() {
            let label_x = self.table.get_at([x, rx.index()]);
            use_memoized[self.memo_index(label_x, ry.index())] = true;
        }

        for (idx, &flagged) in use_memoized.iter().enumerate() {
            if flagged {
                out.add_other(&self.memo[idx]);
            }
        }
    }
}
