use std::collections::BTreeSet;

use rand::Rng;

use super::TileSuperposition;

/// Reference, unoptimized [`TileSuperposition`], backed by an ordered set of
/// tile ids.
///
/// This is the oracle used in tests and for educational purposes. It
/// deliberately uses a *sorted* set (`BTreeSet`) rather than a hash set: the
/// cross-implementation parity law (see crate tests) requires that, given
/// identically seeded PRNGs, [`observe`](TileSuperposition::observe) picks
/// the same tile here as it does in [`super::bitset::BitsetSuperposition`],
/// which enumerates tiles in ascending order. A hash-set-backed
/// implementation would satisfy every other law but break that one, since
/// `std::collections::HashSet`'s iteration order is randomized per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaiveSuperposition {
    universe_size: usize,
    elements: BTreeSet<usize>,
}

impl TileSuperposition for NaiveSuperposition {
    fn full(universe_size: usize) -> Self {
        Self {
            universe_size,
            elements: (0..universe_size).collect(),
        }
    }

    fn empty_like(&self) -> Self {
        Self {
            universe_size: self.universe_size,
            elements: BTreeSet::new(),
        }
    }

    fn universe_size(&self) -> usize {
        self.universe_size
    }

    fn set_to_all(&mut self) {
        self.elements = (0..self.universe_size).collect();
    }

    fn set_to_none(&mut self) {
        self.elements.clear();
    }

    fn contains(&self, tile: usize) -> bool {
        self.elements.contains(&tile)
    }

    fn add(&mut self, tile: usize) {
        self.elements.insert(tile);
    }

    fn add_other(&mut self, other: &Self) -> bool {
        let before = self.elements.len();
        self.elements.extend(other.elements.iter().copied());
        self.elements.len() != before
    }

    fn mask_by(&mut self, other: &Self) -> bool {
        let before = self.elements.len();
        self.elements.retain(|t| other.elements.contains(t));
        self.elements.len() != before
    }

    fn tile_count(&self) -> usize {
        self.elements.len()
    }

    fn observe<R: rand_core::RngCore>(&mut self, rng: &mut R) {
        let count = self.elements.len();
        debug_assert!(count >= 1, "observe() called on an empty superposition");
        if count == 1 {
            return;
        }
        let k = rng.gen_range(0..count);
        let tile = *self.elements.iter().nth(k).expect("k is within bounds");
        self.elements.clear();
        self.elements.insert(tile);
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements.iter().copied()
    }
}
