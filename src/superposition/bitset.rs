use std::cell::Cell;

use rand::Rng;

use super::TileSuperposition;

const WORD_BITS: usize = u32::BITS as usize;

/// Bitset-packed [`TileSuperposition`]. Bit `i` of the packed words
/// represents tile `i`; trailing unused bits in the last word are always
/// zero.
///
/// Cardinality is cached lazily: mutating operations that may change it
/// either update the cache exactly (single-bit [`add`](TileSuperposition::add))
/// or invalidate it (bulk AND/OR), and [`tile_count`](TileSuperposition::tile_count)
/// recomputes on demand. The cache lives in a [`Cell`] so the query can take
/// `&self`.
#[derive(Debug, Clone)]
pub struct BitsetSuperposition {
    words: Vec<u32>,
    universe_size: usize,
    cached_count: Cell<Option<usize>>,
}

impl BitsetSuperposition {
    fn num_words(universe_size: usize) -> usize {
        universe_size.div_ceil(WORD_BITS).max(1)
    }

    fn word_bit(tile: usize) -> (usize, usize) {
        (tile / WORD_BITS, tile % WORD_BITS)
    }

    fn clear_trailing_bits(&mut self) {
        let total_bits = self.words.len() * WORD_BITS;
        let unused = total_bits - self.universe_size;
        if unused == 0 {
            return;
        }
        let mask = u32::MAX >> unused;
        if let Some(last) = self.words.last_mut() {
            *last &= mask;
        }
    }

    fn recompute_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl PartialEq for BitsetSuperposition {
    fn eq(&self, other: &Self) -> bool {
        self.universe_size == other.universe_size && self.words == other.words
    }
}

impl TileSuperposition for BitsetSuperposition {
    fn full(universe_size: usize) -> Self {
        let mut s = Self {
            words: vec![u32::MAX; Self::num_words(universe_size)],
            universe_size,
            cached_count: Cell::new(None),
        };
        s.clear_trailing_bits();
        s.cached_count.set(Some(universe_size));
        s
    }

    fn empty_like(&self) -> Self {
        Self {
            words: vec![0; self.words.len()],
            universe_size: self.universe_size,
            cached_count: Cell::new(Some(0)),
        }
    }

    fn universe_size(&self) -> usize {
        self.universe_size
    }

    fn set_to_all(&mut self) {
        self.words.fill(u32::MAX);
        self.clear_trailing_bits();
        self.cached_count.set(Some(self.universe_size));
    }

    fn set_to_none(&mut self) {
        self.words.fill(0);
        self.cached_count.set(Some(0));
    }

    fn contains(&self, tile: usize) -> bool {
        let (word, bit) = Self::word_bit(tile);
        self.words[word] & (1 << bit) != 0
    }

    fn add(&mut self, tile: usize) {
        let (word, bit) = Self::word_bit(tile);
        let mask = 1u32 << bit;
        let already_set = self.words[word] & mask != 0;
        self.words[word] |= mask;
        if !already_set {
            if let Some(count) = self.cached_count.get() {
                self.cached_count.set(Some(count + 1));
            }
        }
    }

    fn add_other(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for (word, &other_word) in self.words.iter_mut().zip(other.words.iter()) {
            let before = *word;
            *word |= other_word;
            changed |= before != *word;
        }
        if changed {
            self.cached_count.set(None);
        }
        changed
    }

    fn mask_by(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for (word, &other_word) in self.words.iter_mut().zip(other.words.iter()) {
            let before = *word;
            *word &= other_word;
            changed |= before != *word;
        }
        if changed {
            self.cached_count.set(None);
        }
        changed
    }

    fn tile_count(&self) -> usize {
        if let Some(count) = self.cached_count.get() {
            return count;
        }
        let count = self.recompute_count();
        self.cached_count.set(Some(count));
        count
    }

    fn observe<R: rand_core::RngCore>(&mut self, rng: &mut R) {
        let count = self.tile_count();
        debug_assert!(count >= 1, "observe() called on an empty superposition");
        if count == 1 {
            return;
        }
        let k = rng.gen_range(0..count);
        let tile = self.iter().nth(k).expect("k is within tile_count()");
        self.set_to_none();
        self.add(tile);
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(word_idx, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| word_idx * WORD_BITS + bit)
        })
    }
}
