//! Build-time accumulator for (delete-hash, word) pairs.
//!
//! Delete generation produces many pairs per word; staging groups them by
//! hash first and commits them into the permanent index in one pass, so the
//! index buckets are built with a single growth phase per bucket.

use std::collections::hash_map::Entry;

use ahash::AHashMap;

use crate::lexicon::WordId;

pub(crate) struct SuggestionStage {
    buckets: AHashMap<u64, Vec<WordId>>,
    pairs: usize,
}

impl SuggestionStage {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: AHashMap::with_capacity(capacity),
            pairs: 0,
        }
    }

    pub(crate) fn add(&mut self, delete_hash: u64, word: WordId) {
        self.buckets.entry(delete_hash).or_default().push(word);
        self.pairs += 1;
    }

    pub(crate) fn pair_count(&self) -> usize {
        self.pairs
    }

    /// Append every staged word to its bucket in `deletes`, creating buckets
    /// that do not exist yet.
    pub(crate) fn commit_to(self, deletes: &mut AHashMap<u64, Vec<WordId>>) {
        for (hash, mut staged) in self.buckets {
            match deletes.entry(hash) {
                Entry::Occupied(mut bucket) => bucket.get_mut().append(&mut staged),
                Entry::Vacant(slot) => {
                    slot.insert(staged);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_appends_to_existing_buckets() {
        let mut stage = SuggestionStage::with_capacity(4);
        stage.add(1, 10);
        stage.add(1, 11);
        stage.add(2, 12);
        assert_eq!(stage.pair_count(), 3);

        let mut deletes = AHashMap::new();
        deletes.insert(1u64, vec![9u32]);
        stage.commit_to(&mut deletes);

        assert_eq!(deletes[&1], vec![9, 10, 11]);
        assert_eq!(deletes[&2], vec![12]);
    }
}
