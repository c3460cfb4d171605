//! Construction of the engine: configuration, capability injection, lexicon
//! ingestion and delete-variant generation.

use ahash::{AHashMap, AHashSet};
use tracing::{debug, debug_span};

use crate::chars;
use crate::distance::{DamerauLevenshteinOsa, EditDistance};
use crate::engine::{DeleteIndex, SymSpell};
use crate::error::{Error, Result};
use crate::hash::{DefaultStringHasher, StringHasher};
use crate::lexicon::{parse_line, Lexicon, WordId};
use crate::stage::SuggestionStage;

const STAGING_CAPACITY: usize = 16_384;

/// Configures and builds an immutable [`SymSpell`] engine.
///
/// ```
/// use symdel::SymSpell;
///
/// let unigrams = ["hello\t10000", "world\t8000"];
/// let engine = SymSpell::builder()
///     .max_dictionary_edit_distance(2)
///     .prefix_length(7)
///     .build(unigrams, std::iter::empty::<&str>())?;
/// assert_eq!(engine.word_count(), 2);
/// # Ok::<(), symdel::Error>(())
/// ```
pub struct SymSpellBuilder<H = DefaultStringHasher, D = DamerauLevenshteinOsa> {
    max_dictionary_edit_distance: i64,
    prefix_length: i64,
    count_threshold: i64,
    hasher: H,
    distance: D,
    prebuilt: Option<DeleteIndex>,
}

impl Default for SymSpellBuilder {
    fn default() -> Self {
        Self {
            max_dictionary_edit_distance: 2,
            prefix_length: 7,
            count_threshold: 1,
            hasher: DefaultStringHasher,
            distance: DamerauLevenshteinOsa,
            prebuilt: None,
        }
    }
}

impl SymSpellBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: StringHasher, D: EditDistance> SymSpellBuilder<H, D> {
    /// Maximum edit distance the delete index is precalculated for.
    pub fn max_dictionary_edit_distance(mut self, value: i64) -> Self {
        self.max_dictionary_edit_distance = value;
        self
    }

    /// Length of the word prefixes from which deletes are generated (5..7).
    pub fn prefix_length(mut self, value: i64) -> Self {
        self.prefix_length = value;
        self
    }

    /// Minimum frequency count for a word to be considered a valid spelling.
    pub fn count_threshold(mut self, value: i64) -> Self {
        self.count_threshold = value;
        self
    }

    /// Swap in a different 64-bit string hash.
    pub fn string_hasher<H2: StringHasher>(self, hasher: H2) -> SymSpellBuilder<H2, D> {
        SymSpellBuilder {
            max_dictionary_edit_distance: self.max_dictionary_edit_distance,
            prefix_length: self.prefix_length,
            count_threshold: self.count_threshold,
            hasher,
            distance: self.distance,
            prebuilt: self.prebuilt,
        }
    }

    /// Swap in a different bounded edit-distance implementation.
    pub fn edit_distance<D2: EditDistance>(self, distance: D2) -> SymSpellBuilder<H, D2> {
        SymSpellBuilder {
            max_dictionary_edit_distance: self.max_dictionary_edit_distance,
            prefix_length: self.prefix_length,
            count_threshold: self.count_threshold,
            hasher: self.hasher,
            distance,
            prebuilt: self.prebuilt,
        }
    }

    /// Supply a previously exported delete index. Ingestion still runs in
    /// full to populate counts, but delete variants are not regenerated for
    /// words the supplied index already covers.
    pub fn delete_index(mut self, index: DeleteIndex) -> Self {
        self.prebuilt = Some(index);
        self
    }

    /// Consume the builder, ingest the tab-delimited unigram and bigram
    /// lines and return the finished engine.
    pub fn build<U, B>(self, unigrams: U, bigrams: B) -> Result<SymSpell<H, D>>
    where
        U: IntoIterator,
        U::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        self.validate()?;
        let span = debug_span!("dictionary_build").entered();

        let mut lexicon = Lexicon::new();
        let mut below_threshold: AHashMap<Box<str>, i64> = AHashMap::new();
        let mut staging = SuggestionStage::with_capacity(STAGING_CAPACITY);
        let covered: Option<AHashSet<&str>> = self.prebuilt.as_ref().map(DeleteIndex::term_set);

        for line in unigrams {
            let (term, count) = parse_line(line.as_ref())?;
            self.create_dictionary_entry(
                term,
                count,
                &mut lexicon,
                &mut below_threshold,
                &mut staging,
                covered.as_ref(),
            );
        }
        for line in bigrams {
            let (term, count) = parse_line(line.as_ref())?;
            lexicon.insert_bigram(term, count);
        }

        drop(covered);
        let SymSpellBuilder {
            max_dictionary_edit_distance,
            prefix_length,
            count_threshold,
            hasher,
            distance,
            prebuilt,
        } = self;

        let mut deletes = match prebuilt {
            Some(index) => remap_delete_index(index, &lexicon),
            None => AHashMap::new(),
        };
        let staged_pairs = staging.pair_count();
        staging.commit_to(&mut deletes);

        debug!(
            words = lexicon.word_count(),
            bigrams = lexicon.bigram_table_len(),
            buckets = deletes.len(),
            staged_pairs,
            "dictionary built"
        );
        drop(span);

        Ok(SymSpell::from_parts(
            max_dictionary_edit_distance,
            prefix_length,
            count_threshold,
            lexicon,
            deletes,
            hasher,
            distance,
        ))
    }

    fn validate(&self) -> Result<()> {
        if self.max_dictionary_edit_distance < 0 {
            return Err(Error::InvalidArgument(
                "max_dictionary_edit_distance must be >= 0".into(),
            ));
        }
        if self.prefix_length < 1 || self.prefix_length < self.max_dictionary_edit_distance {
            return Err(Error::InvalidArgument(
                "prefix_length must be >= 1 and >= max_dictionary_edit_distance".into(),
            ));
        }
        if self.count_threshold < 0 {
            return Err(Error::InvalidArgument("count_threshold must be >= 0".into()));
        }
        Ok(())
    }

    /// Apply one `term`/`count` lexicon pair.
    ///
    /// Duplicate entries accumulate with saturating addition. Entries below
    /// `count_threshold` wait in the staging map and migrate into the
    /// lexicon once their accumulated count reaches the threshold, at which
    /// point their delete variants are generated.
    fn create_dictionary_entry(
        &self,
        term: &str,
        count: i64,
        lexicon: &mut Lexicon,
        below_threshold: &mut AHashMap<Box<str>, i64>,
        staging: &mut SuggestionStage,
        covered: Option<&AHashSet<&str>>,
    ) {
        let mut count = count;
        if count <= 0 {
            if self.count_threshold > 0 {
                return;
            }
            count = 0;
        }

        if self.count_threshold > 1 {
            if let Some(&previous) = below_threshold.get(term) {
                let accumulated = previous.saturating_add(count);
                if accumulated >= self.count_threshold {
                    below_threshold.remove(term);
                    self.add_word(term, accumulated, lexicon, staging, covered);
                } else {
                    below_threshold.insert(Box::from(term), accumulated);
                }
                return;
            }
        }

        if let Some(id) = lexicon.id_of(term) {
            // known word: counts accumulate, deletes are never regenerated
            lexicon.bump(id, count);
            return;
        }
        if count < self.count_threshold {
            below_threshold.insert(Box::from(term), count);
            return;
        }
        self.add_word(term, count, lexicon, staging, covered);
    }

    fn add_word(
        &self,
        term: &str,
        count: i64,
        lexicon: &mut Lexicon,
        staging: &mut SuggestionStage,
        covered: Option<&AHashSet<&str>>,
    ) {
        let char_length = chars::len(term) as i64;
        let id = lexicon.intern(term, count, char_length);
        if covered.is_some_and(|terms| terms.contains(term)) {
            return;
        }
        for delete in self.prefix_deletes(term, char_length) {
            staging.add(self.hasher.hash(&delete), id);
        }
    }

    /// The prefix delete set of `term`: the prefix itself, the empty string
    /// for very short terms, and the closure under single-character
    /// deletions up to `max_dictionary_edit_distance` deep.
    fn prefix_deletes(&self, term: &str, char_length: i64) -> AHashSet<String> {
        let mut deletes = AHashSet::new();
        if char_length <= self.max_dictionary_edit_distance {
            deletes.insert(String::new());
        }
        if char_length > self.prefix_length {
            let prefix = chars::slice(term, 0, self.prefix_length as usize);
            deletes.insert(prefix.clone());
            self.collect_deletes(&prefix, 0, &mut deletes);
        } else {
            deletes.insert(term.to_string());
            self.collect_deletes(term, 0, &mut deletes);
        }
        deletes
    }

    // only deletes are enumerated; transposes, replaces and inserts of the
    // input term are recovered through deletes of the dictionary term
    fn collect_deletes(&self, word: &str, depth: i64, deletes: &mut AHashSet<String>) {
        let depth = depth + 1;
        let word_len = chars::len(word);
        if word_len > 1 && depth <= self.max_dictionary_edit_distance {
            for i in 0..word_len {
                let delete = chars::remove(word, i);
                if deletes.insert(delete.clone()) && depth < self.max_dictionary_edit_distance {
                    self.collect_deletes(&delete, depth, deletes);
                }
            }
        }
    }
}

fn remap_delete_index(index: DeleteIndex, lexicon: &Lexicon) -> AHashMap<u64, Vec<WordId>> {
    let mut deletes = AHashMap::with_capacity(index.buckets.len());
    for (hash, terms) in index.buckets {
        let ids: Vec<WordId> = terms
            .iter()
            .filter_map(|term| lexicon.id_of(term))
            .collect();
        if !ids.is_empty() {
            deletes.insert(hash, ids);
        }
    }
    deletes
}
