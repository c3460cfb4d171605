//! The spelling-correction engine.
//!
//! Symmetric delete spelling correction reduces the complexity of edit
//! candidate generation and dictionary lookup for a given
//! Damerau-Levenshtein distance. Only deletes of dictionary terms are
//! precalculated; transposes, replaces and inserts of the input term are
//! transformed into deletes of the dictionary term, so lookup probes a
//! small neighborhood of the query instead of scanning the dictionary.

use std::cmp::{self, min};

use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

use crate::builder::SymSpellBuilder;
use crate::chars::{char_at, len, remove, slice, suffix, transfer_case};
use crate::distance::{DamerauLevenshteinOsa, EditDistance};
use crate::error::{Error, Result};
use crate::hash::{DefaultStringHasher, StringHasher};
use crate::lexicon::{Lexicon, WordId};
use crate::suggestion::{Composition, Suggestion};

/// Number of all words in the corpus used to generate the frequency
/// lexicon; used to calculate the word occurrence probability p from word
/// counts c: p = c/N. N equals the sum of all counts c in the lexicon only
/// if the lexicon is complete, but not if it is truncated or filtered.
/// Published frequency lexicons depend on this exact value.
const CORPUS_WORD_COUNT: i64 = 1_024_908_267_229;

// estimated count of an unknown word, C = 10 / 10^word-length, after the
// unknown-word probability P = 10 / (N * 10^l) proposed by Peter Norvig in
// Natural Language Corpus Data, page 224, http://norvig.com/ngrams/ch14.pdf
fn estimated_count(term_len: usize) -> i64 {
    (10f64 / 10f64.powi(term_len as i32)) as i64
}

/// Controls the closeness/quantity of returned spelling suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Top suggestion with the highest term frequency of the suggestions of
    /// smallest edit distance found.
    Top,
    /// All suggestions of smallest edit distance found, ordered by term
    /// frequency.
    Closest,
    /// All suggestions within the maximum edit distance, ordered by edit
    /// distance, then by term frequency (slower, no early termination).
    All,
}

/// Exchangeable form of the delete-variant index: 64-bit hash of a delete
/// variant to the dictionary terms it was derived from.
///
/// Exported with [`SymSpell::delete_index`] and accepted by
/// [`SymSpellBuilder::delete_index`] to skip regeneration on later builds.
/// Only valid together with the hasher it was built with.
#[derive(Debug, Clone, Default)]
pub struct DeleteIndex {
    pub(crate) buckets: AHashMap<u64, Vec<Box<str>>>,
}

impl DeleteIndex {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn term_set(&self) -> AHashSet<&str> {
        self.buckets.values().flatten().map(AsRef::as_ref).collect()
    }
}

/// Immutable spelling-correction and word-segmentation engine.
///
/// Built once from a frequency lexicon with [`SymSpell::builder`]; queries
/// are pure reads, so sharing the engine across threads needs no
/// synchronization.
#[derive(Debug)]
pub struct SymSpell<H = DefaultStringHasher, D = DamerauLevenshteinOsa> {
    max_dictionary_edit_distance: i64,
    prefix_length: i64,
    count_threshold: i64,
    lexicon: Lexicon,
    deletes: AHashMap<u64, Vec<WordId>>,
    hasher: H,
    distance: D,
}

impl SymSpell {
    /// Start configuring an engine with the default hasher and edit
    /// distance.
    pub fn builder() -> SymSpellBuilder {
        SymSpellBuilder::new()
    }
}

impl<H: StringHasher, D: EditDistance> SymSpell<H, D> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        max_dictionary_edit_distance: i64,
        prefix_length: i64,
        count_threshold: i64,
        lexicon: Lexicon,
        deletes: AHashMap<u64, Vec<WordId>>,
        hasher: H,
        distance: D,
    ) -> Self {
        Self {
            max_dictionary_edit_distance,
            prefix_length,
            count_threshold,
            lexicon,
            deletes,
            hasher,
            distance,
        }
    }

    /// Number of words in the dictionary.
    pub fn word_count(&self) -> usize {
        self.lexicon.word_count()
    }

    /// Frequency count of `term`, if it is a dictionary word.
    pub fn frequency(&self, term: &str) -> Option<i64> {
        self.lexicon.count_of(term)
    }

    /// Maximum edit distance the delete index was precalculated for.
    pub fn max_dictionary_edit_distance(&self) -> i64 {
        self.max_dictionary_edit_distance
    }

    /// Prefix length the delete index was precalculated with.
    pub fn prefix_length(&self) -> i64 {
        self.prefix_length
    }

    /// Minimum frequency count for a word to count as correctly spelled.
    pub fn count_threshold(&self) -> i64 {
        self.count_threshold
    }

    /// Export the delete index in its exchangeable term-keyed form.
    pub fn delete_index(&self) -> DeleteIndex {
        let buckets = self
            .deletes
            .iter()
            .map(|(&hash, ids)| {
                let terms = ids
                    .iter()
                    .map(|&id| Box::<str>::from(self.lexicon.term(id)))
                    .collect();
                (hash, terms)
            })
            .collect();
        DeleteIndex { buckets }
    }

    /// Find suggested spellings for `input` within the maximum edit
    /// distance the dictionary was built for.
    pub fn lookup(&self, input: &str, verbosity: Verbosity) -> Result<Vec<Suggestion>> {
        self.lookup_with(input, verbosity, self.max_dictionary_edit_distance, false)
    }

    /// Find suggested spellings for `input`.
    ///
    /// `max_edit_distance` bounds this query and must not exceed the
    /// distance the dictionary was built for. With `include_unknown`, an
    /// empty result is replaced by the input itself at distance
    /// `max_edit_distance + 1` and count 0.
    pub fn lookup_with(
        &self,
        input: &str,
        verbosity: Verbosity,
        max_edit_distance: i64,
        include_unknown: bool,
    ) -> Result<Vec<Suggestion>> {
        if max_edit_distance > self.max_dictionary_edit_distance {
            return Err(Error::InvalidArgument(format!(
                "max_edit_distance {max_edit_distance} exceeds the dictionary maximum {}",
                self.max_dictionary_edit_distance
            )));
        }
        if self.lexicon.is_empty() {
            return Err(Error::NotInitialized);
        }

        let mut suggestions: Vec<Suggestion> = Vec::new();
        let input_len = len(input) as i64;

        // early termination: input too long to match any indexed word
        if input_len - max_edit_distance > self.lexicon.max_word_length() {
            return Ok(suggestions);
        }

        if let Some(count) = self.lexicon.count_of(input) {
            suggestions.push(Suggestion::new(input, 0, count));
            // an exact match is final unless the caller wants all matches
            if verbosity != Verbosity::All {
                return Ok(suggestions);
            }
        }
        if max_edit_distance == 0 {
            return Ok(suggestions);
        }

        let mut considered_deletes: AHashSet<String> = AHashSet::new();
        let mut considered_suggestions: AHashSet<WordId> = AHashSet::new();

        // Top and Closest tighten this bound as results come in
        let mut max_edit_distance2 = max_edit_distance;
        let mut candidate_pointer = 0;
        let mut candidates: Vec<String> = Vec::new();

        let mut input_prefix_len = input_len;
        if input_prefix_len > self.prefix_length {
            input_prefix_len = self.prefix_length;
            candidates.push(slice(input, 0, input_prefix_len as usize));
        } else {
            candidates.push(input.to_string());
        }

        while candidate_pointer < candidates.len() {
            let candidate = candidates[candidate_pointer].clone();
            candidate_pointer += 1;
            let candidate_len = len(&candidate) as i64;
            let length_diff = input_prefix_len - candidate_len;

            // candidates are enqueued in non-decreasing deletion depth, so
            // once the depth exceeds the running bound no later candidate
            // can come closer; All still has to visit the rest
            if length_diff > max_edit_distance2 {
                if verbosity == Verbosity::All {
                    continue;
                }
                break;
            }

            if let Some(bucket) = self.deletes.get(&self.hasher.hash(&candidate)) {
                for &suggestion_id in bucket {
                    let term = self.lexicon.term(suggestion_id);
                    if term == input {
                        continue;
                    }
                    let term_len = len(term) as i64;

                    if (term_len - input_len).abs() > max_edit_distance2
                        || term_len < candidate_len
                        || (term_len == candidate_len && term != candidate)
                    {
                        continue;
                    }
                    let term_prefix_len = min(term_len, self.prefix_length);
                    if term_prefix_len > input_prefix_len
                        && term_prefix_len - candidate_len > max_edit_distance2
                    {
                        continue;
                    }

                    // Deletes of bounded depth on both the query and the
                    // dictionary side keep replaces and adjacent transposes
                    // within the bound, but simultaneous inserts/deletes can
                    // push the true distance above it (bank==bnak and
                    // bank==bink, but bank!=kanb and bank!=xban for a bound
                    // of 1), so the distance is verified before recording.
                    let distance;
                    if candidate_len == 0 {
                        // no characters in common with the input
                        distance = cmp::max(input_len, term_len);
                        if distance > max_edit_distance2
                            || !considered_suggestions.insert(suggestion_id)
                        {
                            continue;
                        }
                    } else if term_len == 1 {
                        distance = match char_at(term, 0) {
                            Some(ch) if input.contains(ch) => input_len - 1,
                            _ => input_len,
                        };
                        if distance > max_edit_distance2
                            || !considered_suggestions.insert(suggestion_id)
                        {
                            continue;
                        }
                    } else if self.rejects_by_suffix(
                        max_edit_distance,
                        input,
                        input_len,
                        candidate_len,
                        term,
                        term_len,
                    ) {
                        // the prefix consumed the whole edit budget and the
                        // tails cannot reconcile
                        continue;
                    } else {
                        // only worth the subsequence scan when the bound is
                        // being tightened
                        if verbosity != Verbosity::All
                            && !self.delete_in_suggestion_prefix(&candidate, term)
                        {
                            continue;
                        }
                        if !considered_suggestions.insert(suggestion_id) {
                            continue;
                        }
                        distance = self.distance.distance(input, term, max_edit_distance2);
                        if distance < 0 {
                            continue;
                        }
                    }

                    if distance <= max_edit_distance2 {
                        let suggestion_count = self.lexicon.count(suggestion_id);
                        let item = Suggestion::new(term, distance, suggestion_count);
                        if !suggestions.is_empty() {
                            match verbosity {
                                Verbosity::Closest => {
                                    // a strictly closer hit invalidates
                                    // everything found so far
                                    if distance < max_edit_distance2 {
                                        suggestions.clear();
                                    }
                                }
                                Verbosity::Top => {
                                    if distance < max_edit_distance2
                                        || suggestion_count > suggestions[0].count
                                    {
                                        max_edit_distance2 = distance;
                                        suggestions[0] = item;
                                    }
                                    continue;
                                }
                                Verbosity::All => (),
                            }
                        }
                        if verbosity != Verbosity::All {
                            max_edit_distance2 = distance;
                        }
                        suggestions.push(item);
                    }
                }
            }

            // derive deletes from the candidate and enqueue them; the walk
            // is breadth first and bounded by the maximum edit distance
            if length_diff < max_edit_distance && candidate_len <= self.prefix_length {
                // no point creating edits farther away than what was found
                if verbosity != Verbosity::All && length_diff >= max_edit_distance2 {
                    continue;
                }
                for i in 0..candidate_len as usize {
                    let delete = remove(&candidate, i);
                    if !considered_deletes.contains(&delete) {
                        considered_deletes.insert(delete.clone());
                        candidates.push(delete);
                    }
                }
            }
        }

        // ascending edit distance, then descending word frequency
        if suggestions.len() > 1 {
            suggestions.sort();
        }
        if include_unknown && suggestions.is_empty() {
            suggestions.push(Suggestion::new(input, max_edit_distance + 1, 0));
        }
        Ok(suggestions)
    }

    /// Find a suggested spelling for a multi-word input string.
    ///
    /// Supports compound-aware correction with three cases: a mistakenly
    /// inserted space that split a correct word, a mistakenly omitted space
    /// that fused two correct words, and independent input terms with or
    /// without spelling errors. Returns a single suggestion carrying the
    /// corrected phrase, its edit distance to the input and a composite
    /// frequency.
    pub fn lookup_compound(&self, input: &str, edit_distance_max: i64) -> Result<Vec<Suggestion>> {
        if self.lexicon.is_empty() {
            return Err(Error::NotInitialized);
        }
        let terms: Vec<&str> = input.split(' ').filter(|term| !term.is_empty()).collect();

        let mut suggestion_parts: Vec<Suggestion> = Vec::new();
        let mut last_combination = false;

        for (i, term) in terms.iter().enumerate() {
            let suggestions = self.lookup_with(term, Verbosity::Top, edit_distance_max, false)?;

            // combination check, always before split
            if i > 0
                && !last_combination
                && self.combine_words(
                    edit_distance_max,
                    terms[i - 1],
                    term,
                    &suggestions,
                    &mut suggestion_parts,
                )?
            {
                last_combination = true;
                continue;
            }
            last_combination = false;

            // never split terms with a perfect suggestion or of a single
            // character; always split terms without any suggestion
            if !suggestions.is_empty() && (suggestions[0].distance == 0 || len(term) == 1) {
                suggestion_parts.push(suggestions[0].clone());
            } else {
                self.split_words(edit_distance_max, term, &suggestions, &mut suggestion_parts)?;
            }
        }

        let mut freq = CORPUS_WORD_COUNT as f64;
        for part in &suggestion_parts {
            freq *= part.count as f64 / CORPUS_WORD_COUNT as f64;
        }
        let joined = suggestion_parts
            .iter()
            .map(|part| part.term.as_str())
            .join(" ");
        let distance = self.distance.distance(input, &joined, i64::MAX);
        Ok(vec![Suggestion::new(joined, distance, freq as i64)])
    }

    // Merge decision for a mistakenly inserted space: the previous and the
    // current token looked up as one word, measured against their separate
    // corrections.
    fn combine_words(
        &self,
        edit_distance_max: i64,
        previous: &str,
        current: &str,
        suggestions: &[Suggestion],
        parts: &mut Vec<Suggestion>,
    ) -> Result<bool> {
        let combined_input = [previous, current].concat();
        let combined =
            self.lookup_with(&combined_input, Verbosity::Top, edit_distance_max, false)?;
        let Some(combined_top) = combined.first() else {
            return Ok(false);
        };
        let (best1_distance, best1_count) = match parts.last() {
            Some(part) => (part.distance, part.count),
            None => return Ok(false),
        };
        let best2 = match suggestions.first() {
            Some(suggestion) => suggestion.clone(),
            None => Suggestion::new(current, edit_distance_max + 1, estimated_count(len(current))),
        };

        let separate_distance = best1_distance + best2.distance;
        if combined_top.distance + 1 < separate_distance
            || (combined_top.distance + 1 == separate_distance
                && combined_top.count as f64
                    > best1_count as f64 / CORPUS_WORD_COUNT as f64 * best2.count as f64)
        {
            if let Some(last) = parts.last_mut() {
                *last = combined_top.clone();
            }
            return Ok(true);
        }
        Ok(false)
    }

    // Split decision for a mistakenly omitted space: every split position of
    // the token is looked up pairwise and the best-scoring split wins; the
    // token's own best suggestion is the seed the splits have to beat.
    fn split_words(
        &self,
        edit_distance_max: i64,
        term: &str,
        suggestions: &[Suggestion],
        parts: &mut Vec<Suggestion>,
    ) -> Result<()> {
        let term_len = len(term);
        let mut best: Option<Suggestion> = suggestions.first().cloned();

        if term_len > 1 {
            for j in 1..term_len {
                let part1 = slice(term, 0, j);
                let part2 = slice(term, j, term_len);
                let suggestions1 =
                    self.lookup_with(&part1, Verbosity::Top, edit_distance_max, false)?;
                let Some(top1) = suggestions1.first() else {
                    continue;
                };
                let suggestions2 =
                    self.lookup_with(&part2, Verbosity::Top, edit_distance_max, false)?;
                let Some(top2) = suggestions2.first() else {
                    continue;
                };

                let split_term = [top1.term.as_str(), " ", top2.term.as_str()].concat();
                let mut split_distance = self.distance.distance(term, &split_term, edit_distance_max);
                if split_distance < 0 {
                    split_distance = edit_distance_max + 1;
                }

                if let Some(current) = &best {
                    if split_distance > current.distance {
                        continue;
                    }
                    if split_distance < current.distance {
                        best = None;
                    }
                }

                let count = match self.lexicon.bigram_count(&split_term) {
                    Some(bigram_count) => {
                        if let Some(single) = suggestions.first() {
                            // the split competes against the single-term
                            // correction; outbid it when the parts are or
                            // contain that correction
                            if [top1.term.as_str(), top2.term.as_str()].concat() == term {
                                cmp::max(bigram_count, single.count.saturating_add(2))
                            } else if top1.term == single.term || top2.term == single.term {
                                cmp::max(bigram_count, single.count.saturating_add(1))
                            } else {
                                bigram_count
                            }
                        } else if [top1.term.as_str(), top2.term.as_str()].concat() == term {
                            cmp::max(bigram_count, cmp::max(top1.count, top2.count))
                        } else {
                            bigram_count
                        }
                    }
                    None => {
                        // Naive Bayes: the probability of the combination is
                        // the product of the two word probabilities,
                        // P(AB) = P(A) * P(B), capped by the smallest bigram
                        // count on record
                        cmp::min(
                            self.lexicon.bigram_count_min(),
                            (top1.count as f64 / CORPUS_WORD_COUNT as f64 * top2.count as f64)
                                as i64,
                        )
                    }
                };
                let split = Suggestion::new(split_term, split_distance, count);

                if best
                    .as_ref()
                    .map_or(true, |current| split.count > current.count)
                {
                    best = Some(split);
                }
            }
        }

        match best {
            Some(split) => parts.push(split),
            None => parts.push(Suggestion::new(
                term,
                edit_distance_max + 1,
                estimated_count(term_len),
            )),
        }
        Ok(())
    }

    /// Divide a string into words by inserting missing spaces at the
    /// appropriate positions, correcting spelling mistakes on the way.
    ///
    /// Works on text of any case (the casing is retained in the output) and
    /// considers existing spaces for the optimum segmentation. Each string
    /// of length n has 2^(n-1) possible compositions, but the triangular
    /// composition walk finds the optimum in linear time.
    pub fn word_segmentation(&self, input: &str, max_edit_distance: i64) -> Result<Composition> {
        if self.lexicon.is_empty() {
            return Err(Error::NotInitialized);
        }
        let input_len = len(input);
        if input_len == 0 {
            return Ok(Composition::empty());
        }

        let mut ci: usize = 0;
        let mut compositions: Vec<Composition> = vec![Composition::empty(); input_len];

        // outer loop (column): all possible part start positions
        for j in 0..input_len {
            // inner loop (row): all possible part lengths from the start
            // position; a part can't be longer than the longest known word
            let imax = min(input_len - j, self.lexicon.max_word_length() as usize);
            for i in 1..=imax {
                let mut part = slice(input, j, j + i);

                let mut separator_len = 0i64;
                let mut top_ed: i64 = 0;

                if part.chars().next().map_or(false, char::is_whitespace) {
                    // remove the space for the distance calculation
                    part = remove(&part, 0);
                } else {
                    // the space did not exist and has to be inserted
                    separator_len = 1;
                }

                // removed inner spaces count toward the edit distance
                top_ed += part.len() as i64;
                part = part.replace(' ', "");
                top_ed -= part.len() as i64;

                let results =
                    self.lookup_with(&part.to_lowercase(), Verbosity::Top, max_edit_distance, false)?;
                let top_prob_log = if let Some(top) = results.first() {
                    if top.distance > 0 {
                        // lay the input casing back over the correction
                        part = transfer_case(&part, &top.term);
                        top_ed += top.distance;
                    }
                    // Sum of log probabilities instead of a product of
                    // probabilities: word probabilities are around 10^-10
                    // and the product of many would underflow to zero.
                    (top.count as f64 / CORPUS_WORD_COUNT as f64).log10()
                } else {
                    let part_len = len(&part);
                    // unknown-word default, so a long unknown chunk cannot
                    // win over a properly spaced composition
                    top_ed += part_len as i64;
                    (10.0 / (CORPUS_WORD_COUNT as f64 * 10.0f64.powf(part_len as f64))).log10()
                };

                let di = (i + ci) % input_len;
                if j == 0 {
                    compositions[i - 1] = Composition {
                        segmented_string: part.clone(),
                        distance_sum: top_ed,
                        prob_log_sum: top_prob_log,
                    };
                } else if i as i64 == self.lexicon.max_word_length()
                    // replace if the probability-log sum is better at the
                    // same edit distance (allowing one space of slack), or
                    // the edit distance itself is smaller
                    || (((compositions[ci].distance_sum + top_ed
                        == compositions[di].distance_sum)
                        || (compositions[ci].distance_sum + separator_len + top_ed
                            == compositions[di].distance_sum))
                        && (compositions[di].prob_log_sum
                            < compositions[ci].prob_log_sum + top_prob_log))
                    || (compositions[ci].distance_sum + separator_len + top_ed
                        < compositions[di].distance_sum)
                {
                    // keep punctuation or apostrophe glued to the previous
                    // word
                    if (part.len() == 1
                        && part.chars().next().is_some_and(|ch| ch.is_ascii_punctuation()))
                        || (part.len() == 3 && part.starts_with('’'))
                    {
                        compositions[di] = Composition {
                            segmented_string: [
                                compositions[ci].segmented_string.as_str(),
                                part.as_str(),
                            ]
                            .concat(),
                            distance_sum: compositions[ci].distance_sum + top_ed,
                            prob_log_sum: compositions[ci].prob_log_sum + top_prob_log,
                        };
                    } else {
                        compositions[di] = Composition {
                            segmented_string: [
                                compositions[ci].segmented_string.as_str(),
                                part.as_str(),
                            ]
                            .join(" "),
                            distance_sum: compositions[ci].distance_sum + separator_len + top_ed,
                            prob_log_sum: compositions[ci].prob_log_sum + top_prob_log,
                        };
                    }
                }
            }
            if j != 0 {
                ci += 1;
            }
            if ci == input_len {
                ci = 0;
            }
        }
        Ok(compositions[ci].clone())
    }

    // Check whether all delete characters appear in the suggestion prefix
    // in order; a mismatch means the bucket hit was a hash collision.
    fn delete_in_suggestion_prefix(&self, delete: &str, suggestion: &str) -> bool {
        if delete.is_empty() {
            return true;
        }
        let prefix: Vec<char> = suggestion
            .chars()
            .take(self.prefix_length as usize)
            .collect();
        let mut j = 0;
        for del_char in delete.chars() {
            while j < prefix.len() && del_char != prefix[j] {
                j += 1;
            }
            if j == prefix.len() {
                return false;
            }
        }
        true
    }

    // When the candidate consumed the entire edit budget inside the prefix,
    // the parts beyond the prefix must agree apart from a trailing adjacent
    // transposition; anything else already exceeds the bound and skips the
    // distance calculation.
    fn rejects_by_suffix(
        &self,
        max_edit_distance: i64,
        input: &str,
        input_len: i64,
        candidate_len: i64,
        suggestion: &str,
        suggestion_len: i64,
    ) -> bool {
        if self.prefix_length - max_edit_distance != candidate_len {
            return false;
        }
        let tail = min(input_len, suggestion_len) - self.prefix_length;
        (tail > 1
            && suffix(input, (input_len + 1 - tail) as usize)
                != suffix(suggestion, (suggestion_len + 1 - tail) as usize))
            || (tail > 0
                && char_at(input, input_len - tail) != char_at(suggestion, suggestion_len - tail)
                && (char_at(input, input_len - tail - 1)
                    != char_at(suggestion, suggestion_len - tail)
                    || char_at(input, input_len - tail)
                        != char_at(suggestion, suggestion_len - tail - 1)))
    }
}
