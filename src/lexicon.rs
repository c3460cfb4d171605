//! Frequency lexicon: interned unigram table plus the bigram map.
//!
//! Every dictionary word is stored once and addressed by a `u32` id; the
//! delete index references ids, never owned strings.

use ahash::AHashMap;

use crate::error::{Error, Result};

/// Delimiter between the term and count fields of a lexicon line.
pub const LEXICON_DELIMITER: char = '\t';

/// Split a `term<TAB>count` lexicon line. Fields after the second are
/// ignored; the bigram form carries its two space-separated words inside the
/// term field.
pub(crate) fn parse_line(line: &str) -> Result<(&str, i64)> {
    let mut fields = line.split(LEXICON_DELIMITER);
    let term = fields.next().unwrap_or_default();
    let count = fields.next().ok_or_else(|| Error::MissingDelimiter {
        line: line.to_string(),
    })?;
    let count = count.parse::<i64>().map_err(|source| Error::InvalidCount {
        line: line.to_string(),
        source,
    })?;
    Ok((term, count))
}

pub(crate) type WordId = u32;

/// Unigram and bigram frequency tables.
#[derive(Debug, Default, Clone)]
pub(crate) struct Lexicon {
    terms: Vec<Box<str>>,
    counts: Vec<i64>,
    ids: AHashMap<Box<str>, WordId>,
    bigrams: AHashMap<Box<str>, i64>,
    bigram_count_min: Option<i64>,
    max_word_length: i64,
}

impl Lexicon {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub(crate) fn word_count(&self) -> usize {
        self.terms.len()
    }

    pub(crate) fn max_word_length(&self) -> i64 {
        self.max_word_length
    }

    pub(crate) fn id_of(&self, term: &str) -> Option<WordId> {
        self.ids.get(term).copied()
    }

    pub(crate) fn term(&self, id: WordId) -> &str {
        &self.terms[id as usize]
    }

    pub(crate) fn count(&self, id: WordId) -> i64 {
        self.counts[id as usize]
    }

    pub(crate) fn count_of(&self, term: &str) -> Option<i64> {
        self.id_of(term).map(|id| self.count(id))
    }

    /// Add a word to the table. The caller guarantees the word is not
    /// present yet; `char_length` is the word's length in characters.
    pub(crate) fn intern(&mut self, term: &str, count: i64, char_length: i64) -> WordId {
        debug_assert!(!self.ids.contains_key(term));
        let id = self.terms.len() as WordId;
        self.terms.push(Box::from(term));
        self.counts.push(count);
        self.ids.insert(Box::from(term), id);
        if char_length > self.max_word_length {
            self.max_word_length = char_length;
        }
        id
    }

    /// Saturating count increment for an already-known word.
    pub(crate) fn bump(&mut self, id: WordId, add: i64) {
        let count = &mut self.counts[id as usize];
        *count = count.saturating_add(add);
    }

    pub(crate) fn insert_bigram(&mut self, key: &str, count: i64) {
        self.bigrams.insert(Box::from(key), count);
        if self.bigram_count_min.map_or(true, |m| count < m) {
            self.bigram_count_min = Some(count);
        }
    }

    pub(crate) fn bigram_count(&self, key: &str) -> Option<i64> {
        self.bigrams.get(key).copied()
    }

    /// Minimum observed bigram count, used as a smoothing ceiling when a
    /// bigram is absent.
    pub(crate) fn bigram_count_min(&self) -> i64 {
        self.bigram_count_min.unwrap_or(i64::MAX)
    }

    pub(crate) fn bigram_table_len(&self) -> usize {
        self.bigrams.len()
    }
}
