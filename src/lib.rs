/*!

Spelling correction and word segmentation based on the symmetric delete
algorithm.

A frequency lexicon of known words (optionally with a bigram lexicon) is
compiled once into a delete-variant index; afterwards the engine serves
ranked correction candidates for single terms within a bounded edit
distance, corrects whole phrases with misspellings, missing or spurious
spaces, and segments unspaced text.

#### Single-word spelling correction

```rust
use symdel::{SymSpell, Verbosity};

let unigrams = [
    "hello\t10000",
    "help\t5000",
    "world\t8000",
];
let engine = SymSpell::builder()
    .max_dictionary_edit_distance(2)
    .prefix_length(7)
    .count_threshold(1)
    .build(unigrams, std::iter::empty::<&str>())?;

let suggestions = engine.lookup("helo", Verbosity::Top)?;
assert_eq!(suggestions[0].term, "hello");
assert_eq!(suggestions[0].distance, 1);
# Ok::<(), symdel::Error>(())
```

#### Compound-aware multi-word correction

```rust
use symdel::SymSpell;

let unigrams = ["hello\t10000", "world\t8000"];
let bigrams = ["hello world\t2500"];
let engine = SymSpell::builder().build(unigrams, bigrams)?;

// corrects both misspelled tokens against the bigram evidence
let suggestions = engine.lookup_compound("helo wrld", 2)?;
assert_eq!(suggestions[0].term, "hello world");
# Ok::<(), symdel::Error>(())
```

#### Word segmentation of unspaced text

```rust
use symdel::SymSpell;

let unigrams = ["the\t23135851162", "quick\t29704891", "fox\t19843327"];
let engine = SymSpell::builder().build(unigrams, std::iter::empty::<&str>())?;

let composition = engine.word_segmentation("thequickfox", 0)?;
assert_eq!(composition.segmented_string, "the quick fox");
# Ok::<(), symdel::Error>(())
```

*/

mod builder;
mod chars;
mod distance;
mod engine;
mod error;
mod hash;
mod lexicon;
mod stage;
mod suggestion;
#[cfg(test)]
mod test;

pub use builder::SymSpellBuilder;
pub use distance::{damerau_levenshtein_osa, DamerauLevenshteinOsa, EditDistance};
pub use engine::{DeleteIndex, SymSpell, Verbosity};
pub use error::{Error, Result};
pub use hash::{DefaultStringHasher, StringHasher};
pub use lexicon::LEXICON_DELIMITER;
pub use suggestion::{Composition, Suggestion};
