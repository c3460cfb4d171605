use crate::distance::damerau_levenshtein_osa;
use crate::hash::StringHasher;
use crate::{DefaultStringHasher, Error, SymSpell, Verbosity};

fn standard_engine() -> SymSpell {
    SymSpell::builder()
        .max_dictionary_edit_distance(2)
        .prefix_length(7)
        .count_threshold(1)
        .build(
            ["hello\t10000", "help\t5000", "world\t8000"],
            std::iter::empty::<&str>(),
        )
        .unwrap()
}

fn no_bigrams() -> std::iter::Empty<&'static str> {
    std::iter::empty()
}

#[test]
fn exact_match_leads_all_results() {
    let engine = standard_engine();
    let results = engine.lookup("hello", Verbosity::All).unwrap();
    assert_eq!(results[0].term, "hello");
    assert_eq!(results[0].distance, 0);
    assert_eq!(results[0].count, 10000);
    assert!(results
        .iter()
        .any(|s| s.term == "help" && s.distance == 2 && s.count == 5000));
}

#[test]
fn top_returns_single_best_suggestion() {
    let engine = standard_engine();
    let results = engine.lookup("helo", Verbosity::Top).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].term, "hello");
    assert_eq!(results[0].distance, 1);
    assert_eq!(results[0].count, 10000);
}

#[test]
fn closest_returns_exactly_the_minimum_distance_set() {
    let engine = standard_engine();
    let results = engine.lookup("helo", Verbosity::Closest).unwrap();
    // both "hello" and "help" are one edit away; nothing else is kept
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|s| s.distance == 1));
    assert_eq!(results[0].term, "hello");
    assert_eq!(results[1].term, "help");
}

#[test]
fn verbosity_results_are_subsets_of_all() {
    let engine = standard_engine();
    let all = engine.lookup("helo", Verbosity::All).unwrap();
    for verbosity in [Verbosity::Top, Verbosity::Closest] {
        for suggestion in engine.lookup("helo", verbosity).unwrap() {
            assert!(all
                .iter()
                .any(|s| s.term == suggestion.term && s.distance == suggestion.distance));
        }
    }
}

#[test]
fn all_results_sort_by_distance_then_count() {
    let engine = SymSpell::builder()
        .build(["tip\t100", "top\t900", "tap\t500"], no_bigrams())
        .unwrap();

    let results = engine.lookup("tup", Verbosity::All).unwrap();
    let terms: Vec<&str> = results.iter().map(|s| s.term.as_str()).collect();
    assert_eq!(terms, ["top", "tap", "tip"]);
    assert!(results.iter().all(|s| s.distance == 1));

    let results = engine.lookup("tip", Verbosity::All).unwrap();
    let terms: Vec<&str> = results.iter().map(|s| s.term.as_str()).collect();
    assert_eq!(terms, ["tip", "top", "tap"]);
}

#[test]
fn unknown_word_yields_empty_or_placeholder() {
    let engine = standard_engine();
    let results = engine.lookup("xyzzy", Verbosity::All).unwrap();
    assert!(results.is_empty());

    let results = engine
        .lookup_with("xyzzy", Verbosity::All, 2, true)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].term, "xyzzy");
    assert_eq!(results[0].distance, 3);
    assert_eq!(results[0].count, 0);
}

#[test]
fn zero_distance_lookup_only_finds_exact_matches() {
    let engine = standard_engine();
    let results = engine
        .lookup_with("hello", Verbosity::Top, 0, false)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].distance, 0);

    let results = engine.lookup_with("helo", Verbosity::Top, 0, false).unwrap();
    assert!(results.is_empty());
}

#[test]
fn oversized_query_distance_is_rejected() {
    let engine = standard_engine();
    let err = engine
        .lookup_with("helo", Verbosity::Top, 3, false)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = engine.lookup_compound("helo", 3).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn queries_against_an_empty_lexicon_fail() {
    let engine = SymSpell::builder()
        .build(no_bigrams(), no_bigrams())
        .unwrap();
    assert!(matches!(
        engine.lookup("helo", Verbosity::Top),
        Err(Error::NotInitialized)
    ));
    assert!(matches!(
        engine.lookup_compound("helo", 1),
        Err(Error::NotInitialized)
    ));
    assert!(matches!(
        engine.word_segmentation("helo", 1),
        Err(Error::NotInitialized)
    ));
}

#[test]
fn malformed_lexicon_lines_are_reported() {
    let err = SymSpell::builder()
        .build(["hello 10000"], no_bigrams())
        .unwrap_err();
    assert!(matches!(err, Error::MissingDelimiter { .. }));

    let err = SymSpell::builder()
        .build(["hello\tlots"], no_bigrams())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCount { .. }));

    let err = SymSpell::builder()
        .build(["hello\t1"], ["hello world"])
        .unwrap_err();
    assert!(matches!(err, Error::MissingDelimiter { .. }));
}

#[test]
fn duplicate_entries_accumulate_with_saturation() {
    let engine = SymSpell::builder()
        .build(
            ["hello\t9223372036854775800", "hello\t100"],
            no_bigrams(),
        )
        .unwrap();
    assert_eq!(engine.frequency("hello"), Some(i64::MAX));

    let engine = SymSpell::builder()
        .build(["hello\t60", "hello\t40"], no_bigrams())
        .unwrap();
    assert_eq!(engine.frequency("hello"), Some(100));
}

#[test]
fn below_threshold_words_migrate_once_accumulated() {
    let engine = SymSpell::builder()
        .count_threshold(3)
        .build(["scarce\t2", "rare\t1", "scarce\t2"], no_bigrams())
        .unwrap();

    // two sightings pushed "scarce" over the threshold, "rare" stays staged
    assert_eq!(engine.word_count(), 1);
    assert_eq!(engine.frequency("scarce"), Some(4));
    assert_eq!(engine.frequency("rare"), None);

    // a migrated word fully participates in fuzzy lookup
    let results = engine.lookup("scarse", Verbosity::Top).unwrap();
    assert_eq!(results[0].term, "scarce");
    assert_eq!(results[0].distance, 1);
    assert!(engine.lookup("rare", Verbosity::Top).unwrap().is_empty());
}

#[test]
fn nonpositive_counts_are_kept_only_without_threshold() {
    let engine = SymSpell::builder()
        .count_threshold(0)
        .build(["zero\t0", "neg\t-3"], no_bigrams())
        .unwrap();
    assert_eq!(engine.frequency("zero"), Some(0));
    assert_eq!(engine.frequency("neg"), Some(0));

    let engine = SymSpell::builder()
        .count_threshold(1)
        .build(["zero\t0", "real\t5"], no_bigrams())
        .unwrap();
    assert_eq!(engine.frequency("zero"), None);
    assert_eq!(engine.frequency("real"), Some(5));
}

#[test]
fn delete_index_covers_every_prefix_delete() {
    let engine = standard_engine();
    let index = engine.delete_index();
    let hasher = DefaultStringHasher;

    // the full prefix delete set of "help" up to two deletions deep
    let variants = [
        "help", "elp", "hlp", "hep", "hel", "lp", "ep", "el", "hp", "hl", "he",
    ];
    for variant in variants {
        let bucket = index
            .buckets
            .get(&hasher.hash(variant))
            .unwrap_or_else(|| panic!("missing bucket for delete variant {variant:?}"));
        assert!(
            bucket.iter().any(|term| term.as_ref() == "help"),
            "bucket for {variant:?} does not reference the source word"
        );
    }
}

#[test]
fn prebuilt_delete_index_round_trips() {
    let lines = ["hello\t10000", "help\t5000", "world\t8000"];
    let first = SymSpell::builder().build(lines, no_bigrams()).unwrap();
    let index = first.delete_index();
    let bucket_count = index.bucket_count();

    let second = SymSpell::builder()
        .delete_index(index)
        .build(lines, no_bigrams())
        .unwrap();

    assert_eq!(second.word_count(), first.word_count());
    assert_eq!(second.delete_index().bucket_count(), bucket_count);
    for verbosity in [Verbosity::Top, Verbosity::Closest, Verbosity::All] {
        let a = first.lookup("helo", verbosity).unwrap();
        let b = second.lookup("helo", verbosity).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.term, y.term);
            assert_eq!(x.distance, y.distance);
            assert_eq!(x.count, y.count);
        }
    }
}

#[test]
fn prebuilt_index_still_indexes_uncovered_words() {
    let partial = SymSpell::builder()
        .build(["hello\t10000"], no_bigrams())
        .unwrap()
        .delete_index();

    let engine = SymSpell::builder()
        .delete_index(partial)
        .build(["hello\t10000", "world\t8000"], no_bigrams())
        .unwrap();

    let results = engine.lookup("helo", Verbosity::Top).unwrap();
    assert_eq!(results[0].term, "hello");
    // "world" was not covered by the supplied index, so its deletes were
    // generated during the build
    let results = engine.lookup("wrld", Verbosity::Top).unwrap();
    assert_eq!(results[0].term, "world");
}

#[test]
fn lookup_agrees_with_brute_force_on_long_words() {
    let words: [(&str, i64); 5] = [
        ("restaurant", 500),
        ("restaurants", 300),
        ("restoration", 200),
        ("restrained", 150),
        ("reassurance", 100),
    ];
    let lines: Vec<String> = words
        .iter()
        .map(|(term, count)| format!("{term}\t{count}"))
        .collect();
    let engine = SymSpell::builder().build(&lines, no_bigrams()).unwrap();

    let queries = [
        "restaurnat",
        "restoratoin",
        "restrianed",
        "restauran",
        "eassurance",
        "restauratn",
    ];
    for query in queries {
        let mut expected: Vec<(&str, i64)> = words
            .iter()
            .filter_map(|(term, _)| {
                let distance = damerau_levenshtein_osa(query, term, 2);
                (distance >= 0).then_some((*term, distance))
            })
            .collect();
        expected.sort();

        let results = engine.lookup(query, Verbosity::All).unwrap();
        let mut got: Vec<(&str, i64)> = results
            .iter()
            .map(|s| (s.term.as_str(), s.distance))
            .collect();
        got.sort();

        assert_eq!(got, expected, "divergence for query {query:?}");
    }
}

#[test]
fn compound_joins_fused_words() {
    let engine = SymSpell::builder()
        .build(
            ["hello\t10000", "help\t5000", "world\t8000"],
            ["hello world\t2500"],
        )
        .unwrap();

    let results = engine.lookup_compound("helloworld", 2).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].term, "hello world");
    assert_eq!(results[0].distance, 1);
}

#[test]
fn compound_corrects_misspelled_phrase() {
    let engine = SymSpell::builder()
        .build(
            ["hello\t10000", "help\t5000", "world\t8000"],
            ["hello world\t2500"],
        )
        .unwrap();

    let results = engine.lookup_compound("helo wrld", 2).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].term, "hello world");
    assert_eq!(
        results[0].distance,
        damerau_levenshtein_osa("helo wrld", "hello world", i64::MAX)
    );
    assert_eq!(results[0].distance, 2);
}

#[test]
fn compound_merges_mistakenly_split_word() {
    let engine = standard_engine();
    let results = engine.lookup_compound("hel lo", 2).unwrap();
    assert_eq!(results[0].term, "hello");
    assert_eq!(results[0].distance, 1);
}

#[test]
fn compound_keeps_unknown_token_as_placeholder() {
    let engine = standard_engine();
    let results = engine.lookup_compound("xyzzy", 2).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].term, "xyzzy");
    assert_eq!(results[0].count, 0);
    assert_eq!(results[0].distance, 0);
}

#[test]
fn compound_output_has_no_empty_tokens() {
    let engine = standard_engine();
    let results = engine.lookup_compound("  helo   wrld ", 2).unwrap();
    let term = &results[0].term;
    assert_eq!(term.trim(), term);
    assert!(term.split(' ').all(|token| !token.is_empty()));
}

#[test]
fn compound_split_keeps_bigram_count_for_corrected_parts() {
    let engine = SymSpell::builder()
        .build(
            ["quick\t1000", "brown\t800"],
            ["quick brown\t5"],
        )
        .unwrap();

    // parts concatenate back to the token: the bigram count is raised to
    // the larger part count
    let results = engine.lookup_compound("quickbrown", 2).unwrap();
    assert_eq!(results[0].term, "quick brown");
    assert!(results[0].count > 100);

    // a corrected part breaks the concatenation: the stored bigram count
    // stands
    let results = engine.lookup_compound("quickbrvwn", 2).unwrap();
    assert_eq!(results[0].term, "quick brown");
    assert!(results[0].count <= 5);
}

#[test]
fn segmentation_recovers_spaces() {
    let engine = SymSpell::builder()
        .build(
            [
                "the\t23135851162",
                "quick\t29704891",
                "brown\t11044976",
                "fox\t19843327",
            ],
            no_bigrams(),
        )
        .unwrap();

    let composition = engine.word_segmentation("thequickbrownfox", 0).unwrap();
    assert_eq!(composition.segmented_string, "the quick brown fox");
    assert_eq!(composition.distance_sum, 3);

    // casing of the input is retained
    let composition = engine.word_segmentation("THEQUICKBROWNFOX", 0).unwrap();
    assert_eq!(composition.segmented_string, "THE QUICK BROWN FOX");
}

#[test]
fn segmentation_corrects_while_segmenting() {
    let engine = SymSpell::builder()
        .build(
            [
                "the\t23135851162",
                "quick\t29704891",
                "brown\t11044976",
                "fox\t19843327",
            ],
            no_bigrams(),
        )
        .unwrap();

    let composition = engine.word_segmentation("thequickbrpwnfox", 1).unwrap();
    assert_eq!(composition.segmented_string, "the quick brown fox");
    assert_eq!(composition.distance_sum, 4);
}

#[test]
fn segmentation_of_empty_input_is_empty() {
    let engine = standard_engine();
    let composition = engine.word_segmentation("", 1).unwrap();
    assert_eq!(composition.segmented_string, "");
    assert_eq!(composition.distance_sum, 0);
}

#[test]
fn engine_exposes_dictionary_statistics() {
    let engine = standard_engine();
    assert_eq!(engine.word_count(), 3);
    assert_eq!(engine.frequency("world"), Some(8000));
    assert_eq!(engine.frequency("wrld"), None);
    assert_eq!(engine.max_dictionary_edit_distance(), 2);
    assert_eq!(engine.prefix_length(), 7);
    assert_eq!(engine.count_threshold(), 1);
}
