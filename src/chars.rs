//! Char-indexed string helpers. The engine counts edits in characters, not
//! bytes, so every positional operation goes through these instead of direct
//! slicing.

/// Number of characters in `s`.
pub(crate) fn len(s: &str) -> usize {
    s.chars().count()
}

/// `s` with the character at `index` removed.
pub(crate) fn remove(s: &str, index: usize) -> String {
    s.chars()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, ch)| ch)
        .collect()
}

/// Characters of `s` in `[start, end)`.
pub(crate) fn slice(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end - start).collect()
}

/// Characters of `s` from `start` to the end.
pub(crate) fn suffix(s: &str, start: usize) -> String {
    s.chars().skip(start).collect()
}

/// Character at position `i`, or `None` when out of range.
pub(crate) fn char_at(s: &str, i: i64) -> Option<char> {
    if i < 0 {
        return None;
    }
    s.chars().nth(i as usize)
}

/// Transfer the letter case char-wise from `source` onto `target`.
///
/// Dictionary terms are stored lowercase; after a correction the original
/// casing of the query is laid back over the corrected term. Characters of
/// `target` beyond the end of `source` are appended unchanged.
pub(crate) fn transfer_case(source: &str, target: &str) -> String {
    use itertools::EitherOrBoth;
    use itertools::Itertools;

    let mut result = String::with_capacity(target.len());
    for pair in source.chars().zip_longest(target.chars()) {
        match pair {
            EitherOrBoth::Both(s, t) => {
                if s.is_uppercase() {
                    result.extend(t.to_uppercase());
                } else {
                    // dictionary terms are already lowercase
                    result.push(t);
                }
            }
            EitherOrBoth::Left(_) => (),
            EitherOrBoth::Right(t) => result.push(t),
        }
    }
    result
}
