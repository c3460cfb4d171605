//! Error surface of the engine boundary.

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A query was issued against an engine with no dictionary words.
    #[error("dictionary is empty: load a unigram lexicon before querying")]
    NotInitialized,

    /// A parameter is outside its valid range, e.g. a per-query edit
    /// distance above the maximum the index was built for.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lexicon line has no tab delimiter between term and count.
    #[error("lexicon line {line:?}: missing tab delimiter")]
    MissingDelimiter { line: String },

    /// A lexicon line's count field does not parse as a signed 64-bit
    /// integer.
    #[error("lexicon line {line:?}: invalid count")]
    InvalidCount {
        line: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
