//! Crate-wide error type.
//!
//! Loading errors carry the index of the offending term definition so a
//! store can report them per term. Pipeline errors abort the translate call
//! that produced them; nothing is recovered partially.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    /// A term's input does not compile as a regular expression.
    #[error("term #{index}: invalid pattern `{pattern}`")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("term #{index}: target language `{value}` is not of the form main[-sub]")]
    InvalidTargetLang { index: usize, value: String },

    #[error("term #{index}: unknown translator `{name}` in translator filter")]
    UnknownTranslator { index: usize, name: String },

    /// The external translator failed; no partial result is available.
    #[error("translator `{translator}` failed")]
    Backend {
        translator: String,
        #[source]
        source: BoxError,
    },

    /// A marker token decoded to an index that was never allocated. The
    /// translator dropped, merged or rewrote a protected span.
    #[error("marker `{token}` refers to #{index} but only {count} markers were issued")]
    MarkerOutOfRange { token: String, index: usize, count: usize },

    #[error("marker `{token}` is malformed")]
    MalformedMarker { token: String },

    #[error("target language `{0}` is not supported")]
    UnsupportedLanguage(String),

    #[error("term store line {line}: invalid definition")]
    StoreLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a failure reported by a translator backend.
    pub fn backend(translator: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Backend { translator: translator.into(), source: source.into() }
    }

    /// Index of the term definition this error belongs to, for load errors.
    pub fn term_index(&self) -> Option<usize> {
        match self {
            Error::InvalidPattern { index, .. }
            | Error::InvalidTargetLang { index, .. }
            | Error::UnknownTranslator { index, .. } => Some(*index),
            _ => None,
        }
    }
}
