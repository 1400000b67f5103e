extern crate self as dictrans;

use serde::{Deserialize, Serialize};

#[macro_use]
mod macros;
mod api;
pub mod config;
mod engine;
mod error;
mod terms;
mod translator;

pub use api::{Options, translate, translate_verbose};
pub use config::Config;
pub use engine::codec;
pub use engine::{DictionaryTranslator, Marker, RunMetrics, RunResult, Segment, StageTimings};
pub use error::{Error, Result};
pub use terms::{
    EmojiTerm, FilterList, HashtagTerm, KNOWN_TRANSLATORS, PatternTerm, Term, TermConfig, TermDefinition, TermSet,
    UrlTerm, matches_language,
};
pub use translator::{IdentityTranslator, Translator};

// --- Shared types -----------------------------------------------------------

/// The pipeline stage at which a term is applied.
///
/// ```text
/// Preprocess  -> replaced before the translator runs, result is translated
/// Transform   -> protected by a marker across the translator, restored after
/// Postprocess -> only applied to the translator's output
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Preprocess,
    #[default]
    Transform,
    Postprocess,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocess",
            Stage::Transform => "transform",
            Stage::Postprocess => "postprocess",
        }
    }
}

bitflags::bitflags! {
    /// A set of stages, used to select which markers get materialized.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StageSet: u8 {
        const PREPROCESS  = 1 << 0;
        const TRANSFORM   = 1 << 1;
        const POSTPROCESS = 1 << 2;
    }
}

impl StageSet {
    pub fn has(self, stage: Stage) -> bool {
        self.contains(StageSet::from(stage))
    }
}

impl From<Stage> for StageSet {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Preprocess => StageSet::PREPROCESS,
            Stage::Transform => StageSet::TRANSFORM,
            Stage::Postprocess => StageSet::POSTPROCESS,
        }
    }
}

/// Term-specific data carried from `Term::scan` to `Term::process`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    /// Nothing to carry; the term renders a fixed replacement.
    #[default]
    Unit,
    /// A piece of the scanned text (the whole match or a capture).
    Text(String),
}

/// First occurrence of a term in a piece of text.
///
/// `start`/`end` are byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
    pub payload: Payload,
}

impl Match {
    pub fn new(start: usize, end: usize, payload: Payload) -> Self {
        Match { start, end, payload }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
