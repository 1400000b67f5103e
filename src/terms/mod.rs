//! Dictionary terms.
//!
//! A term is one unit of dictionary behaviour: it knows how to find itself in
//! a piece of text (`scan`) and how to render the replacement for what it
//! found (`process`). The engine decides *when* each of those runs, based on
//! the term's [`Stage`](crate::Stage).
//!
//! ```text
//! TermDefinition (store) ──compile──▶ PatternTerm ─┐
//!                                                  ├─▶ TermSet (sorted, shared)
//! UrlTerm / HashtagTerm / EmojiTerm (built-in) ────┘
//! ```
//!
//! - `config.rs`: stage, language and translator filters.
//! - `pattern.rs`: user-defined regex → literal replacement.
//! - `builtin.rs`: URL, hashtag and emoji recognizers.
//! - `store.rs`: raw definitions, validation and the priority ordering.

mod builtin;
mod config;
mod pattern;
mod store;


use async_trait::async_trait;
use std::fmt;

use crate::engine::DictionaryTranslator;
use crate::{Match, Payload, Result};

pub use builtin::{EmojiTerm, HashtagTerm, UrlTerm};
pub use config::{FilterList, KNOWN_TRANSLATORS, TermConfig, matches_language};
pub use pattern::PatternTerm;
pub use store::{TermDefinition, TermSet};

#[async_trait]
pub trait Term: Send + Sync + fmt::Debug {
    fn config(&self) -> &TermConfig;

    /// Pattern text; shorter sources are tried first among equal priorities.
    fn source(&self) -> &str;

    /// Whether the term is active for the current target language and translator.
    fn should_apply(&self, ctx: &DictionaryTranslator<'_>) -> bool {
        self.config().applies_to(ctx.target_lang(), ctx.translator().name())
    }

    /// Find the first occurrence of the term in `text[start..]`.
    ///
    /// `text[..start]` is already claimed and only serves as context for
    /// anchors and boundaries; offsets in the returned match are relative to
    /// `text`. The matched range is cut out and replaced by a marker that
    /// carries the returned payload.
    fn scan(&self, ctx: &DictionaryTranslator<'_>, text: &str, start: usize) -> Option<Match>;

    /// Render the replacement for a previously scanned occurrence.
    async fn process(&self, ctx: &DictionaryTranslator<'_>, payload: Payload) -> Result<String>;
}
