//! Raw term definitions and the compiled, ordered term set.
//!
//! Definitions come from an external store as JSON objects. Loading turns them
//! into [`PatternTerm`]s, puts the built-in recognizers in front and fixes the
//! scanning order once:
//!
//! ```text
//! [Url, Hashtag, Emoji, store terms by (priority desc, postprocess last, shorter source first)]
//! ```
//!
//! The resulting [`TermSet`] is immutable and is shared between concurrent
//! translate calls.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::BufRead;

use super::config::{FilterList, KNOWN_TRANSLATORS, TermConfig, is_language_tag};
use super::{EmojiTerm, HashtagTerm, PatternTerm, Term, UrlTerm};
use crate::{Error, Result, Stage};

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    value == &T::default()
}

/// A term as stored, before validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TermDefinition {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub input: String,
    pub output: String,
    /// Language code specifying the target language; `None` matches all.
    #[serde(rename = "targetLang", default, skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator: Option<FilterList>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub priority: i32,
    #[serde(rename = "type", default, skip_serializing_if = "is_default")]
    pub stage: Stage,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl TermDefinition {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        TermDefinition {
            id: None,
            input: input.into(),
            output: output.into(),
            target_lang: None,
            translator: None,
            priority: 0,
            stage: Stage::default(),
            comment: String::new(),
        }
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = Some(lang.into());
        self
    }

    pub fn translator(mut self, filter: FilterList) -> Self {
        self.translator = Some(filter);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Read the store's dump format: one JSON object per line.
    ///
    /// Blank lines are skipped; line numbers in errors are 1-based.
    pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<TermDefinition>> {
        let mut defs = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let def = serde_json::from_str(&line).map_err(|source| Error::StoreLine { line: idx + 1, source })?;
            defs.push(def);
        }
        Ok(defs)
    }

    /// Validate and compile into a term. `index` is used in error reports.
    pub fn compile(&self, index: usize) -> Result<PatternTerm> {
        if let Some(lang) = &self.target_lang {
            if !is_language_tag(lang) {
                return Err(Error::InvalidTargetLang { index, value: lang.clone() });
            }
        }
        if let Some(filter) = &self.translator {
            if let Some(name) = filter.list.iter().find(|n| !KNOWN_TRANSLATORS.contains(&n.as_str())) {
                return Err(Error::UnknownTranslator { index, name: name.clone() });
            }
        }

        let config = TermConfig {
            stage: self.stage,
            target_lang: self.target_lang.clone(),
            translator: self.translator.clone(),
            priority: self.priority,
        };
        PatternTerm::new(&self.input, self.output.clone(), config)
            .map_err(|source| Error::InvalidPattern { index, pattern: self.input.clone(), source })
    }
}

/// Scanning order between two terms: `Less` means `a` is tried first.
pub(crate) fn compare_priority(a: &dyn Term, b: &dyn Term) -> Ordering {
    let (ca, cb) = (a.config(), b.config());
    cb.priority
        .cmp(&ca.priority)
        .then_with(|| (ca.stage == Stage::Postprocess).cmp(&(cb.stage == Stage::Postprocess)))
        .then_with(|| a.source().chars().count().cmp(&b.source().chars().count()))
}

/// The ordered list of active terms.
#[derive(Debug)]
pub struct TermSet {
    terms: Vec<Box<dyn Term>>,
    builtin: usize,
}

impl TermSet {
    /// Only the built-in recognizers.
    pub fn builtin() -> Self {
        let terms: Vec<Box<dyn Term>> = vec![Box::new(UrlTerm), Box::new(HashtagTerm), Box::new(EmojiTerm)];
        let builtin = terms.len();
        TermSet { terms, builtin }
    }

    /// Compile every definition; the first invalid one aborts the load.
    pub fn load<I>(defs: I) -> Result<Self>
    where
        I: IntoIterator<Item = TermDefinition>,
    {
        let compiled = defs.into_iter().enumerate().map(|(i, def)| def.compile(i)).collect::<Result<Vec<_>>>()?;
        Ok(Self::from_terms(compiled))
    }

    /// Compile what can be compiled, and report the rest per term.
    pub fn load_lenient<I>(defs: I) -> (Self, Vec<Error>)
    where
        I: IntoIterator<Item = TermDefinition>,
    {
        let mut compiled = Vec::new();
        let mut errors = Vec::new();
        for (i, def) in defs.into_iter().enumerate() {
            match def.compile(i) {
                Ok(term) => compiled.push(term),
                Err(err) => {
                    tracing::warn!(index = i, input = %def.input, error = %err, "skipping term definition");
                    errors.push(err);
                }
            }
        }
        (Self::from_terms(compiled), errors)
    }

    /// Built-ins followed by `terms` in scanning order.
    pub fn from_terms<T: Term + 'static>(terms: Vec<T>) -> Self {
        let mut user: Vec<Box<dyn Term>> = terms.into_iter().map(|t| Box::new(t) as Box<dyn Term>).collect();
        // Stable: fully tied terms keep store order.
        user.sort_by(|a, b| compare_priority(&**a, &**b));

        let mut set = Self::builtin();
        set.terms.extend(user);
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Term> {
        self.terms.iter().map(|t| &**t)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of built-in terms at the front of the set.
    pub fn builtin_len(&self) -> usize {
        self.builtin
    }

    /// The store-defined terms, in scanning order.
    pub fn user_terms(&self) -> impl Iterator<Item = &dyn Term> {
        self.terms[self.builtin..].iter().map(|t| &**t)
    }
}

impl Default for TermSet {
    fn default() -> Self {
        Self::builtin()
    }
}
