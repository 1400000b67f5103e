use async_trait::async_trait;
use regex::Regex;

use super::{Term, TermConfig};
use crate::engine::DictionaryTranslator;
use crate::{Match, Payload, Result};

/// A user-defined term: every match of `input` is replaced with `output`.
#[derive(Debug, Clone)]
pub struct PatternTerm {
    input: Regex,
    output: String,
    config: TermConfig,
}

impl PatternTerm {
    /// Compile `input`; an invalid pattern never produces a term.
    pub fn new(input: &str, output: impl Into<String>, config: TermConfig) -> std::result::Result<Self, regex::Error> {
        Ok(PatternTerm { input: Regex::new(input)?, output: output.into(), config })
    }
}

#[async_trait]
impl Term for PatternTerm {
    fn config(&self) -> &TermConfig {
        &self.config
    }

    fn source(&self) -> &str {
        self.input.as_str()
    }

    fn scan(&self, _ctx: &DictionaryTranslator<'_>, text: &str, start: usize) -> Option<Match> {
        // Empty matches never consume anything; step past them.
        let mut at = start;
        while at <= text.len() {
            let m = self.input.find_at(text, at)?;
            if !m.is_empty() {
                return Some(Match::new(m.start(), m.end(), Payload::Unit));
            }
            at = m.end() + text[m.end()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }

    async fn process(&self, _ctx: &DictionaryTranslator<'_>, _payload: Payload) -> Result<String> {
        Ok(self.output.clone())
    }
}
