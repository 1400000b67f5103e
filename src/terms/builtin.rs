//! Store-independent terms, always tried before any user-defined term.

use async_trait::async_trait;

use super::{Term, TermConfig};
use crate::engine::DictionaryTranslator;
use crate::translator::{IdentityTranslator, Translator};
use crate::{Match, Payload, Result, Stage};

static BUILTIN_CONFIG: TermConfig = TermConfig { stage: Stage::Transform, target_lang: None, translator: None, priority: 0 };

fn payload_text(payload: Payload) -> String {
    match payload {
        Payload::Text(text) => text,
        Payload::Unit => String::new(),
    }
}

/// Keeps URLs away from the translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTerm;

impl UrlTerm {
    fn regex() -> &'static regex::Regex {
        regex!(r"(?i)https?://[-A-Za-z0-9+&@#/%?=~_|!:,.;]*[-A-Za-z0-9+&@#/%=~_|]")
    }
}

#[async_trait]
impl Term for UrlTerm {
    fn config(&self) -> &TermConfig {
        &BUILTIN_CONFIG
    }

    fn source(&self) -> &str {
        Self::regex().as_str()
    }

    fn scan(&self, _ctx: &DictionaryTranslator<'_>, text: &str, start: usize) -> Option<Match> {
        Self::regex().find_at(text, start).map(|m| Match::new(m.start(), m.end(), Payload::Text(m.as_str().to_owned())))
    }

    async fn process(&self, _ctx: &DictionaryTranslator<'_>, payload: Payload) -> Result<String> {
        Ok(payload_text(payload))
    }
}

/// Keeps hashtags away from the translator.
///
/// The body still goes through the dictionary: it is re-run through the
/// whole pipeline with a pass-through translator, so known terms inside a
/// hashtag are replaced while everything else stays as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashtagTerm;

impl HashtagTerm {
    fn regex() -> &'static regex::Regex {
        // Group 1 is the hashtag, group 2 its body. The leading group stops
        // matches glued to a preceding word (`issue#12`, `&#39;`, `#a#b`).
        // `^` only holds at the start of a text segment.
        regex!(r"(?:^|[^\w&/])(#(\w+))")
    }
}

#[async_trait]
impl Term for HashtagTerm {
    fn config(&self) -> &TermConfig {
        &BUILTIN_CONFIG
    }

    fn source(&self) -> &str {
        Self::regex().as_str()
    }

    fn scan(&self, _ctx: &DictionaryTranslator<'_>, text: &str, start: usize) -> Option<Match> {
        let caps = Self::regex().captures_at(text, start)?;
        let tag = caps.get(1)?;
        let body = caps.get(2)?;
        Some(Match::new(tag.start(), tag.end(), Payload::Text(body.as_str().to_owned())))
    }

    async fn process(&self, ctx: &DictionaryTranslator<'_>, payload: Payload) -> Result<String> {
        let body = payload_text(payload);
        // Substituted for this call only; the caller's translator is untouched.
        let identity = IdentityTranslator::named(ctx.translator().name());
        let nested = DictionaryTranslator::new(ctx.target_lang(), &identity, ctx.terms());
        let translated = Translator::translate(&nested, &body).await?;
        Ok(format!("#{translated}"))
    }
}

/// Keeps emoji (including joined and modified sequences and flags) away from
/// the translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiTerm;

impl EmojiTerm {
    fn regex() -> &'static regex::Regex {
        regex!(
            r"[\x{1F1E6}-\x{1F1FF}]{2}|\p{Extended_Pictographic}[\x{FE0F}\x{1F3FB}-\x{1F3FF}]*(?:\x{200D}\p{Extended_Pictographic}[\x{FE0F}\x{1F3FB}-\x{1F3FF}]*)*"
        )
    }
}

#[async_trait]
impl Term for EmojiTerm {
    fn config(&self) -> &TermConfig {
        &BUILTIN_CONFIG
    }

    fn source(&self) -> &str {
        Self::regex().as_str()
    }

    fn scan(&self, _ctx: &DictionaryTranslator<'_>, text: &str, start: usize) -> Option<Match> {
        Self::regex().find_at(text, start).map(|m| Match::new(m.start(), m.end(), Payload::Text(m.as_str().to_owned())))
    }

    async fn process(&self, _ctx: &DictionaryTranslator<'_>, payload: Payload) -> Result<String> {
        Ok(payload_text(payload))
    }
}
