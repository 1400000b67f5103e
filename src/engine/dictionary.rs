//! The dictionary translator: scanning, materialization and the pipeline.
//!
//! ## Scanning order
//!
//! `transform` is a leftmost-match tokenizer stratified by term order. For
//! each term (in set order) the remaining text is scanned repeatedly; text
//! *before* every match is handed to the terms after the current one, so an
//! earlier-listed term matching late in the string does not stop later terms
//! from claiming what precedes it:
//!
//! ```text
//! terms: [A = "c", B = "a"]      text: "abc"
//!
//! A scans "abc"  -> match "c" at 2..3
//!   prefix "ab"  -> scanned with [B]  -> Marker(B) "b"
//!   Marker(A)
//! rest ""        -> done
//!
//! result: [Marker(B), Text("b"), Marker(A)]
//! ```
//!
//! Terms already tried at a position never see that prefix again.
//!
//! Scanning never re-slices the segment text: terms get the whole segment
//! plus the offset to scan from, so `^` holds only at the segment start and
//! boundary checks see the claimed text to the left.

use async_trait::async_trait;
use std::time::Instant;

use super::codec;
use super::metrics::{RunMetrics, RunResult, StageTimings};
use super::segment::{Marker, Segment, push_text};
use crate::terms::{Term, TermSet};
use crate::translator::Translator;
use crate::{Result, Stage, StageSet};

/// Wraps a translator with a dictionary for one target language.
///
/// Cheap to build; create one per call (or per request) over a shared
/// [`TermSet`]. The translator is borrowed and never replaced while the
/// pipeline runs.
pub struct DictionaryTranslator<'a> {
    target_lang: &'a str,
    translator: &'a dyn Translator,
    terms: &'a TermSet,
    /// Preprocess and transform terms, in set order.
    pre_terms: Vec<&'a dyn Term>,
    post_terms: Vec<&'a dyn Term>,
}

impl<'a> DictionaryTranslator<'a> {
    pub fn new(target_lang: &'a str, translator: &'a dyn Translator, terms: &'a TermSet) -> Self {
        let (post_terms, pre_terms): (Vec<&dyn Term>, Vec<&dyn Term>) =
            terms.iter().partition(|t| t.config().stage == Stage::Postprocess);
        DictionaryTranslator { target_lang, translator, terms, pre_terms, post_terms }
    }

    pub fn target_lang(&self) -> &'a str {
        self.target_lang
    }

    pub fn translator(&self) -> &'a dyn Translator {
        self.translator
    }

    pub fn terms(&self) -> &'a TermSet {
        self.terms
    }

    /// Replace every term match in the text segments with a marker.
    pub fn transform(&self, segments: Vec<Segment<'a>>, terms: &[&'a dyn Term]) -> Vec<Segment<'a>> {
        let mut out = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => self.scan_into(&text, 0, terms, &mut out),
                marker => out.push(marker),
            }
        }
        out
    }

    /// Scan `text[start..]`; the part before `start` is already claimed and
    /// only gives terms their left context.
    fn scan_into(&self, text: &str, mut start: usize, terms: &[&'a dyn Term], out: &mut Vec<Segment<'a>>) {
        for (i, &term) in terms.iter().enumerate() {
            if start >= text.len() {
                break;
            }
            if !term.should_apply(self) {
                continue;
            }

            while start < text.len() {
                let Some(found) = term.scan(self, text, start) else {
                    break;
                };
                if found.is_empty() || found.start < start {
                    tracing::warn!(term = term.source(), "ignoring match that consumes nothing");
                    break;
                }
                self.scan_into(&text[..found.start], start, &terms[i + 1..], out);
                tracing::trace!(term = term.source(), matched = &text[found.start..found.end], "term matched");
                out.push(Segment::Marker(Marker::new(term, found.payload)));
                start = found.end;
            }
        }

        if start < text.len() {
            out.push(Segment::Text(text[start..].to_owned()));
        }
    }

    /// Render markers whose stage is in `stages` and merge adjacent text.
    /// Other markers are kept for a later stage.
    pub async fn inverse_transform(&self, segments: Vec<Segment<'a>>, stages: StageSet) -> Result<Vec<Segment<'a>>> {
        let mut out = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => push_text(&mut out, text),
                Segment::Marker(marker) if stages.has(marker.term.config().stage) => {
                    let text = marker.term.process(self, marker.payload).await?;
                    push_text(&mut out, text);
                }
                marker => out.push(marker),
            }
        }
        Ok(out)
    }

    /// Run the full pipeline and keep the intermediate texts and timings.
    pub async fn translate_with_metrics(&self, text: &str) -> Result<RunResult> {
        let total_start = Instant::now();

        let transformed = self.transform(vec![Segment::Text(text.to_owned())], &self.pre_terms);
        let preprocessed = self.inverse_transform(transformed, StageSet::PREPROCESS).await?;
        let encoded = codec::encode(preprocessed);
        let prepare = total_start.elapsed();

        tracing::debug!(
            translator = self.translator.name(),
            target_lang = self.target_lang,
            markers = encoded.markers.len(),
            text = %encoded.text,
            "translating"
        );
        let backend_start = Instant::now();
        let translated = self.translator.translate(&encoded.text).await?;
        let backend = backend_start.elapsed();
        tracing::debug!(translator = self.translator.name(), text = %translated, "translated");

        let finish_start = Instant::now();
        let decoded = codec::decode(&translated, &encoded.markers)?;
        let postprocessed = self.transform(decoded, &self.post_terms);
        let processed = self.inverse_transform(postprocessed, StageSet::all()).await?;
        let output = processed.first().and_then(Segment::as_text).unwrap_or_default().to_owned();
        let finish = finish_start.elapsed();

        Ok(RunResult {
            text: output,
            metrics: RunMetrics {
                encoded: encoded.text,
                translated,
                markers: encoded.markers.len(),
                escaped: encoded.escaped,
                timings: StageTimings { prepare, backend, finish, total: total_start.elapsed() },
            },
        })
    }
}

#[async_trait]
impl Translator for DictionaryTranslator<'_> {
    fn name(&self) -> &str {
        "Term"
    }

    async fn translate(&self, text: &str) -> Result<String> {
        self.translate_with_metrics(text).await.map(|run| run.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::IdentityTranslator;
    use crate::{Payload, TermDefinition};

    fn term_set(defs: Vec<TermDefinition>) -> TermSet {
        TermSet::load(defs).unwrap()
    }

    fn sources(segments: &[Segment<'_>]) -> Vec<String> {
        segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) => format!("text:{t}"),
                Segment::Marker(m) => format!("term:{}", m.term.source()),
            })
            .collect()
    }

    #[test]
    fn earlier_text_gets_a_pass_through_later_terms() {
        let terms = term_set(vec![TermDefinition::new("c", "C").priority(1), TermDefinition::new("a", "A")]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        let user: Vec<&dyn Term> = terms.user_terms().collect();

        let out = dict.transform(vec![Segment::text("abc")], &user);
        assert_eq!(sources(&out), vec!["term:a", "text:b", "term:c"]);
    }

    #[test]
    fn a_term_consumes_every_occurrence() {
        let terms = term_set(vec![TermDefinition::new("ab", "X")]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        let user: Vec<&dyn Term> = terms.user_terms().collect();

        let out = dict.transform(vec![Segment::text("ab-ab-")], &user);
        assert_eq!(sources(&out), vec!["term:ab", "text:-", "term:ab", "text:-"]);
    }

    #[test]
    fn markers_pass_through_transform() {
        let terms = term_set(vec![TermDefinition::new("a", "A")]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        let user: Vec<&dyn Term> = terms.user_terms().collect();
        let marker = Segment::marker(user[0], Payload::Unit);

        let out = dict.transform(vec![marker.clone(), Segment::text("xa")], &user);
        assert_eq!(out[0], marker);
        assert_eq!(sources(&out[1..]), vec!["text:x", "term:a"]);
    }

    #[test]
    fn empty_matches_do_not_loop() {
        let terms = term_set(vec![TermDefinition::new("q*", "Q")]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        let user: Vec<&dyn Term> = terms.user_terms().collect();

        let out = dict.transform(vec![Segment::text("abc")], &user);
        assert_eq!(sources(&out), vec!["text:abc"]);
    }

    #[test]
    fn empty_matches_are_stepped_over() {
        let terms = term_set(vec![TermDefinition::new("x?", "X")]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        let user: Vec<&dyn Term> = terms.user_terms().collect();

        let out = dict.transform(vec![Segment::text("abxcx")], &user);
        assert_eq!(sources(&out), vec!["text:ab", "term:x?", "text:c", "term:x?"]);
    }

    #[test]
    fn anchors_hold_only_at_segment_start() {
        let terms = term_set(vec![TermDefinition::new("^a", "A")]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        let user: Vec<&dyn Term> = terms.user_terms().collect();

        let out = dict.transform(vec![Segment::text("aaa")], &user);
        assert_eq!(sources(&out), vec!["term:^a", "text:aa"]);
    }

    #[test]
    fn inactive_terms_are_skipped() {
        let terms = term_set(vec![TermDefinition::new("a", "A").target_lang("zh")]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        let user: Vec<&dyn Term> = terms.user_terms().collect();

        let out = dict.transform(vec![Segment::text("abc")], &user);
        assert_eq!(sources(&out), vec!["text:abc"]);
    }

    #[tokio::test]
    async fn inverse_transform_keeps_unselected_markers() {
        let terms = term_set(vec![
            TermDefinition::new("a", "A").stage(Stage::Preprocess),
            TermDefinition::new("b", "B").stage(Stage::Transform),
        ]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        let user: Vec<&dyn Term> = terms.user_terms().collect();

        let out = dict.transform(vec![Segment::text("xaxbx")], &user);
        let out = dict.inverse_transform(out, StageSet::PREPROCESS).await.unwrap();
        assert_eq!(sources(&out), vec!["text:xAx", "term:b", "text:x"]);

        let out = dict.inverse_transform(out, StageSet::all()).await.unwrap();
        assert_eq!(out, vec![Segment::text("xAxBx")]);
    }

    #[tokio::test]
    async fn metrics_expose_the_backend_view() {
        let terms = term_set(vec![TermDefinition::new("猫", "cat")]);
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);

        let run = dict.translate_with_metrics("猫と犬").await.unwrap();
        assert_eq!(run.text, "catと犬");
        assert_eq!(run.metrics.encoded, "ZMBZと犬");
        assert_eq!(run.metrics.translated, "ZMBZと犬");
        assert_eq!(run.metrics.markers, 1);
        assert_eq!(run.metrics.escaped, 0);
        assert!(run.metrics.timings.total >= run.metrics.timings.backend);
    }

    #[tokio::test]
    async fn empty_input_gives_empty_output() {
        let terms = TermSet::builtin();
        let identity = IdentityTranslator::new();
        let dict = DictionaryTranslator::new("en", &identity, &terms);
        assert_eq!(Translator::translate(&dict, "").await.unwrap(), "");
    }
}
