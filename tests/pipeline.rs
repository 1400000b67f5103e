use async_trait::async_trait;
use dictrans::codec;
use dictrans::{
    Error, FilterList, IdentityTranslator, Options, Payload, PatternTerm, Segment, Stage, TermConfig, TermDefinition,
    TermSet, Translator, translate, translate_verbose,
};
use std::sync::{Arc, Mutex};

/// Upper-cases everything, like a backend that would mangle protected spans.
struct Shouting;

#[async_trait]
impl Translator for Shouting {
    fn name(&self) -> &str {
        "Google"
    }

    async fn translate(&self, text: &str) -> dictrans::Result<String> {
        Ok(text.to_uppercase())
    }
}

/// Records what it was asked to translate.
#[derive(Default)]
struct Spy {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl Translator for Spy {
    fn name(&self) -> &str {
        "Nop"
    }

    async fn translate(&self, text: &str) -> dictrans::Result<String> {
        self.seen.lock().unwrap().push(text.to_owned());
        Ok(text.to_owned())
    }
}

/// Appends a token nobody allocated.
struct Forger;

#[async_trait]
impl Translator for Forger {
    fn name(&self) -> &str {
        "Nop"
    }

    async fn translate(&self, text: &str) -> dictrans::Result<String> {
        Ok(format!("{text} ZMYYZ"))
    }
}

struct Broken;

#[async_trait]
impl Translator for Broken {
    fn name(&self) -> &str {
        "DeepL"
    }

    async fn translate(&self, _text: &str) -> dictrans::Result<String> {
        Err(Error::backend("DeepL", std::io::Error::other("service unavailable")))
    }
}

async fn run(text: &str, translator: &dyn Translator, defs: Vec<TermDefinition>) -> dictrans::Result<String> {
    let terms = TermSet::load(defs)?;
    translate(text, "en", translator, &terms, &Options::default()).await
}

#[tokio::test]
async fn identity_translator_round_trips_text_without_terms() {
    let inputs = [
        "",
        "plain text",
        "see https://example.com/a?b=c and #tag \u{1F600}",
        "already ZMBZ looking zmcz tokens",
        "多言語のテキスト",
    ];
    for input in inputs {
        let out = run(input, &IdentityTranslator::new(), Vec::new()).await.unwrap();
        assert_eq!(out, input);
    }
}

#[tokio::test]
async fn urls_survive_a_mangling_translator() {
    let out = run("see https://example.com/Path?q=Mixed", &Shouting, Vec::new()).await.unwrap();
    assert_eq!(out, "SEE https://example.com/Path?q=Mixed");
}

#[tokio::test]
async fn token_look_alikes_survive_a_mangling_translator() {
    let terms = TermSet::builtin();
    let run = translate_verbose("keep zmbz as is", "en", &Shouting, &terms, &Options::default()).await.unwrap();
    assert_eq!(run.text, "KEEP zmbz AS IS");
    assert_eq!(run.metrics.escaped, 1);
}

#[tokio::test]
async fn partial_token_before_protected_span_survives() {
    let inputs = ["ZMBhttp://a.com", "ZMChttp://a.com", "xzmb\u{1F600}", "Zm\u{1F1EF}\u{1F1F5}", "ZMBZZMhttp://a.com"];
    for input in inputs {
        let out = run(input, &IdentityTranslator::new(), Vec::new()).await.unwrap();
        assert_eq!(out, input);
    }

    let out = run("ZMBhttp://a.com", &Shouting, Vec::new()).await.unwrap();
    assert_eq!(out, "ZMBhttp://a.com");
}

#[tokio::test]
async fn glued_hashtag_is_plain_text() {
    let spy = Spy::default();
    let out = run("#a#b", &spy, Vec::new()).await.unwrap();
    assert_eq!(out, "#a#b");
    assert_eq!(*spy.seen.lock().unwrap(), vec!["ZMBZ#b".to_string()]);
}

#[tokio::test]
async fn optional_pattern_still_replaces_later_match() {
    let out = run("abx", &IdentityTranslator::new(), vec![TermDefinition::new("x?", "X")]).await.unwrap();
    assert_eq!(out, "abX");
}

#[tokio::test]
async fn dictionary_term_replaces_match() {
    let defs = vec![TermDefinition::new("猫", "cat").target_lang("en")];
    let out = run("私は猫が好き", &IdentityTranslator::new(), defs).await.unwrap();
    assert_eq!(out, "私はcatが好き");
}

#[tokio::test]
async fn terms_for_other_languages_are_ignored() {
    let defs = vec![TermDefinition::new("猫", "chat").target_lang("fr")];
    let out = run("猫", &IdentityTranslator::new(), defs).await.unwrap();
    assert_eq!(out, "猫");
}

#[tokio::test]
async fn translator_filter_selects_terms() {
    let defs = vec![
        TermDefinition::new("a", "x").translator(FilterList::include(["Google"])),
        TermDefinition::new("b", "y").translator(FilterList::exclude(["Google"])),
    ];
    let out = run("ab", &Shouting, defs.clone()).await.unwrap();
    assert_eq!(out, "xB");

    let out = run("ab", &IdentityTranslator::new(), defs).await.unwrap();
    assert_eq!(out, "ay");
}

#[tokio::test]
async fn priority_decides_overlaps() {
    // (expected, definitions)
    let cases: Vec<(&str, Vec<TermDefinition>)> = vec![
        ("Yd", vec![TermDefinition::new("ab", "X"), TermDefinition::new("abc", "Y").priority(1)]),
        ("Xcd", vec![TermDefinition::new("ab", "X").priority(1), TermDefinition::new("abc", "Y")]),
        ("Xcd", vec![TermDefinition::new("abc", "Y"), TermDefinition::new("ab", "X")]),
    ];
    for (expected, defs) in cases {
        let out = run("abcd", &IdentityTranslator::new(), defs).await.unwrap();
        assert_eq!(out, expected);
    }
}

#[tokio::test]
async fn preprocess_output_is_translated() {
    let spy = Spy::default();
    let defs = vec![TermDefinition::new("foo", "bar").stage(Stage::Preprocess)];
    let out = run("foo baz foo", &spy, defs).await.unwrap();

    assert_eq!(out, "bar baz bar");
    let seen = spy.seen.lock().unwrap();
    assert_eq!(*seen, vec!["bar baz bar".to_string()]);
}

#[tokio::test]
async fn transform_replacement_is_hidden_from_translator() {
    let spy = Spy::default();
    let defs = vec![TermDefinition::new("foo", "bar")];
    let out = run("foo baz", &spy, defs).await.unwrap();

    assert_eq!(out, "bar baz");
    let seen = spy.seen.lock().unwrap();
    assert_eq!(*seen, vec!["ZMBZ baz".to_string()]);
}

#[tokio::test]
async fn postprocess_terms_only_see_translator_output() {
    let defs = vec![TermDefinition::new("CAT", "Cat").stage(Stage::Postprocess)];
    let out = run("cat CAT", &Shouting, defs.clone()).await.unwrap();
    assert_eq!(out, "Cat Cat");

    let spy = Spy::default();
    run("CAT", &spy, defs).await.unwrap();
    assert_eq!(*spy.seen.lock().unwrap(), vec!["CAT".to_string()]);
}

#[tokio::test]
async fn hashtag_body_goes_through_dictionary() {
    let defs = vec![TermDefinition::new("foo", "baz")];
    let out = run("#foo bar", &Shouting, defs).await.unwrap();
    assert_eq!(out, "#baz BAR");
}

#[tokio::test]
async fn hashtag_body_is_not_sent_to_backend() {
    let spy = Spy::default();
    let out = run("hi #tag", &spy, Vec::new()).await.unwrap();
    assert_eq!(out, "hi #tag");
    assert_eq!(*spy.seen.lock().unwrap(), vec!["hi ZMBZ".to_string()]);
}

#[tokio::test]
async fn unknown_token_from_translator_fails_the_call() {
    let err = run("hello", &Forger, Vec::new()).await.unwrap_err();
    match err {
        Error::MarkerOutOfRange { index, count, .. } => assert_eq!((index, count), (399, 0)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn backend_failure_propagates() {
    let err = run("hello", &Broken, Vec::new()).await.unwrap_err();
    assert!(matches!(err, Error::Backend { ref translator, .. } if translator == "DeepL"));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn invalid_dictionary_fails_load() {
    let err = run("x", &IdentityTranslator::new(), vec![TermDefinition::new("(", "x")]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidPattern { index: 0, .. }));
}

#[test]
fn codec_round_trips_many_markers() {
    let term = PatternTerm::new("x", "y", TermConfig::default()).unwrap();
    let segments: Vec<Segment<'_>> =
        (0..500).map(|i| Segment::marker(&term, Payload::Text(i.to_string()))).collect();

    let encoded = codec::encode(segments.clone());
    assert_eq!(encoded.markers.len(), 500);
    assert_eq!(encoded.escaped, 0);
    assert!(encoded.text.starts_with("ZMBZZMCZ"));

    let decoded = codec::decode(&encoded.text, &encoded.markers).unwrap();
    assert_eq!(decoded, segments);

    let lowered = codec::decode(&encoded.text.to_lowercase(), &encoded.markers).unwrap();
    assert_eq!(lowered, segments);
}

#[test]
fn codec_tokens_are_distinct() {
    let tokens: std::collections::HashSet<String> = (0..10_000).map(codec::encode_index).collect();
    assert_eq!(tokens.len(), 10_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn term_set_is_shared_across_tasks() {
    let terms = Arc::new(TermSet::load(vec![TermDefinition::new("猫", "cat")]).unwrap());
    let mut handles = Vec::new();
    for i in 0..32 {
        let terms = Arc::clone(&terms);
        handles.push(tokio::spawn(async move {
            let text = format!("猫 {i}");
            translate(&text, "en", &IdentityTranslator::new(), &terms, &Options::default()).await
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().unwrap(), format!("cat {i}"));
    }
}
