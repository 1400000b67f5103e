use crate::engine::{DictionaryTranslator, RunResult};
use crate::terms::TermSet;
use crate::translator::Translator;
use crate::{Error, Result};

/// Options that affect a translate call.
#[derive(Debug, Clone)]
pub struct Options {
    /// Target languages accepted by [`translate`]; empty accepts any.
    pub languages: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options { languages: vec!["en".to_string(), "zh".to_string()] }
    }
}

impl Options {
    /// Accept any target language.
    pub fn any_language() -> Self {
        Options { languages: Vec::new() }
    }

    fn check_language(&self, target_lang: &str) -> Result<()> {
        if self.languages.is_empty() || self.languages.iter().any(|l| l == target_lang) {
            Ok(())
        } else {
            Err(Error::UnsupportedLanguage(target_lang.to_string()))
        }
    }
}

/// Translate `text` into `target_lang` through `translator`, applying `terms`.
///
/// # Example
/// ```
/// use dictrans::{IdentityTranslator, Options, TermDefinition, TermSet, translate};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let terms = TermSet::load(vec![TermDefinition::new("猫", "cat").target_lang("en")]).unwrap();
/// let out = translate("私は猫が好き", "en", &IdentityTranslator::new(), &terms, &Options::default()).await.unwrap();
/// assert_eq!(out, "私はcatが好き");
/// # });
/// ```
pub async fn translate(
    text: &str,
    target_lang: &str,
    translator: &dyn Translator,
    terms: &TermSet,
    options: &Options,
) -> Result<String> {
    translate_verbose(text, target_lang, translator, terms, options).await.map(|run| run.text)
}

/// Like [`translate`], but also returns what the backend saw and per-phase timings.
pub async fn translate_verbose(
    text: &str,
    target_lang: &str,
    translator: &dyn Translator,
    terms: &TermSet,
    options: &Options,
) -> Result<RunResult> {
    options.check_language(target_lang)?;
    let dict = DictionaryTranslator::new(target_lang, translator, terms);
    dict.translate_with_metrics(text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdentityTranslator, TermDefinition};

    #[tokio::test]
    async fn translate_applies_terms() {
        let terms = TermSet::load(vec![TermDefinition::new("猫", "cat")]).unwrap();
        let out = translate("猫", "zh", &IdentityTranslator::new(), &terms, &Options::default()).await.unwrap();
        assert_eq!(out, "cat");
    }

    #[tokio::test]
    async fn unsupported_language_is_rejected_before_translation() {
        let terms = TermSet::builtin();
        let err = translate("x", "fr", &IdentityTranslator::new(), &terms, &Options::default()).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(ref l) if l == "fr"));

        let out = translate("x", "fr", &IdentityTranslator::new(), &terms, &Options::any_language()).await.unwrap();
        assert_eq!(out, "x");
    }

    #[tokio::test]
    async fn verbose_reports_backend_text() {
        let terms = TermSet::builtin();
        let run = translate_verbose("see https://example.com", "en", &IdentityTranslator::new(), &terms, &Options::default())
            .await
            .unwrap();
        assert_eq!(run.text, "see https://example.com");
        assert_eq!(run.metrics.encoded, "see ZMBZ");
    }
}
