//! Per-term activation settings.

use serde::{Deserialize, Serialize};

use crate::Stage;

/// Translator names a filter list may refer to.
pub const KNOWN_TRANSLATORS: &[&str] = &["Nop", "Google", "Baidu", "Microsoft", "DeepL"];

/// Include or exclude list of names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterList {
    pub exclude: bool,
    pub list: Vec<String>,
}

impl FilterList {
    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterList { exclude: false, list: names.into_iter().map(Into::into).collect() }
    }

    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterList { exclude: true, list: names.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.list.iter().any(|x| x == value) ^ self.exclude
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermConfig {
    pub stage: Stage,
    /// `None` matches every target language.
    pub target_lang: Option<String>,
    pub translator: Option<FilterList>,
    pub priority: i32,
}

impl TermConfig {
    pub fn new(stage: Stage) -> Self {
        TermConfig { stage, ..Default::default() }
    }

    pub fn applies_to(&self, target_lang: &str, translator: &str) -> bool {
        if !matches_language(self.target_lang.as_deref(), target_lang) {
            return false;
        }
        self.translator.as_ref().map(|f| f.contains(translator)).unwrap_or(true)
    }
}

/// Match a `main[-sub]` language filter against a `main[-sub]` language.
///
/// ```text
/// filter  lang     result
/// None    *        true
/// zh      zh-TW    true   (filter has no sub tag)
/// zh-TW   zh       true   (language has no sub tag)
/// zh-TW   zh-CN    false
/// en      zh       false
/// ```
pub fn matches_language(filter: Option<&str>, lang: &str) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let (filter_main, filter_sub) = split_language(filter);
    let (lang_main, lang_sub) = split_language(lang);
    if filter_main != lang_main {
        return false;
    }
    match (filter_sub, lang_sub) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

fn split_language(tag: &str) -> (&str, Option<&str>) {
    match tag.split_once('-') {
        Some((main, sub)) => (main, Some(sub)),
        None => (tag, None),
    }
}

/// Whether `tag` has the `main[-sub]` shape accepted in term definitions.
pub(crate) fn is_language_tag(tag: &str) -> bool {
    regex!(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)?$").is_match(tag)
}
