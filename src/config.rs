//! File configuration for the `dictrans` tool.
//!
//! ```toml
//! dictionary = "dictionary.db"  # JSON-lines term dump
//! target_lang = "en"
//! translator = "Google"         # name announced to translator filters
//! languages = ["en", "zh"]
//! ```
//!
//! Every key is optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::Options;
use crate::translator::IdentityTranslator;
use crate::{Error, Result};

fn default_dictionary() -> PathBuf {
    PathBuf::from("dictionary.db")
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_translator() -> String {
    IdentityTranslator::NAME.to_string()
}

fn default_languages() -> Vec<String> {
    Options::default().languages
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_dictionary")]
    pub dictionary: PathBuf,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_translator")]
    pub translator: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dictionary: default_dictionary(),
            target_lang: default_target_lang(),
            translator: default_translator(),
            languages: default_languages(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(Error::from)
    }

    pub fn options(&self) -> Options {
        Options { languages: self.languages.clone() }
    }
}
