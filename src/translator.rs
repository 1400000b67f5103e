//! The translator capability consumed by the dictionary pipeline.

use async_trait::async_trait;

use crate::Result;

/// Anything that turns text into text in some target language.
///
/// `name` is the identifier terms use in their translator filters, so it must
/// stay stable across releases of a backend.
#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, text: &str) -> Result<String>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn translate(&self, text: &str) -> Result<String> {
        (**self).translate(text).await
    }
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn translate(&self, text: &str) -> Result<String> {
        (**self).translate(text).await
    }
}

/// Pass-through translator.
///
/// Used for dry runs and for the nested pass over hashtag bodies, where it
/// stands in for the real backend while keeping the backend's name so
/// translator filters keep selecting the same terms.
#[derive(Debug, Clone)]
pub struct IdentityTranslator {
    name: String,
}

impl IdentityTranslator {
    pub const NAME: &'static str = "Nop";

    pub fn new() -> Self {
        Self::named(Self::NAME)
    }

    pub fn named(name: impl Into<String>) -> Self {
        IdentityTranslator { name: name.into() }
    }
}

impl Default for IdentityTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for IdentityTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, text: &str) -> Result<String> {
        Ok(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identity_returns_input() {
        let t = IdentityTranslator::new();
        assert_eq!(t.name(), "Nop");
        assert_eq!(t.translate("猫 ZMBZ cat").await.unwrap(), "猫 ZMBZ cat");
    }

    #[tokio::test]
    async fn named_identity_keeps_name_through_references() {
        let t = IdentityTranslator::named("Google");
        let by_ref: &dyn Translator = &t;
        let boxed: Box<dyn Translator> = Box::new(t.clone());
        assert_eq!(by_ref.name(), "Google");
        assert_eq!(boxed.name(), "Google");
        assert_eq!(boxed.translate("x").await.unwrap(), "x");
    }
}
