use serde::Deserialize;

use crate::error::{BlueprintError, BlueprintResult};

/// Default locale for resolved display text
pub const DEFAULT_LOCALE: &str = "enGB";

/// A localized string bundle: one key with its text in every shipped language
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocalizedStringFile {
    pub key: String,
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LanguageEntry {
    pub locale: String,
    pub text: String,
}

impl LocalizedStringFile {
    pub fn text_for(&self, locale: &str) -> BlueprintResult<&str> {
        self.languages
            .iter()
            .find(|entry| entry.locale == locale)
            .map(|entry| entry.text.as_str())
            .ok_or_else(|| BlueprintError::MissingLocale {
                key: self.key.clone(),
                locale: locale.to_string(),
            })
    }
}
