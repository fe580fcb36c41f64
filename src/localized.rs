//! Two-language text values used for labels, titles, descriptions and
//! address parts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages tracked by listing content.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ru];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ru => "Russian",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "ru" | "russian" => Some(Language::Ru),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Text stored once per tracked language.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ru: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ru: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ru: ru.into(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Ru => &self.ru,
        }
    }

    /// Value for `language`, or the English value when that one is blank.
    pub fn get_or_fallback(&self, language: Language) -> &str {
        let value = self.get(language);
        if value.trim().is_empty() {
            &self.en
        } else {
            value
        }
    }

    pub fn set(&mut self, language: Language, value: impl Into<String>) {
        match language {
            Language::En => self.en = value.into(),
            Language::Ru => self.ru = value.into(),
        }
    }

    /// True when every language in `languages` has a non-blank value.
    pub fn is_complete(&self, languages: &[Language]) -> bool {
        languages
            .iter()
            .all(|language| !self.get(*language).trim().is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.en.trim().is_empty() && self.ru.trim().is_empty()
    }
}

/// String-keyed map of localized values as kept by the draft for usage, deed,
/// zoning and general-feature selections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LocalizedMap(pub BTreeMap<String, String>);

impl LocalizedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, language: Language, value: impl Into<String>) {
        self.0.insert(language.code().to_string(), value.into());
    }

    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(language.code()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|value| value.trim().is_empty())
    }

    /// Converts to a [`LocalizedText`]; keys other than the tracked language
    /// codes are dropped.
    pub fn to_localized_text(&self) -> LocalizedText {
        LocalizedText {
            en: self.get(Language::En).unwrap_or_default().to_string(),
            ru: self.get(Language::Ru).unwrap_or_default().to_string(),
        }
    }
}

impl From<&LocalizedText> for LocalizedMap {
    fn from(text: &LocalizedText) -> Self {
        let mut map = LocalizedMap::new();
        map.insert(Language::En, text.en.clone());
        map.insert(Language::Ru, text.ru.clone());
        map
    }
}
