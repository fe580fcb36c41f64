use serde::{Deserialize, Serialize};

use crate::localized::{Language, LocalizedText};

/// Address parts used for the one-line display address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressParts {
    #[serde(default)]
    pub state: Option<LocalizedText>,
    #[serde(default)]
    pub city: Option<LocalizedText>,
    #[serde(default)]
    pub street: Option<LocalizedText>,
}

/// Joins state, city and street (in that order) with `", "`, using the value
/// for `language` or the English one. Parts empty in both are skipped.
pub fn format_address(parts: &AddressParts, language: Language) -> String {
    [&parts.state, &parts.city, &parts.street]
        .into_iter()
        .flatten()
        .map(|part| part.get_or_fallback(language).trim())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_state_city_street() {
        let parts = AddressParts {
            state: Some(LocalizedText::new("Antalya", "Анталья")),
            city: Some(LocalizedText::new("Alanya", "Аланья")),
            street: Some(LocalizedText::new("Ataturk Blvd", "")),
        };
        assert_eq!(
            format_address(&parts, Language::Ru),
            "Анталья, Аланья, Ataturk Blvd"
        );
    }

    #[test]
    fn missing_parts_leave_no_dangling_separator() {
        let parts = AddressParts {
            state: Some(LocalizedText::default()),
            city: None,
            street: Some(LocalizedText::new("Main St", "")),
        };
        assert_eq!(format_address(&parts, Language::En), "Main St");
        assert_eq!(format_address(&AddressParts::default(), Language::En), "");
    }
}
