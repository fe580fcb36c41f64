use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyCode;
use crate::localized::Language;

/// Limits and tracked locales applied by the wizard validators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WizardSettings {
    /// Languages every required localized field must be filled in.
    pub languages: Vec<Language>,
    /// Currencies every listing must carry a price in.
    pub currencies: Vec<CurrencyCode>,
    pub min_images: usize,
    pub max_images: usize,
    pub earliest_build_year: i32,
    pub current_year: i32,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            languages: Language::ALL.to_vec(),
            currencies: vec![CurrencyCode::new("USD"), CurrencyCode::new("TRY")],
            min_images: 3,
            max_images: 15,
            earliest_build_year: 1800,
            current_year: Utc::now().year(),
        }
    }
}

impl WizardSettings {
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }
}
