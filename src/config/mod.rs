mod settings;

pub use settings::WizardSettings;

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::currency::CurrencyCode;
use crate::errors::{ListingError, Result};
use crate::localized::Language;
use crate::utils::app_data_dir;

const PREFERENCES_FILE: &str = "preferences.json";
const TMP_SUFFIX: &str = "tmp";

/// Client-side state kept between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientPreferences {
    #[serde(rename = "selectedCurrency", default)]
    pub selected_currency: CurrencyCode,
    #[serde(rename = "selectedLanguage", default)]
    pub selected_language: Language,
    /// Listing id to the first time it was opened; used so a listing's view
    /// counter is bumped once per client.
    #[serde(rename = "viewedHotels", default)]
    pub viewed_listings: BTreeMap<String, DateTime<Utc>>,
    #[serde(rename = "apiBaseUrl", default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl Default for ClientPreferences {
    fn default() -> Self {
        Self {
            selected_currency: CurrencyCode::usd(),
            selected_language: Language::En,
            viewed_listings: BTreeMap::new(),
            api_base_url: None,
        }
    }
}

/// Loads and stores [`ClientPreferences`] as JSON.
#[derive(Debug, Clone)]
pub struct PreferencesManager {
    path: PathBuf,
}

impl PreferencesManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(PREFERENCES_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing files yield defaults. An unreadable file is logged and also
    /// yields defaults so a corrupt file never blocks the client.
    pub fn load(&self) -> Result<ClientPreferences> {
        if !self.path.exists() {
            return Ok(ClientPreferences::default());
        }
        let data = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&data) {
            Ok(prefs) => Ok(prefs),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable preferences");
                Ok(ClientPreferences::default())
            }
        }
    }

    pub fn save(&self, prefs: &ClientPreferences) -> Result<()> {
        let json = serde_json::to_string_pretty(prefs)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn set_currency(&self, code: &str) -> Result<ClientPreferences> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ListingError::Preferences(format!(
                "`{}` is not a three-letter currency code",
                code
            )));
        }
        self.modify(|prefs| prefs.selected_currency = CurrencyCode::new(code))
    }

    pub fn set_language(&self, code: &str) -> Result<ClientPreferences> {
        let language = Language::parse(code).ok_or_else(|| {
            ListingError::Preferences(format!("unsupported language `{}`", code.trim()))
        })?;
        self.modify(|prefs| prefs.selected_language = language)
    }

    /// Records a view of `listing_id`. Returns `true` only the first time, so
    /// the caller knows whether to report the view to the server.
    pub fn record_view(&self, listing_id: &str) -> Result<bool> {
        let mut prefs = self.load()?;
        if prefs.viewed_listings.contains_key(listing_id) {
            return Ok(false);
        }
        prefs
            .viewed_listings
            .insert(listing_id.to_string(), Utc::now());
        self.save(&prefs)?;
        Ok(true)
    }

    fn modify(&self, edit: impl FnOnce(&mut ClientPreferences)) -> Result<ClientPreferences> {
        let mut prefs = self.load()?;
        edit(&mut prefs);
        self.save(&prefs)?;
        Ok(prefs)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
