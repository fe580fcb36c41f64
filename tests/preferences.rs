mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use listing_core::{
    config::{ClientPreferences, PreferencesManager},
    currency::CurrencyCode,
    errors::ListingError,
    localized::Language,
};
use predicates::prelude::*;

#[test]
fn missing_file_yields_defaults() {
    let manager = PreferencesManager::with_base_dir(common::temp_home()).unwrap();
    let prefs = manager.load().unwrap();
    assert_eq!(prefs, ClientPreferences::default());
    assert_eq!(prefs.selected_currency, CurrencyCode::usd());
    assert_eq!(prefs.selected_language, Language::En);
}

#[test]
fn first_view_is_recorded_once() {
    let manager = PreferencesManager::with_base_dir(common::temp_home()).unwrap();
    assert!(manager.record_view("listing-7").unwrap());
    assert!(!manager.record_view("listing-7").unwrap());
    assert!(manager.record_view("listing-8").unwrap());

    let prefs = manager.load().unwrap();
    assert_eq!(prefs.viewed_listings.len(), 2);
}

#[test]
fn selections_persist_under_client_keys() {
    let temp = TempDir::new().unwrap();
    let manager = PreferencesManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    manager.set_currency("try").unwrap();
    manager.set_language("ru").unwrap();

    let file = temp.child("preferences.json");
    file.assert(predicate::path::exists());
    file.assert(predicate::str::contains("\"selectedCurrency\": \"TRY\""));
    file.assert(predicate::str::contains("\"selectedLanguage\": \"ru\""));
    temp.child("preferences.json.tmp")
        .assert(predicate::path::missing());

    let reloaded = PreferencesManager::with_base_dir(temp.path().to_path_buf())
        .unwrap()
        .load()
        .unwrap();
    assert_eq!(reloaded.selected_currency, CurrencyCode::new("TRY"));
    assert_eq!(reloaded.selected_language, Language::Ru);
}

#[test]
fn invalid_values_are_refused() {
    let manager = PreferencesManager::with_base_dir(common::temp_home()).unwrap();
    assert!(matches!(
        manager.set_currency("dollars"),
        Err(ListingError::Preferences(_))
    ));
    assert!(matches!(
        manager.set_language("de"),
        Err(ListingError::Preferences(_))
    ));
    assert_eq!(manager.load().unwrap(), ClientPreferences::default());
}

#[test]
fn unreadable_file_is_replaced_on_next_save() {
    let temp = TempDir::new().unwrap();
    temp.child("preferences.json").write_str("[1, 2").unwrap();
    let manager = PreferencesManager::with_base_dir(temp.path().to_path_buf()).unwrap();

    assert_eq!(manager.load().unwrap(), ClientPreferences::default());
    assert!(manager.record_view("abc").unwrap());
    temp.child("preferences.json")
        .assert(predicate::str::contains("\"viewedHotels\""));
}
