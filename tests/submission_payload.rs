mod common;

use common::{commercial_draft, land_draft, residential_draft};
use insta::assert_snapshot;
use listing_core::{
    domain::FlagInput,
    errors::ListingError,
    wizard::{assemble, hydrate},
};
use serde_json::json;

#[test]
fn land_branch_matches_api_shape() {
    let payload = assemble(&land_draft(), 2026).unwrap();
    let land = serde_json::to_string_pretty(&payload.land).unwrap();
    assert_snapshot!(land, @r###"
    {
      "area": 1500.0,
      "blockNumber": "112",
      "parcelNumber": "7",
      "sheetNumber": "",
      "zoningStatus": {
        "en": "Residential zone",
        "ru": "Жилая зона"
      },
      "deedStatus": {
        "en": "Freehold",
        "ru": "Собственность"
      },
      "generalFeatures": {
        "en": "",
        "ru": ""
      },
      "exchangeable": false
    }
    "###);
}

#[test]
fn land_listing_has_no_housing_category() {
    let payload = assemble(&land_draft(), 2026).unwrap();
    let value = serde_json::to_value(&payload).unwrap();
    assert!(value.get("housingCategory").is_none());
    assert!(value.get("residential").is_none());
    assert!(value.get("land").is_some());
}

#[test]
fn residential_payload_coerces_flags_and_derives_age() {
    let payload = assemble(&residential_draft(), 2026).unwrap();
    let details = payload.residential.as_ref().unwrap();
    assert!(details.furnished);
    assert!(!details.exchangeable);
    assert_eq!(details.building_age, Some(11));
    assert_eq!(details.usage_status.ru, "Пустая");

    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        value["housingCategory"],
        json!({"en": "Apartment", "ru": "Квартира"})
    );
    assert_eq!(value["buildingNumber"], "12");
    assert_eq!(
        value["price"],
        json!([
            {"amount": 250000.0, "currency": "USD"},
            {"amount": 8000000.0, "currency": "TRY"}
        ])
    );
    assert_eq!(
        value["distances"],
        json!([{"typeId": "beach", "distance": 0.3}])
    );
    assert!(value.get("videoUrl").is_none());
    assert!(value.get("commercial").is_none());
}

#[test]
fn blank_video_link_is_dropped_and_real_one_trimmed() {
    let mut draft = commercial_draft();
    draft.media.video_url = Some("   ".into());
    assert_eq!(assemble(&draft, 2026).unwrap().video_url, None);

    draft.media.video_url = Some(" https://video.test/tour ".into());
    assert_eq!(
        assemble(&draft, 2026).unwrap().video_url.as_deref(),
        Some("https://video.test/tour")
    );
}

#[test]
fn text_flag_that_is_not_a_boolean_fails_assembly() {
    let mut draft = commercial_draft();
    draft.commercial.exchangeable = FlagInput::Text("sometimes".into());
    let err = assemble(&draft, 2026).unwrap_err();
    match err {
        ListingError::InvalidInput(message) => assert!(message.contains("exchangeable")),
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn hydrated_draft_reassembles_to_the_same_payload() {
    let original = assemble(&residential_draft(), 2026).unwrap();
    let draft = hydrate("res-1", original.clone());
    assert_eq!(draft.id.as_deref(), Some("res-1"));
    assert_eq!(assemble(&draft, 2026).unwrap(), original);
}
