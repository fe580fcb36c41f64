//! Per-step validators.
//!
//! Each validator is a pure function of the draft (plus settings) and only
//! looks at the fields its step edits. A report with no errors means the
//! wizard may advance past that step.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::config::WizardSettings;
use crate::domain::{FlagInput, ListingDraft, PropertyKind, UNSET_COUNT};
use crate::localized::{Language, LocalizedMap, LocalizedText};
use crate::wizard::media::{MediaSlot, UploadState};
use crate::wizard::step::StepView;

/// Identifier of an input that failed validation, used to highlight it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    ListingType,
    PropertyType,
    HousingCategory,
    Title,
    Description,
    GrossArea,
    NetArea,
    RoomCount,
    BathroomCount,
    BalconyCount,
    FloorCount,
    FloorNumber,
    BuildYear,
    BuildingAge,
    KitchenType,
    HeatingType,
    UsageStatus,
    DeedStatus,
    Furnished,
    Exchangeable,
    LandArea,
    BlockNumber,
    ParcelNumber,
    ZoningStatus,
    Price,
    Dues,
    Country,
    City,
    State,
    Coordinates,
    Distance(usize),
    Images,
    Uploads,
    VideoUrl,
    DocumentName(usize),
    DocumentFile(usize),
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Distance(index) => write!(f, "distances[{index}]"),
            FieldId::DocumentName(index) => write!(f, "documents[{index}].name"),
            FieldId::DocumentFile(index) => write!(f, "documents[{index}].fileUrl"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FieldId {
    /// Draft key of the field; indexed fields name their list.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::ListingType => "listingType",
            FieldId::PropertyType => "propertyType",
            FieldId::HousingCategory => "housingCategory",
            FieldId::Title => "title",
            FieldId::Description => "description",
            FieldId::GrossArea => "grossArea",
            FieldId::NetArea => "netArea",
            FieldId::RoomCount => "roomCount",
            FieldId::BathroomCount => "bathroomCount",
            FieldId::BalconyCount => "balconyCount",
            FieldId::FloorCount => "floorCount",
            FieldId::FloorNumber => "floorNumber",
            FieldId::BuildYear => "buildYear",
            FieldId::BuildingAge => "buildingAge",
            FieldId::KitchenType => "kitchenType",
            FieldId::HeatingType => "heatingType",
            FieldId::UsageStatus => "usageStatus",
            FieldId::DeedStatus => "deedStatus",
            FieldId::Furnished => "furnished",
            FieldId::Exchangeable => "exchangeable",
            FieldId::LandArea => "area",
            FieldId::BlockNumber => "blockNumber",
            FieldId::ParcelNumber => "parcelNumber",
            FieldId::ZoningStatus => "zoningStatus",
            FieldId::Price => "price",
            FieldId::Dues => "dues",
            FieldId::Country => "country",
            FieldId::City => "city",
            FieldId::State => "state",
            FieldId::Coordinates => "coordinates",
            FieldId::Images => "images",
            FieldId::Uploads => "uploads",
            FieldId::VideoUrl => "videoUrl",
            FieldId::Distance(_) => "distances",
            FieldId::DocumentName(_) | FieldId::DocumentFile(_) => "documents",
        }
    }
}

/// Outcome of running one step's validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub invalid_fields: BTreeSet<FieldId>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, field: FieldId, message: impl Into<String>) {
        self.errors.push(message.into());
        self.invalid_fields.insert(field);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.invalid_fields.extend(other.invalid_fields);
    }

    pub fn has_field(&self, field: FieldId) -> bool {
        self.invalid_fields.contains(&field)
    }
}

/// Inputs besides the draft that some validators consult.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub settings: &'a WizardSettings,
    pub uploads: &'a [MediaSlot],
}

impl<'a> ValidationContext<'a> {
    pub fn new(settings: &'a WizardSettings) -> Self {
        Self {
            settings,
            uploads: &[],
        }
    }

    pub fn with_uploads(mut self, uploads: &'a [MediaSlot]) -> Self {
        self.uploads = uploads;
        self
    }
}

/// Runs the validator belonging to `view`.
pub fn validate_step(
    view: StepView,
    draft: &ListingDraft,
    context: ValidationContext<'_>,
) -> ValidationReport {
    let settings = context.settings;
    match view {
        StepView::Basics => validate_basics(draft, settings),
        StepView::ResidentialDetails => validate_residential(draft, settings),
        StepView::CommercialDetails => validate_commercial(draft, settings),
        StepView::LandDetails => validate_land(draft, settings),
        StepView::Location => validate_location(draft, settings),
        StepView::Features => validate_features(draft),
        StepView::Media => validate_media(draft, context.uploads, settings),
        StepView::Review => validate_review(draft, settings),
    }
}

pub fn validate_basics(draft: &ListingDraft, settings: &WizardSettings) -> ValidationReport {
    let mut report = ValidationReport::new();
    let languages = &settings.languages;

    require_text(
        &mut report,
        FieldId::ListingType,
        "Listing type",
        &draft.listing_type,
        languages,
    );
    require_text(
        &mut report,
        FieldId::PropertyType,
        "Property type",
        &draft.property_type,
        languages,
    );
    if !draft.property_type.en.trim().is_empty() && draft.property_kind().is_none() {
        report.push(
            FieldId::PropertyType,
            format!("Unknown property type `{}`", draft.property_type.en.trim()),
        );
    }
    if draft.property_kind() != Some(PropertyKind::Land) {
        require_text(
            &mut report,
            FieldId::HousingCategory,
            "Housing category",
            &draft.housing_category,
            languages,
        );
    }
    require_text(
        &mut report,
        FieldId::Title,
        "Title",
        &draft.title,
        languages,
    );
    require_text(
        &mut report,
        FieldId::Description,
        "Description",
        &draft.description,
        languages,
    );
    report
}

pub fn validate_residential(draft: &ListingDraft, settings: &WizardSettings) -> ValidationReport {
    let mut report = ValidationReport::new();
    let details = &draft.residential;
    let languages = &settings.languages;

    check_areas(&mut report, details.gross_area, details.net_area);
    require_count(
        &mut report,
        FieldId::RoomCount,
        "Room count",
        details.room_count,
    );
    require_count(
        &mut report,
        FieldId::BathroomCount,
        "Bathroom count",
        details.bathroom_count,
    );
    require_count(
        &mut report,
        FieldId::BalconyCount,
        "Balcony count",
        details.balcony_count,
    );
    require_count(
        &mut report,
        FieldId::FloorCount,
        "Floor count",
        details.floor_count,
    );
    if let Some(floor) = details.floor_number {
        if details.floor_count >= 0 && floor > details.floor_count {
            report.push(
                FieldId::FloorNumber,
                "Floor number cannot exceed the floor count",
            );
        }
    }

    if details.build_year == UNSET_COUNT {
        report.push(FieldId::BuildYear, "Build year is required");
    } else if details.build_year < settings.earliest_build_year
        || details.build_year > settings.current_year
    {
        report.push(
            FieldId::BuildYear,
            format!(
                "Build year must be between {} and {}",
                settings.earliest_build_year, settings.current_year
            ),
        );
    }
    if details.building_age < UNSET_COUNT {
        report.push(FieldId::BuildingAge, "Building age cannot be negative");
    }

    require_text(
        &mut report,
        FieldId::KitchenType,
        "Kitchen type",
        &details.kitchen_type,
        languages,
    );
    require_text(
        &mut report,
        FieldId::HeatingType,
        "Heating type",
        &details.heating_type,
        languages,
    );
    require_map(
        &mut report,
        FieldId::UsageStatus,
        "Usage status",
        &details.usage_status,
        languages,
    );
    require_map(
        &mut report,
        FieldId::DeedStatus,
        "Deed status",
        &details.deed_status,
        languages,
    );
    require_flag(
        &mut report,
        FieldId::Furnished,
        "Furnished",
        &details.furnished,
    );
    require_flag(
        &mut report,
        FieldId::Exchangeable,
        "Exchangeable",
        &details.exchangeable,
    );
    report
}

pub fn validate_commercial(draft: &ListingDraft, settings: &WizardSettings) -> ValidationReport {
    let mut report = ValidationReport::new();
    let details = &draft.commercial;
    let languages = &settings.languages;

    check_areas(&mut report, details.gross_area, details.net_area);
    require_count(
        &mut report,
        FieldId::RoomCount,
        "Room count",
        details.room_count,
    );
    require_count(
        &mut report,
        FieldId::BuildingAge,
        "Building age",
        details.building_age,
    );
    require_text(
        &mut report,
        FieldId::HeatingType,
        "Heating type",
        &details.heating_type,
        languages,
    );
    require_map(
        &mut report,
        FieldId::UsageStatus,
        "Usage status",
        &details.usage_status,
        languages,
    );
    require_map(
        &mut report,
        FieldId::DeedStatus,
        "Deed status",
        &details.deed_status,
        languages,
    );
    require_flag(
        &mut report,
        FieldId::Exchangeable,
        "Exchangeable",
        &details.exchangeable,
    );
    report
}

pub fn validate_land(draft: &ListingDraft, settings: &WizardSettings) -> ValidationReport {
    let mut report = ValidationReport::new();
    let details = &draft.land;
    let languages = &settings.languages;

    if !(details.area > 0.0) {
        report.push(FieldId::LandArea, "Land area must be greater than 0");
    }
    if details.block_number.trim().is_empty() {
        report.push(FieldId::BlockNumber, "Block number is required");
    }
    if details.parcel_number.trim().is_empty() {
        report.push(FieldId::ParcelNumber, "Parcel number is required");
    }
    require_map(
        &mut report,
        FieldId::ZoningStatus,
        "Zoning status",
        &details.zoning_status,
        languages,
    );
    require_map(
        &mut report,
        FieldId::DeedStatus,
        "Deed status",
        &details.deed_status,
        languages,
    );
    require_flag(
        &mut report,
        FieldId::Exchangeable,
        "Exchangeable",
        &details.exchangeable,
    );
    report
}

pub fn validate_location(draft: &ListingDraft, settings: &WizardSettings) -> ValidationReport {
    let mut report = ValidationReport::new();
    let languages = &settings.languages;

    for currency in &settings.currencies {
        let amount = draft.pricing.price.amount(currency).unwrap_or(0.0);
        if !(amount > 0.0) {
            report.push(
                FieldId::Price,
                format!("Price in {} must be greater than 0", currency),
            );
        }
    }
    for due in draft.pricing.dues.iter() {
        if !(due.amount >= 0.0) {
            report.push(
                FieldId::Dues,
                format!("Dues in {} cannot be negative", due.currency),
            );
        }
    }

    let address = &draft.address;
    require_text(
        &mut report,
        FieldId::Country,
        "Country",
        &address.country,
        languages,
    );
    require_text(&mut report, FieldId::City, "City", &address.city, languages);
    require_text(
        &mut report,
        FieldId::State,
        "State",
        &address.state,
        languages,
    );

    if address.coordinates.is_unset() {
        report.push(
            FieldId::Coordinates,
            "Pick the property location on the map",
        );
    } else if !address.coordinates.in_range() {
        report.push(FieldId::Coordinates, "Coordinates are out of range");
    }
    report
}

pub fn validate_features(draft: &ListingDraft) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut seen = HashSet::new();
    for (index, entry) in draft.selection.distances.iter().enumerate() {
        let type_id = entry.type_id.trim();
        if type_id.is_empty() {
            report.push(
                FieldId::Distance(index),
                format!("Distance #{} needs a type", index + 1),
            );
            continue;
        }
        if !(entry.distance >= 0.0) {
            report.push(
                FieldId::Distance(index),
                format!("Distance to `{}` cannot be negative", type_id),
            );
        }
        if !seen.insert(type_id) {
            report.push(
                FieldId::Distance(index),
                format!("Distance type `{}` is listed more than once", type_id),
            );
        }
    }
    report
}

pub fn validate_media(
    draft: &ListingDraft,
    uploads: &[MediaSlot],
    settings: &WizardSettings,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let count = draft.media.images.len();
    if count < settings.min_images {
        report.push(
            FieldId::Images,
            format!("Add at least {} images", settings.min_images),
        );
    } else if count > settings.max_images {
        report.push(
            FieldId::Images,
            format!("No more than {} images are allowed", settings.max_images),
        );
    }

    let pending = uploads
        .iter()
        .filter(|slot| slot.state == UploadState::Pending)
        .count();
    if pending > 0 {
        report.push(
            FieldId::Uploads,
            format!("{} image(s) are still uploading", pending),
        );
    }
    for slot in uploads {
        if let UploadState::Failed { message } = &slot.state {
            report.push(
                FieldId::Uploads,
                format!("Upload of `{}` failed: {}", slot.file_name, message),
            );
        }
    }

    if let Some(url) = draft.media.video_url.as_deref() {
        let url = url.trim();
        if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
            report.push(
                FieldId::VideoUrl,
                "Video link must start with http:// or https://",
            );
        }
    }
    report
}

pub fn validate_review(draft: &ListingDraft, settings: &WizardSettings) -> ValidationReport {
    let mut report = ValidationReport::new();
    for (index, document) in draft.documents.iter().enumerate() {
        let missing = missing_languages(&document.name, &settings.languages);
        if !missing.is_empty() {
            report.push(
                FieldId::DocumentName(index),
                format!("Document #{} needs a name in: {}", index + 1, missing),
            );
        }
        if document.file_url.trim().is_empty() {
            report.push(
                FieldId::DocumentFile(index),
                format!("Document #{} has no uploaded file", index + 1),
            );
        }
    }
    report
}

fn check_areas(report: &mut ValidationReport, gross: f64, net: f64) {
    if !(gross > 0.0) {
        report.push(FieldId::GrossArea, "Gross area must be greater than 0");
    }
    if !(net > 0.0) {
        report.push(FieldId::NetArea, "Net area must be greater than 0");
    } else if gross > 0.0 && net > gross {
        report.push(FieldId::NetArea, "Net area cannot exceed gross area");
    }
}

fn require_count(report: &mut ValidationReport, field: FieldId, label: &str, value: i32) {
    if value == UNSET_COUNT {
        report.push(field, format!("{} is required", label));
    } else if value < 0 {
        report.push(field, format!("{} cannot be negative", label));
    }
}

fn require_text(
    report: &mut ValidationReport,
    field: FieldId,
    label: &str,
    value: &LocalizedText,
    languages: &[Language],
) {
    let missing = missing_languages(value, languages);
    if !missing.is_empty() {
        report.push(field, format!("{} is required in: {}", label, missing));
    }
}

fn require_map(
    report: &mut ValidationReport,
    field: FieldId,
    label: &str,
    value: &LocalizedMap,
    languages: &[Language],
) {
    require_text(report, field, label, &value.to_localized_text(), languages);
}

fn require_flag(report: &mut ValidationReport, field: FieldId, label: &str, value: &FlagInput) {
    if value.coerce().is_none() {
        report.push(field, format!("{} must be answered yes or no", label));
    }
}

fn missing_languages(value: &LocalizedText, languages: &[Language]) -> String {
    languages
        .iter()
        .filter(|language| value.get(**language).trim().is_empty())
        .map(|language| language.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DistanceEntry;

    fn settings() -> WizardSettings {
        WizardSettings::default().with_current_year(2026)
    }

    fn has_error(report: &ValidationReport, message: &str) -> bool {
        report.errors.iter().any(|error| error == message)
    }

    #[test]
    fn report_tracks_fields_once() {
        let mut report = ValidationReport::new();
        report.push(FieldId::Price, "Price in USD must be greater than 0");
        report.push(FieldId::Price, "Price in TRY must be greater than 0");
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.invalid_fields.len(), 1);
        assert!(!report.is_valid());
    }

    #[test]
    fn empty_basics_lists_every_missing_field() {
        let report = validate_basics(&ListingDraft::new(), &settings());
        for field in [
            FieldId::ListingType,
            FieldId::PropertyType,
            FieldId::HousingCategory,
            FieldId::Title,
            FieldId::Description,
        ] {
            assert!(report.has_field(field), "missing {field}");
        }
        assert!(has_error(&report, "Title is required in: English, Russian"));
    }

    #[test]
    fn land_skips_housing_category() {
        let mut draft = ListingDraft::new();
        draft.set_property_kind(PropertyKind::Land, "Участок");
        let report = validate_basics(&draft, &settings());
        assert!(!report.has_field(FieldId::HousingCategory));
        assert!(!report.has_field(FieldId::PropertyType));
    }

    #[test]
    fn unset_room_count_is_required() {
        let report = validate_residential(&ListingDraft::new(), &settings());
        assert!(report.has_field(FieldId::RoomCount));
        assert!(has_error(&report, "Room count is required"));
    }

    #[test]
    fn build_year_range_uses_settings() {
        let mut draft = ListingDraft::new();
        draft.residential.build_year = 2030;
        let report = validate_residential(&draft, &settings());
        let expected = "Build year must be between 1800 and 2026";
        assert!(has_error(&report, expected));
    }

    fn distance(type_id: &str, distance: f64) -> DistanceEntry {
        DistanceEntry {
            type_id: type_id.into(),
            distance,
        }
    }

    #[test]
    fn duplicate_and_negative_distances() {
        let mut draft = ListingDraft::new();
        draft.selection.distances = vec![
            distance("sea", 200.0),
            distance("sea", -1.0),
            distance(" ", 10.0),
        ];
        let report = validate_features(&draft);
        assert_eq!(report.errors.len(), 3);
        assert!(report.has_field(FieldId::Distance(1)));
        assert!(report.has_field(FieldId::Distance(2)));
    }

    #[test]
    fn video_url_must_be_http() {
        let mut draft = ListingDraft::new();
        draft.media.images = vec!["a".into(), "b".into(), "c".into()];
        draft.media.video_url = Some("ftp://example.com/v.mp4".into());
        let report = validate_media(&draft, &[], &settings());
        let fields: Vec<_> = report.invalid_fields.iter().copied().collect();
        assert_eq!(fields, vec![FieldId::VideoUrl]);
    }

    #[test]
    fn field_ids_render_keys() {
        assert_eq!(FieldId::RoomCount.to_string(), "roomCount");
        assert_eq!(FieldId::DocumentFile(2).to_string(), "documents[2].fileUrl");
        assert_eq!(FieldId::LandArea.as_str(), "area");
        assert_eq!(FieldId::Distance(4).as_str(), "distances");
    }
}
