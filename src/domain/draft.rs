//! In-progress listing aggregate edited by the wizard.
//!
//! The draft keeps every branch's details at once; only the branch selected
//! by the property-type label is validated and submitted.

use serde::{Deserialize, Serialize};

use crate::address::AddressParts;
use crate::currency::{CurrencyCode, PriceList};
use crate::domain::property::PropertyKind;
use crate::localized::{LocalizedMap, LocalizedText};
use crate::map::Coordinates;

/// Marker for a count the user has not filled in yet.
pub const UNSET_COUNT: i32 = -1;

/// Boolean answer that some forms keep as the text `"true"` / `"false"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FlagInput {
    Bool(bool),
    Text(String),
}

impl Default for FlagInput {
    fn default() -> Self {
        FlagInput::Bool(false)
    }
}

impl FlagInput {
    /// `None` when the text is neither `"true"` nor `"false"`.
    pub fn coerce(&self) -> Option<bool> {
        match self {
            FlagInput::Bool(value) => Some(*value),
            FlagInput::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }
}

impl From<bool> for FlagInput {
    fn from(value: bool) -> Self {
        FlagInput::Bool(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResidentialDetails {
    pub gross_area: f64,
    pub net_area: f64,
    pub room_count: i32,
    pub bathroom_count: i32,
    pub balcony_count: i32,
    pub floor_count: i32,
    pub floor_number: Option<i32>,
    pub build_year: i32,
    pub building_age: i32,
    pub kitchen_type: LocalizedText,
    pub heating_type: LocalizedText,
    pub source: LocalizedText,
    pub usage_status: LocalizedMap,
    pub deed_status: LocalizedMap,
    pub furnished: FlagInput,
    pub exchangeable: FlagInput,
}

impl Default for ResidentialDetails {
    fn default() -> Self {
        Self {
            gross_area: 0.0,
            net_area: 0.0,
            room_count: UNSET_COUNT,
            bathroom_count: UNSET_COUNT,
            balcony_count: UNSET_COUNT,
            floor_count: UNSET_COUNT,
            floor_number: None,
            build_year: UNSET_COUNT,
            building_age: UNSET_COUNT,
            kitchen_type: LocalizedText::default(),
            heating_type: LocalizedText::default(),
            source: LocalizedText::default(),
            usage_status: LocalizedMap::default(),
            deed_status: LocalizedMap::default(),
            furnished: FlagInput::default(),
            exchangeable: FlagInput::default(),
        }
    }
}

impl ResidentialDetails {
    /// Building age as entered, or derived from the build year.
    pub fn effective_building_age(&self, current_year: i32) -> Option<i32> {
        if self.building_age >= 0 {
            Some(self.building_age)
        } else if self.build_year > 0 && self.build_year <= current_year {
            Some(current_year - self.build_year)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CommercialDetails {
    pub gross_area: f64,
    pub net_area: f64,
    pub room_count: i32,
    pub building_age: i32,
    pub heating_type: LocalizedText,
    pub usage_status: LocalizedMap,
    pub deed_status: LocalizedMap,
    pub exchangeable: FlagInput,
}

impl Default for CommercialDetails {
    fn default() -> Self {
        Self {
            gross_area: 0.0,
            net_area: 0.0,
            room_count: UNSET_COUNT,
            building_age: UNSET_COUNT,
            heating_type: LocalizedText::default(),
            usage_status: LocalizedMap::default(),
            deed_status: LocalizedMap::default(),
            exchangeable: FlagInput::Text(String::new()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LandDetails {
    pub area: f64,
    pub block_number: String,
    pub parcel_number: String,
    pub sheet_number: String,
    pub zoning_status: LocalizedMap,
    pub deed_status: LocalizedMap,
    pub general_features: LocalizedMap,
    pub exchangeable: FlagInput,
}

impl Default for LandDetails {
    fn default() -> Self {
        Self {
            area: 0.0,
            block_number: String::new(),
            parcel_number: String::new(),
            sheet_number: String::new(),
            zoning_status: LocalizedMap::default(),
            deed_status: LocalizedMap::default(),
            general_features: LocalizedMap::default(),
            exchangeable: FlagInput::Text(String::new()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingDetails {
    pub price: PriceList,
    pub dues: PriceList,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressDetails {
    pub country: LocalizedText,
    pub city: LocalizedText,
    pub state: LocalizedText,
    pub neighborhood: LocalizedText,
    pub street: LocalizedText,
    pub building_number: String,
    pub apartment_number: String,
    pub postal_code: String,
    pub coordinates: Coordinates,
}

impl AddressDetails {
    pub fn display_parts(&self) -> AddressParts {
        AddressParts {
            state: Some(self.state.clone()),
            city: Some(self.city.clone()),
            street: Some(self.street.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistanceEntry {
    pub type_id: String,
    pub distance: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureSelection {
    pub features: Vec<String>,
    pub infrastructures: Vec<String>,
    pub views: Vec<String>,
    pub distances: Vec<DistanceEntry>,
}

impl FeatureSelection {
    /// Adds or removes `id` from `list`, keeping selection order.
    pub fn toggle(list: &mut Vec<String>, id: &str) {
        if let Some(index) = list.iter().position(|existing| existing == id) {
            list.remove(index);
        } else {
            list.push(id.to_string());
        }
    }

    /// Sets the distance for `type_id`, replacing an existing entry.
    pub fn set_distance(&mut self, type_id: &str, distance: f64) {
        match self.distances.iter_mut().find(|entry| entry.type_id == type_id) {
            Some(entry) => entry.distance = distance,
            None => self.distances.push(DistanceEntry {
                type_id: type_id.to_string(),
                distance,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaDetails {
    pub images: Vec<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingDocument {
    pub name: LocalizedText,
    pub file_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingDraft {
    pub id: Option<String>,
    pub listing_type: LocalizedText,
    pub property_type: LocalizedText,
    pub housing_category: LocalizedText,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub residential: ResidentialDetails,
    pub commercial: CommercialDetails,
    pub land: LandDetails,
    pub pricing: PricingDetails,
    pub address: AddressDetails,
    pub selection: FeatureSelection,
    pub media: MediaDetails,
    pub documents: Vec<ListingDocument>,
}

impl ListingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Branch selected by the English property-type label.
    pub fn property_kind(&self) -> Option<PropertyKind> {
        PropertyKind::from_label(&self.property_type.en)
    }

    pub fn set_property_kind(&mut self, kind: PropertyKind, secondary_label: impl Into<String>) {
        self.property_type = LocalizedText::new(kind.label(), secondary_label);
    }

    pub fn set_price(&mut self, currency: impl Into<CurrencyCode>, amount: f64) {
        self.pricing.price.set(currency, amount);
    }

    pub fn set_dues(&mut self, currency: impl Into<CurrencyCode>, amount: f64) {
        self.pricing.dues.set(currency, amount);
    }

    pub fn add_document(&mut self, name: LocalizedText, file_url: impl Into<String>) {
        self.documents.push(ListingDocument {
            name,
            file_url: file_url.into(),
        });
    }

    pub fn remove_image(&mut self, url: &str) -> bool {
        let before = self.media.images.len();
        self.media.images.retain(|image| image != url);
        self.media.images.len() != before
    }
}
