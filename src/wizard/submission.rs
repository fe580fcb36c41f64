//! Maps a finished draft onto the request body expected by the listing API
//! and back again for update mode.

use serde::{Deserialize, Serialize};

use crate::currency::PriceList;
use crate::domain::{
    CommercialDetails, DistanceEntry, FlagInput, LandDetails, ListingDocument, ListingDraft,
    PropertyKind, ResidentialDetails, UNSET_COUNT,
};
use crate::errors::{ListingError, Result};
use crate::localized::{LocalizedMap, LocalizedText};
use crate::map::Coordinates;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResidentialPayload {
    pub gross_area: f64,
    pub net_area: f64,
    pub room_count: i32,
    pub bathroom_count: i32,
    pub balcony_count: i32,
    pub floor_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_number: Option<i32>,
    pub build_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_age: Option<i32>,
    pub kitchen_type: LocalizedText,
    pub heating_type: LocalizedText,
    #[serde(default)]
    pub source: LocalizedText,
    pub usage_status: LocalizedText,
    pub deed_status: LocalizedText,
    pub furnished: bool,
    pub exchangeable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommercialPayload {
    pub gross_area: f64,
    pub net_area: f64,
    pub room_count: i32,
    pub building_age: i32,
    pub heating_type: LocalizedText,
    pub usage_status: LocalizedText,
    pub deed_status: LocalizedText,
    pub exchangeable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LandPayload {
    pub area: f64,
    pub block_number: String,
    pub parcel_number: String,
    #[serde(default)]
    pub sheet_number: String,
    pub zoning_status: LocalizedText,
    pub deed_status: LocalizedText,
    #[serde(default)]
    pub general_features: LocalizedText,
    pub exchangeable: bool,
}

/// Request body for listing create and update calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingPayload {
    pub listing_type: LocalizedText,
    pub property_type: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing_category: Option<LocalizedText>,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub price: PriceList,
    #[serde(default)]
    pub dues: PriceList,
    pub country: LocalizedText,
    pub city: LocalizedText,
    pub state: LocalizedText,
    #[serde(default)]
    pub neighborhood: LocalizedText,
    #[serde(default)]
    pub street: LocalizedText,
    #[serde(default)]
    pub building_number: String,
    #[serde(default)]
    pub apartment_number: String,
    #[serde(default)]
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub infrastructures: Vec<String>,
    #[serde(default)]
    pub views: Vec<String>,
    #[serde(default)]
    pub distances: Vec<DistanceEntry>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub documents: Vec<ListingDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residential: Option<ResidentialPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial: Option<CommercialPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land: Option<LandPayload>,
}

impl ListingPayload {
    pub fn property_kind(&self) -> Option<PropertyKind> {
        PropertyKind::from_label(&self.property_type.en)
    }
}

/// Builds the request body. Earlier steps are trusted to have validated
/// their fields; only conversions that cannot proceed are reported.
pub fn assemble(draft: &ListingDraft, current_year: i32) -> Result<ListingPayload> {
    let kind = draft.property_kind().ok_or_else(|| {
        ListingError::InvalidInput(format!(
            "property type `{}` does not select a listing branch",
            draft.property_type.en
        ))
    })?;

    let (residential, commercial, land) = match kind {
        PropertyKind::Residential => (
            Some(residential_payload(&draft.residential, current_year)?),
            None,
            None,
        ),
        PropertyKind::Commercial => (None, Some(commercial_payload(&draft.commercial)?), None),
        PropertyKind::Land => (None, None, Some(land_payload(&draft.land)?)),
    };

    let housing_category = match kind {
        PropertyKind::Land => None,
        _ => Some(draft.housing_category.clone()),
    };

    let address = &draft.address;
    Ok(ListingPayload {
        listing_type: draft.listing_type.clone(),
        property_type: draft.property_type.clone(),
        housing_category,
        title: draft.title.clone(),
        description: draft.description.clone(),
        price: draft.pricing.price.clone(),
        dues: draft.pricing.dues.clone(),
        country: address.country.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        neighborhood: address.neighborhood.clone(),
        street: address.street.clone(),
        building_number: address.building_number.trim().to_string(),
        apartment_number: address.apartment_number.trim().to_string(),
        postal_code: address.postal_code.trim().to_string(),
        latitude: address.coordinates.latitude,
        longitude: address.coordinates.longitude,
        features: draft.selection.features.clone(),
        infrastructures: draft.selection.infrastructures.clone(),
        views: draft.selection.views.clone(),
        distances: draft.selection.distances.clone(),
        images: draft.media.images.clone(),
        video_url: draft
            .media
            .video_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string),
        documents: draft.documents.clone(),
        residential,
        commercial,
        land,
    })
}

/// Rebuilds a draft from a fetched record so the wizard can edit it.
pub fn hydrate(id: impl Into<String>, payload: ListingPayload) -> ListingDraft {
    let mut draft = ListingDraft {
        id: Some(id.into()),
        listing_type: payload.listing_type,
        property_type: payload.property_type,
        housing_category: payload.housing_category.unwrap_or_default(),
        title: payload.title,
        description: payload.description,
        documents: payload.documents,
        ..ListingDraft::default()
    };
    draft.pricing.price = payload.price;
    draft.pricing.dues = payload.dues;

    let address = &mut draft.address;
    address.country = payload.country;
    address.city = payload.city;
    address.state = payload.state;
    address.neighborhood = payload.neighborhood;
    address.street = payload.street;
    address.building_number = payload.building_number;
    address.apartment_number = payload.apartment_number;
    address.postal_code = payload.postal_code;
    address.coordinates = Coordinates::new(payload.latitude, payload.longitude);

    draft.selection.features = payload.features;
    draft.selection.infrastructures = payload.infrastructures;
    draft.selection.views = payload.views;
    draft.selection.distances = payload.distances;
    draft.media.images = payload.images;
    draft.media.video_url = payload.video_url;

    if let Some(details) = payload.residential {
        draft.residential = ResidentialDetails {
            gross_area: details.gross_area,
            net_area: details.net_area,
            room_count: details.room_count,
            bathroom_count: details.bathroom_count,
            balcony_count: details.balcony_count,
            floor_count: details.floor_count,
            floor_number: details.floor_number,
            build_year: details.build_year,
            building_age: details.building_age.unwrap_or(UNSET_COUNT),
            kitchen_type: details.kitchen_type,
            heating_type: details.heating_type,
            source: details.source,
            usage_status: LocalizedMap::from(&details.usage_status),
            deed_status: LocalizedMap::from(&details.deed_status),
            furnished: FlagInput::Bool(details.furnished),
            exchangeable: FlagInput::Bool(details.exchangeable),
        };
    }
    if let Some(details) = payload.commercial {
        draft.commercial = CommercialDetails {
            gross_area: details.gross_area,
            net_area: details.net_area,
            room_count: details.room_count,
            building_age: details.building_age,
            heating_type: details.heating_type,
            usage_status: LocalizedMap::from(&details.usage_status),
            deed_status: LocalizedMap::from(&details.deed_status),
            exchangeable: FlagInput::Text(details.exchangeable.to_string()),
        };
    }
    if let Some(details) = payload.land {
        draft.land = LandDetails {
            area: details.area,
            block_number: details.block_number,
            parcel_number: details.parcel_number,
            sheet_number: details.sheet_number,
            zoning_status: LocalizedMap::from(&details.zoning_status),
            deed_status: LocalizedMap::from(&details.deed_status),
            general_features: LocalizedMap::from(&details.general_features),
            exchangeable: FlagInput::Text(details.exchangeable.to_string()),
        };
    }
    draft
}

fn residential_payload(
    details: &ResidentialDetails,
    current_year: i32,
) -> Result<ResidentialPayload> {
    Ok(ResidentialPayload {
        gross_area: details.gross_area,
        net_area: details.net_area,
        room_count: details.room_count,
        bathroom_count: details.bathroom_count,
        balcony_count: details.balcony_count,
        floor_count: details.floor_count,
        floor_number: details.floor_number,
        build_year: details.build_year,
        building_age: details.effective_building_age(current_year),
        kitchen_type: details.kitchen_type.clone(),
        heating_type: details.heating_type.clone(),
        source: details.source.clone(),
        usage_status: details.usage_status.to_localized_text(),
        deed_status: details.deed_status.to_localized_text(),
        furnished: coerce_flag("furnished", &details.furnished)?,
        exchangeable: coerce_flag("exchangeable", &details.exchangeable)?,
    })
}

fn commercial_payload(details: &CommercialDetails) -> Result<CommercialPayload> {
    Ok(CommercialPayload {
        gross_area: details.gross_area,
        net_area: details.net_area,
        room_count: details.room_count,
        building_age: details.building_age,
        heating_type: details.heating_type.clone(),
        usage_status: details.usage_status.to_localized_text(),
        deed_status: details.deed_status.to_localized_text(),
        exchangeable: coerce_flag("exchangeable", &details.exchangeable)?,
    })
}

fn land_payload(details: &LandDetails) -> Result<LandPayload> {
    Ok(LandPayload {
        area: details.area,
        block_number: details.block_number.trim().to_string(),
        parcel_number: details.parcel_number.trim().to_string(),
        sheet_number: details.sheet_number.trim().to_string(),
        zoning_status: details.zoning_status.to_localized_text(),
        deed_status: details.deed_status.to_localized_text(),
        general_features: details.general_features.to_localized_text(),
        exchangeable: coerce_flag("exchangeable", &details.exchangeable)?,
    })
}

fn coerce_flag(name: &str, value: &FlagInput) -> Result<bool> {
    value.coerce().ok_or_else(|| {
        ListingError::InvalidInput(format!("`{}` must be \"true\" or \"false\"", name))
    })
}
