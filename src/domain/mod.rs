pub mod draft;
pub mod property;

pub use draft::{
    AddressDetails, CommercialDetails, DistanceEntry, FeatureSelection, FlagInput, LandDetails,
    ListingDocument, ListingDraft, MediaDetails, PricingDetails, ResidentialDetails, UNSET_COUNT,
};
pub use property::{ListingMode, PropertyKind};
