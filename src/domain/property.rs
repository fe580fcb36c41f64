use std::fmt;

use serde::{Deserialize, Serialize};

/// Mutually exclusive property branches; each selects its own details step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Residential,
    Commercial,
    Land,
}

const RESIDENTIAL_LABELS: &[&str] = &["residential", "house", "housing"];
const COMMERCIAL_LABELS: &[&str] = &["commercial", "work place", "workplace", "work"];
const LAND_LABELS: &[&str] = &["land", "plot"];

impl PropertyKind {
    pub const ALL: [PropertyKind; 3] = [
        PropertyKind::Residential,
        PropertyKind::Commercial,
        PropertyKind::Land,
    ];

    /// Maps the English property-type label onto a branch. Labels come from
    /// the admin-managed category list, so unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
        let normalized = normalized.to_lowercase();
        if RESIDENTIAL_LABELS.contains(&normalized.as_str()) {
            Some(PropertyKind::Residential)
        } else if COMMERCIAL_LABELS.contains(&normalized.as_str()) {
            Some(PropertyKind::Commercial)
        } else if LAND_LABELS.contains(&normalized.as_str()) {
            Some(PropertyKind::Land)
        } else {
            None
        }
    }

    /// Canonical English label written into the draft by the wizard.
    pub fn label(self) -> &'static str {
        match self {
            PropertyKind::Residential => "Residential",
            PropertyKind::Commercial => "Commercial",
            PropertyKind::Land => "Land",
        }
    }

    pub fn known_labels() -> impl Iterator<Item = &'static str> {
        RESIDENTIAL_LABELS
            .iter()
            .chain(COMMERCIAL_LABELS)
            .chain(LAND_LABELS)
            .copied()
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the wizard creates a new listing or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingMode {
    #[default]
    Create,
    Update { id: String },
}

impl ListingMode {
    pub fn listing_id(&self) -> Option<&str> {
        match self {
            ListingMode::Create => None,
            ListingMode::Update { id } => Some(id),
        }
    }
}
