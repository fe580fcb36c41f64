//! Marker centering and grid clustering for the listing map view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `(0, 0)` is what an untouched map picker leaves behind.
    pub fn is_unset(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub label: String,
}

/// Markers that fell into the same grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerCluster {
    pub member_ids: Vec<String>,
    pub center: Coordinates,
}

impl MarkerCluster {
    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.member_ids.len() == 1
    }
}

const WORLD_CELL_DEGREES: f64 = 360.0;
const MAX_ZOOM: u8 = 22;

/// Center of the bounding box around all markers.
pub fn map_center(markers: &[MapMarker]) -> Option<Coordinates> {
    let first = markers.first()?.coordinates;
    let (mut min, mut max) = (first, first);
    for marker in &markers[1..] {
        let point = marker.coordinates;
        min.latitude = min.latitude.min(point.latitude);
        min.longitude = min.longitude.min(point.longitude);
        max.latitude = max.latitude.max(point.latitude);
        max.longitude = max.longitude.max(point.longitude);
    }
    Some(Coordinates::new(
        (min.latitude + max.latitude) / 2.0,
        (min.longitude + max.longitude) / 2.0,
    ))
}

/// Groups markers on a square grid whose cell edge halves with every zoom
/// level. Clusters are ordered by cell and each is centered on the mean
/// position of its members.
pub fn cluster_markers(markers: &[MapMarker], zoom: u8) -> Vec<MarkerCluster> {
    let cell = WORLD_CELL_DEGREES / f64::from(1u32 << zoom.min(MAX_ZOOM));
    let mut cells: BTreeMap<(i64, i64), Vec<&MapMarker>> = BTreeMap::new();
    for marker in markers.iter().filter(|marker| marker.coordinates.in_range()) {
        let row = ((marker.coordinates.latitude + 90.0) / cell).floor() as i64;
        let column = ((marker.coordinates.longitude + 180.0) / cell).floor() as i64;
        cells.entry((row, column)).or_default().push(marker);
    }

    cells
        .into_values()
        .map(|members| {
            let count = members.len() as f64;
            let latitude = members.iter().map(|m| m.coordinates.latitude).sum::<f64>() / count;
            let longitude = members.iter().map(|m| m.coordinates.longitude).sum::<f64>() / count;
            MarkerCluster {
                member_ids: members.iter().map(|m| m.id.clone()).collect(),
                center: Coordinates::new(latitude, longitude),
            }
        })
        .collect()
}
