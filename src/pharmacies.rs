//! Bundled pharmacy data for the Panaji (Goa) area, keyed by OpenStreetMap node id.

use std::sync::OnceLock;

use crate::error::{LocatorError, Result};
use crate::ranking::within_radius;
use crate::types::{GeoPoint, PointOfInterest};

pub const DEFAULT_RADIUS_KM: f64 = 5.0;

const UNNAMED_NAME: &str = "Unnamed Pharmacy";
const UNNAMED_TITLE: &str = "Pharmacy";
const DESCRIPTION: &str = "Pharmacy nearby";

// (id, name, latitude, longitude)
const BUNDLED: &[(&str, Option<&str>, f64, f64)] = &[
    ("2100055211", Some("Farmacia Salcete"), 15.4985961, 73.8274921),
    ("3250334427", Some("Roger's Healthcare"), 15.4808305, 73.8119033),
    ("3250334861", None, 15.4756728, 73.8121551),
    ("3250335692", None, 15.4792457, 73.8121499),
    ("4081440470", None, 15.5007457, 73.8260766),
    ("4258764890", Some("Unity medical stores"), 15.4848807, 73.8115219),
    ("4259807597", Some("united pharmacy"), 15.460546, 73.8041),
    ("4259822591", Some("Marvel Pharmacy"), 15.462613, 73.80554),
    ("4494012690", Some("Symphony"), 15.5271397, 73.8264713),
    ("4494043091", Some("Perpetual"), 15.52709, 73.8264824),
    ("4524300541", Some("Tapasvi"), 15.5255049, 73.8264942),
    ("4537380492", Some("Rock Of Ages Medical Stores"), 15.485703, 73.853645),
    ("4561922823", Some("Pharmax"), 15.4882918, 73.8207687),
    ("4561954065", Some("Taj Medical Stores"), 15.4950113, 73.8209768),
    ("4745150126", Some("Madonna"), 15.4695148, 73.84654),
    ("6639495985", Some("Matrix"), 15.4798865, 73.8142224),
    ("7968024585", Some("Neha"), 15.4937544, 73.8303598),
    ("12596558808", Some("Wellness forever"), 15.5332245, 73.8241067),
];

/// Builds a pharmacy entry; unnamed pharmacies get a generic name and title.
pub(crate) fn pharmacy(id: impl Into<String>, name: Option<&str>, coordinate: GeoPoint) -> PointOfInterest {
    PointOfInterest {
        id: id.into(),
        name: name.unwrap_or(UNNAMED_NAME).to_string(),
        title: name.unwrap_or(UNNAMED_TITLE).to_string(),
        description: Some(DESCRIPTION.to_string()),
        coordinate,
    }
}

/// All bundled pharmacies, in their original order.
pub fn catalogue() -> &'static [PointOfInterest] {
    static CATALOGUE: OnceLock<Vec<PointOfInterest>> = OnceLock::new();
    CATALOGUE.get_or_init(|| {
        BUNDLED
            .iter()
            .filter_map(|&(id, name, latitude, longitude)| match GeoPoint::new(latitude, longitude) {
                Ok(coordinate) => Some(pharmacy(id, name, coordinate)),
                Err(e) => {
                    log::error!("Skipping bundled pharmacy {}: {}", id, e);
                    None
                }
            })
            .collect()
    })
}

pub fn by_id(id: &str) -> Option<&'static PointOfInterest> {
    catalogue().iter().find(|p| p.id == id)
}

/// Like [`by_id`] but reports a missing entry as an error.
pub fn require(id: &str) -> Result<&'static PointOfInterest> {
    by_id(id).ok_or_else(|| LocatorError::UnknownPointOfInterest(id.to_string()))
}

/// Bundled pharmacies within `radius_km` of `reference`, in catalogue order.
pub fn near_location(reference: &GeoPoint, radius_km: f64) -> Result<Vec<PointOfInterest>> {
    within_radius(reference, catalogue(), radius_km)
}
