use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::error::{LocatorError, Result};

// ** Coordinates **

/// A validated latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for GeoPoint {
    type Error = LocatorError;

    fn try_from(raw: RawLocation) -> Result<Self> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Rejects NaN and anything outside [-90, 90] / [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(LocatorError::InvalidCoordinate { latitude, longitude });
        }
        Ok(GeoPoint { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// GeoJSON position order: `[longitude, latitude]`.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct BoundingCoordinates {
    pub north_latitude: f64,
    pub south_latitude: f64,
    pub east_longitude: f64,
    pub west_longitude: f64,
}

impl BoundingCoordinates {
    pub fn validate(&self) -> Result<()> {
        GeoPoint::new(self.north_latitude, self.east_longitude)?;
        GeoPoint::new(self.south_latitude, self.west_longitude)?;
        if self.south_latitude > self.north_latitude {
            return Err(LocatorError::InvalidArgument(format!(
                "south latitude {} is north of {}",
                self.south_latitude, self.north_latitude
            )));
        }
        Ok(())
    }
}

// ** Points of interest **

/// A named, geocoded location. Identity is `id` alone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub coordinate: GeoPoint,
}

impl PartialEq for PointOfInterest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PointOfInterest {}

impl Hash for PointOfInterest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A point of interest together with its distance from some reference.
#[derive(Clone, Debug, Serialize)]
pub struct RankedPoint {
    pub point: PointOfInterest,
    pub distance_km: f64,
}

impl RankedPoint {
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    // Under a kilometre we show whole metres.
    pub fn distance_label(&self) -> String {
        if self.distance_km < 1.0 {
            format!("{:.0} m", self.distance_km * 1000.0)
        } else {
            format!("{:.1} km", self.distance_km)
        }
    }
}
