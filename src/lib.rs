use wasm_bindgen::prelude::*;
use serde::Deserialize;
use log::Level;
use wasm_bindgen_futures::future_to_promise;
use wasm_bindgen_futures::js_sys;

use geojson::GeoJson;

pub mod demand;
pub mod directions;
pub mod error;
pub mod map_export;
pub mod osm_fetcher;
pub mod pharmacies;
pub mod ranking;
pub mod types;

pub use self::error::{LocatorError, Result};
pub use self::ranking::{distance_km, nearest_within, rank_by_distance, within_radius};
pub use self::types::{BoundingCoordinates, GeoPoint, PointOfInterest, RankedPoint};

use self::demand::{medicine_spikes, InventoryReading};
use self::directions::{directions_for, Platform};
use self::map_export::ranked_feature_collection;
use self::osm_fetcher::{fetch_pharmacies as fetch_overpass_pharmacies, DEFAULT_OVERPASS_URL};

#[derive(Deserialize)]
pub struct JsLocation {
    pub lat: f64,
    pub lng: f64,
}

impl TryFrom<&JsLocation> for GeoPoint {
    type Error = LocatorError;

    fn try_from(location: &JsLocation) -> Result<Self> {
        GeoPoint::new(location.lat, location.lng)
    }
}

#[derive(Deserialize)]
pub struct RankParams {
    pub reference: JsLocation,
    #[serde(default)]
    pub radius_km: Option<f64>,
    /// Falls back to the bundled catalogue.
    #[serde(default)]
    pub points: Option<Vec<PointOfInterest>>,
}

#[derive(Deserialize)]
pub struct FetchParams {
    pub reference: JsLocation,
    pub view_area: BoundingCoordinates,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,
}

fn default_overpass_url() -> String {
    DEFAULT_OVERPASS_URL.to_string()
}

#[wasm_bindgen]
pub fn rust_init() -> std::result::Result<(), JsValue> {
    console_log::init_with_level(Level::Error).map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::info!("Logger initialized from library");
    Ok(())
}

fn ranked_geojson(reference: &GeoPoint, points: &[PointOfInterest], radius_km: Option<f64>) -> Result<String> {
    let ranked = match radius_km {
        Some(radius_km) => nearest_within(reference, points, radius_km)?,
        None => rank_by_distance(reference, points),
    };
    let geojson = GeoJson::FeatureCollection(ranked_feature_collection(reference, &ranked, radius_km));
    let geojson_str = serde_json::to_string(&geojson)?;
    log::info!("GeoJson created for {} points", ranked.len());
    Ok(geojson_str)
}

/// Ranks the given (or bundled) points around the reference and returns GeoJSON.
pub fn rank_to_geojson(params_json: &str) -> Result<String> {
    let params: RankParams = serde_json::from_str(params_json)?;
    let reference = GeoPoint::try_from(&params.reference)?;
    match &params.points {
        Some(points) => ranked_geojson(&reference, points, params.radius_km),
        None => ranked_geojson(&reference, pharmacies::catalogue(), params.radius_km),
    }
}

/// Fetches live pharmacies from Overpass for the view area, then ranks them.
pub async fn fetch_and_rank_async(params_json: &str) -> Result<String> {
    let params: FetchParams = serde_json::from_str(params_json)?;
    let reference = GeoPoint::try_from(&params.reference)?;
    let client = reqwest::Client::new();
    let points = fetch_overpass_pharmacies(&client, &params.overpass_url, &params.view_area).await?;
    log::info!("Fetch successful: {} pharmacies", points.len());
    ranked_geojson(&reference, &points, params.radius_km)
}

/// Spike report for a JSON array of inventory readings.
pub fn spikes_to_json(readings_json: &str) -> Result<String> {
    let readings: Vec<InventoryReading> = serde_json::from_str(readings_json)?;
    Ok(serde_json::to_string(&medicine_spikes(&readings))?)
}

#[wasm_bindgen]
pub fn rank_pharmacies(params: String) -> std::result::Result<String, JsValue> {
    rank_to_geojson(&params).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn pharmacy_catalogue() -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&pharmacies::catalogue()).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn directions_link(pharmacy_id: String, platform: String) -> std::result::Result<String, JsValue> {
    let platform: Platform = serde_json::from_value(serde_json::Value::String(platform))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    directions_for(&pharmacy_id, platform).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn demand_spikes(readings: String) -> std::result::Result<String, JsValue> {
    spikes_to_json(&readings).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn fetch_pharmacies(params: String) -> js_sys::Promise {
    future_to_promise(async move {
        match fetch_and_rank_async(&params).await {
            Ok(geojson_str) => Ok(JsValue::from_str(&geojson_str)),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    })
}
