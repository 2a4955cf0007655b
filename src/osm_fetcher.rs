use reqwest::Client;
use serde_json::Value;

use crate::error::{LocatorError, Result};
use crate::pharmacies::pharmacy;
use crate::types::{BoundingCoordinates, GeoPoint, PointOfInterest};

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Overpass QL for every pharmacy inside the box. Ways and relations come back with a `center`.
pub fn pharmacy_query(view_area: &BoundingCoordinates) -> String {
    format!(
        r#"
    [out:json][timeout:60];
    (
       nwr["amenity"="pharmacy"]({}, {}, {}, {});
    );
    out center;
    "#,
        view_area.south_latitude,
        view_area.west_longitude,
        view_area.north_latitude,
        view_area.east_longitude
    )
}

fn element_coordinate(element: &Value) -> Option<(f64, f64)> {
    let source = match element["type"].as_str() {
        Some("node") => element,
        _ => &element["center"],
    };
    Some((source["lat"].as_f64()?, source["lon"].as_f64()?))
}

/// Turns an Overpass JSON response into pharmacies.
pub fn parse_pharmacies(json: &Value) -> Result<Vec<PointOfInterest>> {
    let elements = json
        .get("elements")
        .and_then(Value::as_array)
        .ok_or_else(|| LocatorError::UnexpectedResponse("missing elements array".into()))?;

    let mut pharmacies = Vec::with_capacity(elements.len());
    for element in elements {
        match element["type"].as_str() {
            Some("node") | Some("way") | Some("relation") => {}
            other => {
                return Err(LocatorError::UnexpectedResponse(format!(
                    "unknown element type {:?}",
                    other
                )))
            }
        }
        let id = match element["id"].as_u64() {
            Some(id) => id,
            None => return Err(LocatorError::UnexpectedResponse("element without id".into())),
        };
        let Some((latitude, longitude)) = element_coordinate(element) else {
            log::warn!("Element {} has no coordinate, skipping", id);
            continue;
        };
        let coordinate = GeoPoint::new(latitude, longitude)?;
        let name = element.get("tags").and_then(|tags| tags["name"].as_str());
        pharmacies.push(pharmacy(id.to_string(), name, coordinate));
    }
    log::info!("Parsed {} pharmacies", pharmacies.len());
    Ok(pharmacies)
}

async fn fetch_pharmacy_json(client: &Client, overpass_url: &str, view_area: &BoundingCoordinates) -> Result<Value> {
    let response = client
        .post(overpass_url)
        .body(pharmacy_query(view_area))
        .send()
        .await?
        .error_for_status()?
        .json::<Value>()
        .await?;
    Ok(response)
}

/// Queries Overpass for the pharmacies inside `view_area`.
pub async fn fetch_pharmacies(
    client: &Client,
    overpass_url: &str,
    view_area: &BoundingCoordinates,
) -> Result<Vec<PointOfInterest>> {
    view_area.validate()?;
    let json = fetch_pharmacy_json(client, overpass_url, view_area).await?;
    parse_pharmacies(&json)
}
