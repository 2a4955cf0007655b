use std::f64::consts::PI;

use geo::{BoundingRect, LineString, MultiPoint, Point, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{json, Map, Value as JsonValue};

use crate::ranking::EARTH_RADIUS_KM;
use crate::types::{GeoPoint, RankedPoint};

const CIRCLE_STEPS: usize = 36;

/// Polygon approximating the circle of `radius_km` around `center`, counter-clockwise.
pub fn search_circle(center: &GeoPoint, radius_km: f64) -> Polygon<f64> {
    let lat1 = center.latitude().to_radians();
    let lon1 = center.longitude().to_radians();
    let d = radius_km / EARTH_RADIUS_KM;
    let mut ring = Vec::with_capacity(CIRCLE_STEPS);
    // Decreasing bearing walks the ring counterclockwise (right-hand rule).
    for i in (0..CIRCLE_STEPS).rev() {
        let bearing = 2.0 * PI * (i as f64) / (CIRCLE_STEPS as f64);
        let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * d.sin() * lat1.cos())
                .atan2(d.cos() - lat1.sin() * lat2.sin());
        ring.push((lon2.to_degrees(), lat2.to_degrees()));
    }
    // Polygon::new closes the ring.
    Polygon::new(LineString::from(ring), vec![])
}

fn point_feature(point: &GeoPoint, properties: Map<String, JsonValue>) -> Feature {
    let point: Point<f64> = (*point).into();
    Feature {
        geometry: Some(Geometry::new(Value::from(&point))),
        properties: Some(properties),
        ..Default::default()
    }
}

fn ranked_properties(rank: usize, ranked: &RankedPoint) -> Map<String, JsonValue> {
    let mut properties = Map::new();
    properties.insert("id".into(), json!(ranked.point.id));
    properties.insert("name".into(), json!(ranked.point.name));
    properties.insert("title".into(), json!(ranked.point.title));
    properties.insert("description".into(), json!(ranked.point.description));
    properties.insert("rank".into(), json!(rank));
    properties.insert("distance_km".into(), json!(ranked.distance_km));
    properties.insert("distance_label".into(), json!(ranked.distance_label()));
    properties
}

/// Map pins for the ranked points, the reference location, and optionally the search circle.
pub fn ranked_feature_collection(
    reference: &GeoPoint,
    ranked: &[RankedPoint],
    radius_km: Option<f64>,
) -> FeatureCollection {
    let mut features = Vec::with_capacity(ranked.len() + 2);
    let mut extent: Vec<Point<f64>> = Vec::with_capacity(ranked.len() + CIRCLE_STEPS + 2);

    let mut reference_properties = Map::new();
    reference_properties.insert("kind".into(), json!("reference"));
    features.push(point_feature(reference, reference_properties));
    extent.push((*reference).into());

    for (index, r) in ranked.iter().enumerate() {
        let mut properties = ranked_properties(index + 1, r);
        properties.insert("kind".into(), json!("point_of_interest"));
        features.push(point_feature(&r.point.coordinate, properties));
        extent.push(r.point.coordinate.into());
    }

    if let Some(radius_km) = radius_km {
        let circle = search_circle(reference, radius_km);
        extent.extend(circle.exterior().points());
        let mut properties = Map::new();
        properties.insert("kind".into(), json!("search_area"));
        properties.insert("radius_km".into(), json!(radius_km));
        features.push(Feature {
            geometry: Some(Geometry::new(Value::from(&circle))),
            properties: Some(properties),
            ..Default::default()
        });
    }

    // [min_x, min_y, max_x, max_y]
    let bbox = MultiPoint::from(extent)
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

    log::info!("GeoJson collection with {} features", features.len());
    FeatureCollection {
        bbox,
        features,
        foreign_members: None,
    }
}
