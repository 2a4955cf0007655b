use crate::error::{LocatorError, Result};
use crate::types::{GeoPoint, PointOfInterest, RankedPoint};

/// Mean Earth radius used by every distance in this crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points (Haversine), in kilometres.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let hav = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push near-antipodal values just past 1.
    let hav = hav.clamp(0.0, 1.0);
    let c = 2.0 * hav.sqrt().atan2((1.0 - hav).sqrt());
    EARTH_RADIUS_KM * c
}

/// Every point annotated with its distance from `reference`, nearest first.
/// Equidistant points keep their input order.
pub fn rank_by_distance(reference: &GeoPoint, points: &[PointOfInterest]) -> Vec<RankedPoint> {
    let mut ranked: Vec<RankedPoint> = points
        .iter()
        .map(|point| RankedPoint {
            point: point.clone(),
            distance_km: distance_km(reference, &point.coordinate),
        })
        .collect();
    // sort_by is stable, which gives the tie-break.
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    log::debug!("Ranked {} points", ranked.len());
    ranked
}

fn check_radius(radius_km: f64) -> Result<()> {
    if radius_km.is_nan() || radius_km < 0.0 {
        return Err(LocatorError::InvalidArgument(format!(
            "radius must be non-negative, got {}",
            radius_km
        )));
    }
    Ok(())
}

/// Points no further than `radius_km` from `reference`, in input order.
pub fn within_radius(
    reference: &GeoPoint,
    points: &[PointOfInterest],
    radius_km: f64,
) -> Result<Vec<PointOfInterest>> {
    check_radius(radius_km)?;
    Ok(points
        .iter()
        .filter(|point| distance_km(reference, &point.coordinate) <= radius_km)
        .cloned()
        .collect())
}

/// Ranked output cut at `radius_km`, so each distance is computed once.
pub fn nearest_within(
    reference: &GeoPoint,
    points: &[PointOfInterest],
    radius_km: f64,
) -> Result<Vec<RankedPoint>> {
    check_radius(radius_km)?;
    let mut ranked = rank_by_distance(reference, points);
    let cut = ranked.partition_point(|r| r.distance_km <= radius_km);
    ranked.truncate(cut);
    log::info!("{} points within {} km", ranked.len(), radius_km);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(id: &str, latitude: f64, longitude: f64) -> PointOfInterest {
        PointOfInterest {
            id: id.to_string(),
            name: id.to_string(),
            title: id.to_string(),
            description: None,
            coordinate: GeoPoint::new(latitude, longitude).unwrap(),
        }
    }

    fn panaji() -> GeoPoint {
        GeoPoint::new(15.4909, 73.8278).unwrap()
    }

    fn goa_points() -> Vec<PointOfInterest> {
        vec![point("A", 15.4985961, 73.8274921), point("B", 15.4808305, 73.8119033)]
    }

    fn reference_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
        let ap = haversine_rs::point::Point { latitude: a.latitude(), longitude: a.longitude() };
        let bp = haversine_rs::point::Point { latitude: b.latitude(), longitude: b.longitude() };
        haversine_rs::distance(ap, bp, haversine_rs::units::Unit::Meters) / 1000.0
    }

    fn ids(points: &[PointOfInterest]) -> Vec<&str> {
        points.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_goa_distances_match_reference() {
        let reference = panaji();
        for p in goa_points() {
            let ours = distance_km(&reference, &p.coordinate);
            let theirs = reference_km(&reference, &p.coordinate);
            assert!((ours - theirs).abs() <= theirs * 0.05, "{}: {} vs {}", p.id, ours, theirs);
        }
        let a = distance_km(&reference, &goa_points()[0].coordinate);
        let b = distance_km(&reference, &goa_points()[1].coordinate);
        assert!(a > 0.8 && a < 0.9, "A at {}", a);
        assert!(b > 1.8 && b < 2.2, "B at {}", b);
    }

    #[test]
    fn test_goa_ranking_order() {
        let points = goa_points();
        // Reverse the input so the sort has something to do.
        let reversed: Vec<_> = points.iter().rev().cloned().collect();
        let ranked = rank_by_distance(&panaji(), &reversed);
        let order: Vec<&str> = ranked.iter().map(|r| r.point.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_goa_within_one_km() {
        let found = within_radius(&panaji(), &goa_points(), 1.0).unwrap();
        assert_eq!(ids(&found), vec!["A"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(rank_by_distance(&panaji(), &[]).is_empty());
        assert!(within_radius(&panaji(), &[], 5.0).unwrap().is_empty());
        assert!(nearest_within(&panaji(), &[], 5.0).unwrap().is_empty());
    }

    #[test]
    fn test_negative_radius_rejected() {
        assert!(matches!(
            within_radius(&panaji(), &goa_points(), -0.1),
            Err(LocatorError::InvalidArgument(_))
        ));
        assert!(within_radius(&panaji(), &goa_points(), f64::NAN).is_err());
        assert!(nearest_within(&panaji(), &goa_points(), -1.0).is_err());
    }

    #[test]
    fn test_zero_radius_keeps_only_exact_matches() {
        let reference = panaji();
        let mut points = goa_points();
        points.push(point("here", 15.4909, 73.8278));
        let found = within_radius(&reference, &points, 0.0).unwrap();
        assert_eq!(ids(&found), vec!["here"]);
        assert!(within_radius(&reference, &goa_points(), 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_equidistant_points_keep_input_order() {
        let reference = GeoPoint::new(0.0, 0.0).unwrap();
        // Mirror images across the equator and the meridian.
        let points = vec![
            point("north", 1.0, 0.0),
            point("east", 0.0, 1.0),
            point("south", -1.0, 0.0),
            point("west", 0.0, -1.0),
            point("origin", 0.0, 0.0),
        ];
        let ranked = rank_by_distance(&reference, &points);
        let order: Vec<&str> = ranked.iter().map(|r| r.point.id.as_str()).collect();
        assert_eq!(order[0], "origin");
        let north = order.iter().position(|id| *id == "north").unwrap();
        let south = order.iter().position(|id| *id == "south").unwrap();
        let east = order.iter().position(|id| *id == "east").unwrap();
        let west = order.iter().position(|id| *id == "west").unwrap();
        assert!(north < south);
        assert!(east < west);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let points = vec![point("A", 15.5, 73.8), point("A", 15.5, 73.8)];
        assert_eq!(rank_by_distance(&panaji(), &points).len(), 2);
    }

    #[test]
    fn test_nearest_within_is_ranked_and_cut() {
        let mut points = goa_points();
        points.insert(0, point("far", 15.5332245, 73.8241067));
        let ranked = nearest_within(&panaji(), &points, 2.5).unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.point.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_antipodal_distance_is_half_circumference() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.0, 180.0).unwrap();
        let d = distance_km(&a, &b);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    fn arb_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon).unwrap())
    }

    fn arb_pois() -> impl Strategy<Value = Vec<PointOfInterest>> {
        prop::collection::vec(arb_point(), 0..40).prop_map(|coords| {
            coords
                .into_iter()
                .enumerate()
                .map(|(i, coordinate)| PointOfInterest {
                    id: i.to_string(),
                    name: format!("poi {}", i),
                    title: format!("poi {}", i),
                    description: None,
                    coordinate,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn distance_to_self_is_zero(a in arb_point()) {
            prop_assert_eq!(distance_km(&a, &a), 0.0);
        }

        #[test]
        fn distance_is_symmetric_and_non_negative(a in arb_point(), b in arb_point()) {
            let ab = distance_km(&a, &b);
            let ba = distance_km(&b, &a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0));
        }

        #[test]
        fn ranking_preserves_length_and_sorts(reference in arb_point(), points in arb_pois()) {
            let ranked = rank_by_distance(&reference, &points);
            prop_assert_eq!(ranked.len(), points.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].distance_km <= pair[1].distance_km);
            }
        }

        #[test]
        fn ranking_is_deterministic(reference in arb_point(), points in arb_pois()) {
            let first = rank_by_distance(&reference, &points);
            let second = rank_by_distance(&reference, &points);
            let first: Vec<_> = first.iter().map(|r| (r.point.id.clone(), r.distance_km)).collect();
            let second: Vec<_> = second.iter().map(|r| (r.point.id.clone(), r.distance_km)).collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn nearest_within_agrees_with_filter(
            reference in arb_point(),
            points in arb_pois(),
            radius in 0.0f64..20_000.0,
        ) {
            let filtered = within_radius(&reference, &points, radius).unwrap();
            let ranked = nearest_within(&reference, &points, radius).unwrap();
            prop_assert_eq!(filtered.len(), ranked.len());
        }
    }
}
