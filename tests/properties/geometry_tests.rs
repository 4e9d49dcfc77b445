use proptest::prelude::*;

use evplace::geo::{BoundingBox, Coordinate, EARTH_RADIUS_KM, haversine_km};
use evplace::placement::{
    COVERAGE_RADIUS_KM, PlacementKind, Station, default_demand_centers, score_placement,
};

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-89.0f64..89.0, -179.0f64..179.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
}

/// Point roughly `km` from `origin` along `bearing` (radians, 0 = north).
fn offset(origin: Coordinate, km: f64, bearing: f64) -> Coordinate {
    let deg_per_km = 180.0 / (std::f64::consts::PI * EARTH_RADIUS_KM);
    let lat = origin.lat + km * bearing.cos() * deg_per_km;
    let lon = origin.lon + km * bearing.sin() * deg_per_km / origin.lat.to_radians().cos();
    Coordinate::new(lat, lon)
}

proptest! {
    #[test]
    fn stations_within_radius_cover_every_center(
        offsets in prop::collection::vec((0.0f64..1.9, 0.0f64..std::f64::consts::TAU), 5),
    ) {
        let centers = default_demand_centers();
        let stations: Vec<Station> = centers
            .iter()
            .zip(&offsets)
            .enumerate()
            .map(|(slot, (center, &(km, bearing)))| {
                let at = offset(center.coordinate(), km, bearing);
                Station {
                    station_id: format!("ST{:02}", slot + 1),
                    lat: at.lat,
                    lon: at.lon,
                    name: format!("Nearby Station {}", slot + 1),
                    kind: PlacementKind::Random,
                }
            })
            .collect();
        for (station, center) in stations.iter().zip(&centers) {
            prop_assert!(haversine_km(station.coordinate(), center.coordinate()) < COVERAGE_RADIUS_KM);
        }
        let breakdown = score_placement(&stations, &centers);
        prop_assert!((breakdown.coverage - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn haversine_is_symmetric(a in coordinate(), b in coordinate()) {
        prop_assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn haversine_of_point_to_itself_is_zero(a in coordinate()) {
        prop_assert!(haversine_km(a, a).abs() < 1e-9);
    }

    #[test]
    fn haversine_is_bounded(a in coordinate(), b in coordinate()) {
        let distance = haversine_km(a, b);
        prop_assert!(distance >= 0.0);
        prop_assert!(distance <= std::f64::consts::PI * 6371.0 + 1e-6);
    }

    #[test]
    fn clamp_lands_inside(lat in -90.0f64..90.0, lon in -180.0f64..180.0) {
        let bounds = BoundingBox::new(20.20, 20.40, 85.70, 85.95).unwrap();
        prop_assert!(bounds.contains(bounds.clamp(Coordinate::new(lat, lon))));
    }
}
