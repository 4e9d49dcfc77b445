use evplace::placement::{
    DemandCenter, PlacementKind, Station, default_demand_centers, reward, score_placement,
};
use evplace::test_utils::{TestCase, run_table_tests};

fn station(slot: usize, lat: f64, lon: f64) -> Station {
    Station {
        station_id: format!("ST{:02}", slot + 1),
        lat,
        lon,
        name: format!("Test Station {}", slot + 1),
        kind: PlacementKind::Random,
    }
}

/// Degrees of latitude per kilometre on the haversine sphere.
const DEG_PER_KM: f64 = 1.0 / (6371.0 * std::f64::consts::PI / 180.0);

fn depot() -> DemandCenter {
    DemandCenter {
        label: "Depot".to_string(),
        lat: 20.30,
        lon: 85.80,
        weight: 1.0,
    }
}

/// Station `km` due north of `center`.
fn north_of(slot: usize, center: &DemandCenter, km: f64) -> Station {
    station(slot, center.lat + km * DEG_PER_KM, center.lon)
}

fn on_centers(centers: &[DemandCenter]) -> Vec<Station> {
    centers
        .iter()
        .enumerate()
        .map(|(slot, center)| station(slot, center.lat, center.lon))
        .collect()
}

#[test]
fn coverage_by_layout() -> Result<(), String> {
    let centers = default_demand_centers();
    let cases = vec![
        TestCase {
            name: "one station per center",
            input: on_centers(&centers),
            expected: 100,
            should_panic: false,
        },
        TestCase {
            name: "single far station",
            input: vec![station(0, 20.39, 85.71)],
            expected: 0,
            should_panic: false,
        },
        TestCase {
            name: "city center only",
            input: vec![station(0, 20.2961, 85.8245)],
            expected: 20,
            should_panic: false,
        },
    ];

    run_table_tests(cases, |stations| {
        let breakdown = score_placement(&stations, &default_demand_centers());
        (breakdown.coverage * 100.0).round() as i64
    })?;
    Ok(())
}

#[test]
fn coverage_radius_is_two_kilometres() -> Result<(), String> {
    let center = depot();
    let cases = vec![
        TestCase {
            name: "1.9 km away is covered",
            input: 1.9,
            expected: 100,
            should_panic: false,
        },
        TestCase {
            name: "1.99 km away is covered",
            input: 1.99,
            expected: 100,
            should_panic: false,
        },
        TestCase {
            name: "2.01 km away is not covered",
            input: 2.01,
            expected: 0,
            should_panic: false,
        },
        TestCase {
            name: "2.1 km away is not covered",
            input: 2.1,
            expected: 0,
            should_panic: false,
        },
    ];

    run_table_tests(cases, |km| {
        let breakdown = score_placement(&[north_of(0, &center, km)], std::slice::from_ref(&center));
        (breakdown.coverage * 100.0).round() as i64
    })?;
    Ok(())
}

#[test]
fn nearby_stations_cover_every_center() {
    let centers = default_demand_centers();
    let offset: Vec<Station> = centers
        .iter()
        .enumerate()
        .map(|(slot, center)| north_of(slot, center, 1.9))
        .collect();
    let breakdown = score_placement(&offset, &centers);
    assert!((breakdown.coverage - 1.0).abs() < f64::EPSILON);
    assert!(breakdown.avg_distance > 0.0);
}

#[test]
fn stations_on_every_center_beat_a_single_station() {
    let centers = default_demand_centers();
    let full = reward(&on_centers(&centers), &centers);
    let single = reward(&[station(0, 20.2961, 85.8245)], &centers);
    assert!(full > single, "{full} <= {single}");
}

#[test]
fn empty_layout_gets_sentinel() {
    assert!((reward(&[], &default_demand_centers()) - -1000.0).abs() < f64::EPSILON);
}

#[test]
fn reward_combines_components() {
    let centers = default_demand_centers();
    let stations = on_centers(&centers);
    let breakdown = score_placement(&stations, &centers);
    let expected =
        -10.0 * breakdown.avg_distance + 100.0 * breakdown.coverage + 50.0 * breakdown.spread;
    assert!((breakdown.reward - expected).abs() < 1e-9);
    assert!(breakdown.avg_distance.abs() < 1e-9);
}
