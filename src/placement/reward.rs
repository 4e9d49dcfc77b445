//! Placement scoring.
//!
//! `reward = -10 * avg_distance + 100 * coverage + 50 * spread`
//!
//! - `avg_distance`: weighted distance from each demand center to its nearest
//!   station, summed and divided by the number of centers (km).
//! - `coverage`: fraction of demand centers with a station within
//!   [`COVERAGE_RADIUS_KM`].
//! - `spread`: normalized mean pairwise station distance in `0.0..=1.0`.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{DemandCenter, Station};
use crate::geo::haversine_km;

/// Reward for a placement with no stations.
pub const EMPTY_PLACEMENT_REWARD: f64 = -1000.0;

/// A demand center counts as covered when a station is at most this far away.
pub const COVERAGE_RADIUS_KM: f64 = 2.0;

const DISTANCE_WEIGHT: f64 = 10.0;
const COVERAGE_WEIGHT: f64 = 100.0;
const SPREAD_WEIGHT: f64 = 50.0;

/// Mean pairwise distance below which spread scores zero.
const SPREAD_MIN_KM: f64 = 1.0;
/// Mean pairwise distance above which spread saturates at one.
const SPREAD_MAX_KM: f64 = 5.0;

/// Individual reward components for one placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub avg_distance: f64,
    pub coverage: f64,
    pub spread: f64,
    pub reward: f64,
}

/// Score a placement against the demand centers.
///
/// An empty placement gets [`EMPTY_PLACEMENT_REWARD`] with all components zero.
#[must_use]
pub fn score_placement(stations: &[Station], demand_centers: &[DemandCenter]) -> RewardBreakdown {
    if stations.is_empty() {
        return RewardBreakdown {
            avg_distance: 0.0,
            coverage: 0.0,
            spread: 0.0,
            reward: EMPTY_PLACEMENT_REWARD,
        };
    }

    let avg_distance = weighted_avg_distance(stations, demand_centers);
    let coverage = coverage(stations, demand_centers);
    let spread = spread(stations);
    let reward =
        (-avg_distance * DISTANCE_WEIGHT) + (coverage * COVERAGE_WEIGHT) + (spread * SPREAD_WEIGHT);

    RewardBreakdown {
        avg_distance,
        coverage,
        spread,
        reward,
    }
}

/// Scalar reward for a placement. Pure: no randomness, no state.
#[must_use]
pub fn reward(stations: &[Station], demand_centers: &[DemandCenter]) -> f64 {
    score_placement(stations, demand_centers).reward
}

fn nearest_station_km(center: &DemandCenter, stations: &[Station]) -> f64 {
    let origin = center.coordinate();
    stations
        .iter()
        .map(|station| haversine_km(origin, station.coordinate()))
        .fold(f64::INFINITY, f64::min)
}

fn weighted_avg_distance(stations: &[Station], demand_centers: &[DemandCenter]) -> f64 {
    if demand_centers.is_empty() {
        return 0.0;
    }
    let total: f64 = demand_centers
        .iter()
        .map(|center| nearest_station_km(center, stations) * center.weight)
        .sum();
    total / demand_centers.len() as f64
}

fn coverage(stations: &[Station], demand_centers: &[DemandCenter]) -> f64 {
    if demand_centers.is_empty() {
        return 0.0;
    }
    let covered = demand_centers
        .iter()
        .filter(|center| nearest_station_km(center, stations) <= COVERAGE_RADIUS_KM)
        .count();
    covered as f64 / demand_centers.len() as f64
}

fn spread(stations: &[Station]) -> f64 {
    if stations.len() < 2 {
        return 0.0;
    }
    let (total, pairs) = stations
        .iter()
        .tuple_combinations()
        .fold((0.0, 0usize), |(total, pairs), (a, b)| {
            (total + haversine_km(a.coordinate(), b.coordinate()), pairs + 1)
        });
    let mean = total / pairs as f64;

    if mean < SPREAD_MIN_KM {
        0.0
    } else if mean > SPREAD_MAX_KM {
        1.0
    } else {
        mean / SPREAD_MAX_KM
    }
}
