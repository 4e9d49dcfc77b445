//! Materializing a selected arm into a full station placement.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::candidates::{Arm, grid_dimension};
use super::{DemandCenter, PlacementKind, Station};
use crate::geo::{BoundingBox, Coordinate};

/// Maximum jitter, in degrees per axis, applied to grid stations.
pub const GRID_JITTER_DEG: f64 = 0.01;

/// Sequential 1-based station id, zero-padded to two digits.
#[must_use]
pub fn station_id(slot: usize) -> String {
    format!("ST{:02}", slot + 1)
}

/// Expand `arm` into exactly `station_count` stations.
///
/// Strategic arms are deterministic. Grid and random arms draw from `rng`
/// unless the arm carries a layout seed, in which case they draw from a
/// private generator seeded with it and always yield the same coordinates.
pub fn materialize<R: Rng + ?Sized>(
    arm: &Arm,
    station_count: usize,
    bounds: &BoundingBox,
    demand_centers: &[DemandCenter],
    rng: &mut R,
) -> Vec<Station> {
    if let Some(seed) = arm.layout_seed {
        let mut arm_rng = StdRng::seed_from_u64(seed);
        return build(arm.kind, station_count, bounds, demand_centers, &mut arm_rng);
    }
    build(arm.kind, station_count, bounds, demand_centers, rng)
}

fn build<R: Rng + ?Sized>(
    kind: PlacementKind,
    station_count: usize,
    bounds: &BoundingBox,
    demand_centers: &[DemandCenter],
    rng: &mut R,
) -> Vec<Station> {
    match kind {
        PlacementKind::Strategic => strategic(station_count, bounds, demand_centers),
        PlacementKind::Grid => grid(station_count, bounds, rng),
        PlacementKind::Random => random(station_count, bounds, rng),
    }
}

/// Demand centers first; any remaining slots fall back to the plain grid.
fn strategic(
    station_count: usize,
    bounds: &BoundingBox,
    demand_centers: &[DemandCenter],
) -> Vec<Station> {
    let dim = grid_dimension(station_count);
    (0..station_count)
        .map(|slot| match demand_centers.get(slot) {
            Some(center) => Station {
                station_id: station_id(slot),
                lat: center.lat,
                lon: center.lon,
                name: center.label.clone(),
                kind: PlacementKind::Strategic,
            },
            None => {
                let point = grid_position(slot, dim, bounds);
                Station {
                    station_id: station_id(slot),
                    lat: point.lat,
                    lon: point.lon,
                    name: format!("Grid Station {}", slot + 1),
                    kind: PlacementKind::Grid,
                }
            }
        })
        .collect()
}

fn grid<R: Rng + ?Sized>(station_count: usize, bounds: &BoundingBox, rng: &mut R) -> Vec<Station> {
    let dim = grid_dimension(station_count);
    (0..station_count)
        .map(|slot| {
            let base = grid_position(slot, dim, bounds);
            let jittered = Coordinate::new(
                base.lat + rng.random_range(-GRID_JITTER_DEG..=GRID_JITTER_DEG),
                base.lon + rng.random_range(-GRID_JITTER_DEG..=GRID_JITTER_DEG),
            );
            let point = bounds.clamp(jittered);
            Station {
                station_id: station_id(slot),
                lat: point.lat,
                lon: point.lon,
                name: format!("Grid Station {}", slot + 1),
                kind: PlacementKind::Grid,
            }
        })
        .collect()
}

fn random<R: Rng + ?Sized>(
    station_count: usize,
    bounds: &BoundingBox,
    rng: &mut R,
) -> Vec<Station> {
    (0..station_count)
        .map(|slot| Station {
            station_id: station_id(slot),
            lat: rng.random_range(bounds.min_lat..=bounds.max_lat),
            lon: rng.random_range(bounds.min_lon..=bounds.max_lon),
            name: format!("Random Station {}", slot + 1),
            kind: PlacementKind::Random,
        })
        .collect()
}

/// Unjittered position of grid slot `slot` on a `dim x dim` grid.
fn grid_position(slot: usize, dim: usize, bounds: &BoundingBox) -> Coordinate {
    let dim = dim.max(1);
    let row = (slot / dim) as f64;
    let col = (slot % dim) as f64;
    let size = dim as f64;
    Coordinate::new(
        bounds.min_lat + (row / size) * bounds.lat_span(),
        bounds.min_lon + (col / size) * bounds.lon_span(),
    )
}
