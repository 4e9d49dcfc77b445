//! Placement model: demand centers, candidate arms, station layouts and scoring.

pub mod candidates;
pub mod layout;
pub mod reward;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

pub use candidates::{Arm, ArmLayout, GridCell, generate_candidates, grid_dimension};
pub use layout::{materialize, station_id};
pub use reward::{
    COVERAGE_RADIUS_KM, EMPTY_PLACEMENT_REWARD, RewardBreakdown, reward, score_placement,
};

/// How an arm (and the stations it produces) was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    /// Anchored on the city's demand centers.
    Strategic,
    /// Uniform grid over the bounding box.
    Grid,
    /// Uniform random sampling over the bounding box.
    Random,
}

impl PlacementKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strategic => "strategic",
            Self::Grid => "grid",
            Self::Random => "random",
        }
    }
}

impl std::fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A weighted location that generates charging demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandCenter {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    /// Relative importance, typically in `0.0..=1.0`.
    pub weight: f64,
}

impl DemandCenter {
    #[must_use]
    pub fn new(label: impl Into<String>, lat: f64, lon: f64, weight: f64) -> Self {
        Self {
            label: label.into(),
            lat,
            lon,
            weight,
        }
    }

    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// One charging station in a placement.
///
/// Serialized with a `type` key so the exported `stations` array can be read
/// directly by map and navigation tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlacementKind,
}

impl Station {
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Default demand centers for Bhubaneswar.
#[must_use]
pub fn default_demand_centers() -> Vec<DemandCenter> {
    vec![
        DemandCenter::new("City Center", 20.2961, 85.8245, 1.0),
        DemandCenter::new("KIIT Area", 20.2644, 85.8281, 0.9),
        DemandCenter::new("Patia IT Hub", 20.3100, 85.8500, 0.8),
        DemandCenter::new("Railway Station", 20.2500, 85.8500, 0.7),
        DemandCenter::new("Airport Area", 20.3000, 85.8800, 0.6),
    ]
}
