//! Candidate arm generation.
//!
//! The pool is built from three strategies in a fixed order: strategic arms
//! (one per demand center), grid arms and random arms. Arms only describe a
//! strategy; coordinates are derived when an arm is materialized.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DemandCenter, PlacementKind};
use crate::error::{EvError, Result};

/// Whether grid and random arms keep their coordinates between pulls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmLayout {
    /// Fresh jitter / sampling on every materialization.
    #[default]
    Resample,
    /// Each grid and random arm gets a layout seed at generation, so the same
    /// arm always materializes to the same coordinates.
    Frozen,
}

impl FromStr for ArmLayout {
    type Err = EvError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "resample" => Ok(Self::Resample),
            "frozen" => Ok(Self::Frozen),
            _ => Err(EvError::Config(format!(
                "invalid arm layout {value} (expected resample|frozen)"
            ))),
        }
    }
}

/// Row/column of a grid arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

/// A candidate placement strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arm {
    pub id: String,
    pub kind: PlacementKind,
    /// Strategy-local index. For strategic arms this is the demand center index.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<GridCell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_seed: Option<u64>,
}

/// Side length of the square grid that fits `station_count` cells.
#[must_use]
pub const fn grid_dimension(station_count: usize) -> usize {
    let mut dim = 0;
    while dim * dim < station_count {
        dim += 1;
    }
    dim
}

/// Build the candidate arm pool.
///
/// Produces `min(centers, station_count)` strategic arms followed by exactly
/// `station_count` grid arms and `station_count` random arms. The RNG is only
/// consumed when `layout` is [`ArmLayout::Frozen`].
pub fn generate_candidates<R: Rng + ?Sized>(
    station_count: usize,
    demand_centers: &[DemandCenter],
    layout: ArmLayout,
    rng: &mut R,
) -> Result<Vec<Arm>> {
    if station_count == 0 {
        return Err(EvError::Config(
            "station count must be at least 1".to_string(),
        ));
    }

    let dim = grid_dimension(station_count);
    let mut arms = Vec::with_capacity(station_count * 3);

    for (index, _) in demand_centers.iter().take(station_count).enumerate() {
        arms.push(Arm {
            id: format!("strategic_{index}"),
            kind: PlacementKind::Strategic,
            index,
            cell: None,
            layout_seed: None,
        });
    }

    for index in 0..station_count {
        arms.push(Arm {
            id: format!("grid_{index}"),
            kind: PlacementKind::Grid,
            index,
            cell: Some(GridCell {
                row: index / dim,
                col: index % dim,
            }),
            layout_seed: frozen_seed(layout, rng),
        });
    }

    for index in 0..station_count {
        arms.push(Arm {
            id: format!("random_{index}"),
            kind: PlacementKind::Random,
            index,
            cell: None,
            layout_seed: frozen_seed(layout, rng),
        });
    }

    debug!(
        arms = arms.len(),
        grid_dim = dim,
        layout = ?layout,
        "generated candidate pool"
    );
    Ok(arms)
}

fn frozen_seed<R: Rng + ?Sized>(layout: ArmLayout, rng: &mut R) -> Option<u64> {
    match layout {
        ArmLayout::Resample => None,
        ArmLayout::Frozen => Some(rng.random()),
    }
}
