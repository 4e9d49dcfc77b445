//! JSON run reports.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bandit::Algorithm;
use crate::error::{EvError, Result};
use crate::optimizer::OptimizationRun;
use crate::placement::{DemandCenter, Station, score_placement};
use crate::utils::write_atomic;

/// Report file name for a city slug and algorithm,
/// e.g. `bhubaneswar_stations_epsilon.json`.
#[must_use]
pub fn report_file_name(city_slug: &str, algorithm: Algorithm) -> String {
    format!("{city_slug}_stations_{}.json", algorithm.file_tag())
}

/// Quality metrics of the final placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub coverage: f64,
    pub avg_distance: f64,
    pub spread: f64,
}

/// Persisted outcome of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub city: String,
    pub algorithm: String,
    pub num_stations: usize,
    pub num_episodes: usize,
    pub episode_rewards: Vec<f64>,
    /// Maximum episode reward.
    pub final_reward: f64,
    pub stations: Vec<Station>,
    pub metrics: ReportMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl RunReport {
    /// Build a report for `run`, recomputing metrics on its best placement.
    #[must_use]
    pub fn from_run(city: &str, run: &OptimizationRun, demand_centers: &[DemandCenter]) -> Self {
        let breakdown = score_placement(&run.best_placement, demand_centers);
        let episode_rewards = run.episode_rewards();
        let final_reward = if episode_rewards.is_empty() {
            0.0
        } else {
            run.final_reward()
        };

        Self {
            city: city.to_string(),
            algorithm: run.algorithm.display_name().to_string(),
            num_stations: run.best_placement.len(),
            num_episodes: run.num_episodes,
            episode_rewards,
            final_reward,
            stations: run.best_placement.clone(),
            metrics: ReportMetrics {
                coverage: breakdown.coverage,
                avg_distance: breakdown.avg_distance,
                spread: breakdown.spread,
            },
            seed: Some(run.seed),
        }
    }

    /// Write the report as pretty JSON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, &json)?;
        info!(path = %path.display(), stations = self.stations.len(), "saved run report");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EvError::NotFound(format!(
                "report {} does not exist",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
