//! Episode loop driving a bandit policy over candidate placements.
//!
//! Each episode: select an arm, materialize it into a full placement, score
//! the placement, feed the reward back to the policy, keep the best placement
//! seen (strictly greater reward wins), then decay exploration if the policy
//! supports it. A run is always exactly `num_episodes` episodes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bandit::{Algorithm, BanditPolicy, Policy};
use crate::config::{Config, OptimizerConfig};
use crate::error::{EvError, Result};
use crate::geo::BoundingBox;
use crate::placement::{
    Arm, ArmLayout, DemandCenter, PlacementKind, Station, generate_candidates, materialize,
    score_placement,
};

/// Parameters of one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub num_stations: usize,
    pub num_episodes: usize,
    pub arm_layout: ArmLayout,
    /// RNG seed. `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from(&OptimizerConfig::default())
    }
}

impl From<&OptimizerConfig> for RunSettings {
    fn from(config: &OptimizerConfig) -> Self {
        Self {
            num_stations: config.num_stations,
            num_episodes: config.num_episodes,
            arm_layout: config.arm_layout,
            seed: config.seed,
        }
    }
}

/// Lifecycle of the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running { episode: usize, total: usize },
    Done,
}

/// What happened in one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// 1-based episode number.
    pub episode: usize,
    pub arm_id: String,
    pub kind: PlacementKind,
    pub reward: f64,
    /// Best reward seen up to and including this episode.
    pub best_reward: f64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationRun {
    pub algorithm: Algorithm,
    pub seed: u64,
    pub num_stations: usize,
    pub num_episodes: usize,
    pub candidate_count: usize,
    pub episodes: Vec<EpisodeRecord>,
    pub best_reward: f64,
    pub best_episode: usize,
    pub best_arm_id: String,
    pub best_placement: Vec<Station>,
    /// Arm with the highest mean reward according to the policy's statistics.
    pub policy_best_arm: Option<String>,
}

impl OptimizationRun {
    #[must_use]
    pub fn episode_rewards(&self) -> Vec<f64> {
        self.episodes.iter().map(|record| record.reward).collect()
    }

    /// Best-so-far reward after each episode. Never decreases.
    #[must_use]
    pub fn best_so_far(&self) -> Vec<f64> {
        self.episodes.iter().map(|record| record.best_reward).collect()
    }

    /// Maximum reward over all episodes.
    #[must_use]
    pub fn final_reward(&self) -> f64 {
        self.episodes
            .iter()
            .map(|record| record.reward)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

struct Best {
    reward: f64,
    episode: usize,
    arm_id: String,
    placement: Vec<Station>,
}

/// Owns the demand centers, the RNG and the run state for placement search.
#[derive(Debug)]
pub struct Optimizer {
    settings: RunSettings,
    bounds: BoundingBox,
    demand_centers: Vec<DemandCenter>,
    seed: u64,
    rng: StdRng,
    state: RunState,
}

impl Optimizer {
    /// Build an optimizer, rejecting configurations that cannot run.
    pub fn new(
        settings: RunSettings,
        bounds: BoundingBox,
        demand_centers: Vec<DemandCenter>,
    ) -> Result<Self> {
        bounds.validate()?;
        if settings.num_stations == 0 {
            return Err(EvError::Config(
                "station count must be at least 1".to_string(),
            ));
        }
        if settings.num_episodes == 0 {
            return Err(EvError::Config(
                "episode count must be at least 1".to_string(),
            ));
        }
        if demand_centers.is_empty() {
            return Err(EvError::Config(
                "at least one demand center is required".to_string(),
            ));
        }

        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        debug!(seed, "optimizer rng seeded");

        Ok(Self {
            settings,
            bounds,
            demand_centers,
            seed,
            rng: StdRng::seed_from_u64(seed),
            state: RunState::Idle,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            RunSettings::from(&config.optimizer),
            config.city.bounds(),
            config.demand_centers.clone(),
        )
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    #[must_use]
    pub fn demand_centers(&self) -> &[DemandCenter] {
        &self.demand_centers
    }

    /// Generate the candidate arm pool from the optimizer's RNG.
    pub fn candidates(&mut self) -> Result<Vec<Arm>> {
        generate_candidates(
            self.settings.num_stations,
            &self.demand_centers,
            self.settings.arm_layout,
            &mut self.rng,
        )
    }

    /// Materialize `arm` into a full placement.
    pub fn materialize(&mut self, arm: &Arm) -> Vec<Station> {
        materialize(
            arm,
            self.settings.num_stations,
            &self.bounds,
            &self.demand_centers,
            &mut self.rng,
        )
    }

    /// Run all episodes with `policy`, which should be freshly constructed.
    pub fn run<P: BanditPolicy>(&mut self, policy: &mut P) -> Result<OptimizationRun> {
        let algorithm = policy.algorithm();
        let total = self.settings.num_episodes;
        info!(
            algorithm = %algorithm,
            stations = self.settings.num_stations,
            episodes = total,
            seed = self.seed,
            "starting placement optimization"
        );

        let candidates = self.candidates()?;
        info!(candidates = candidates.len(), "generated candidate placements");

        let mut best: Option<Best> = None;
        let mut episodes = Vec::with_capacity(total);

        for episode in 1..=total {
            self.state = RunState::Running { episode, total };

            let arm = policy.select(&candidates, &mut self.rng)?;
            let placement = self.materialize(arm);
            let reward = score_placement(&placement, &self.demand_centers).reward;
            policy.update(arm, reward);

            let improved = best.as_ref().is_none_or(|current| reward > current.reward);
            if improved {
                best = Some(Best {
                    reward,
                    episode,
                    arm_id: arm.id.clone(),
                    placement,
                });
            }
            let best_reward = best.as_ref().map_or(reward, |current| current.reward);

            episodes.push(EpisodeRecord {
                episode,
                arm_id: arm.id.clone(),
                kind: arm.kind,
                reward,
                best_reward,
            });
            info!(
                episode,
                total,
                arm = %arm.id,
                reward,
                best = best_reward,
                "episode complete"
            );

            if let Some(decay) = policy.decaying() {
                decay.decay();
                debug!(epsilon = decay.epsilon(), "decayed exploration rate");
            }
        }

        self.state = RunState::Done;

        let best =
            best.ok_or_else(|| EvError::Config("run finished without episodes".to_string()))?;
        let policy_best_arm = policy.best_arm(&candidates).map(|arm| arm.id.clone());
        info!(
            best_reward = best.reward,
            best_episode = best.episode,
            stations = best.placement.len(),
            "optimization complete"
        );

        Ok(OptimizationRun {
            algorithm,
            seed: self.seed,
            num_stations: self.settings.num_stations,
            num_episodes: total,
            candidate_count: candidates.len(),
            episodes,
            best_reward: best.reward,
            best_episode: best.episode,
            best_arm_id: best.arm_id,
            best_placement: best.placement,
            policy_best_arm,
        })
    }
}

/// Run `algorithm` on the configured city with a freshly built policy.
pub fn run_with_config(config: &Config, algorithm: Algorithm) -> Result<OptimizationRun> {
    let mut optimizer = Optimizer::from_config(config)?;
    let mut policy = Policy::new(algorithm, config.ucb, config.epsilon_greedy)?;
    optimizer.run(&mut policy)
}
