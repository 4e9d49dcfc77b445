//! Epsilon-greedy arm selection with per-episode decay.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Algorithm, ArmStats, BanditPolicy, ExplorationDecay};
use crate::error::{EvError, Result};
use crate::placement::Arm;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedyConfig {
    /// Initial exploration probability.
    pub epsilon: f64,
    /// Multiplier applied by each `decay()` call.
    pub decay: f64,
    /// Epsilon never decays below this value.
    pub min_epsilon: f64,
}

impl Default for EpsilonGreedyConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.3,
            decay: 0.95,
            min_epsilon: 0.1,
        }
    }
}

impl EpsilonGreedyConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(EvError::Config(format!(
                "epsilon must be within [0, 1], got {}",
                self.epsilon
            )));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(EvError::Config(format!(
                "epsilon decay must be within (0, 1], got {}",
                self.decay
            )));
        }
        if !(0.0..=1.0).contains(&self.min_epsilon) {
            return Err(EvError::Config(format!(
                "min epsilon must be within [0, 1], got {}",
                self.min_epsilon
            )));
        }
        Ok(())
    }
}

/// Explores uniformly with probability epsilon, otherwise exploits the arm
/// with the best mean reward.
#[derive(Debug, Clone)]
pub struct EpsilonGreedyBandit {
    config: EpsilonGreedyConfig,
    epsilon: f64,
    stats: ArmStats,
}

impl Default for EpsilonGreedyBandit {
    fn default() -> Self {
        let config = EpsilonGreedyConfig::default();
        Self {
            config,
            epsilon: config.epsilon,
            stats: ArmStats::new(),
        }
    }
}

impl EpsilonGreedyBandit {
    pub fn new(config: EpsilonGreedyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            epsilon: config.epsilon,
            stats: ArmStats::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &EpsilonGreedyConfig {
        &self.config
    }
}

impl BanditPolicy for EpsilonGreedyBandit {
    fn algorithm(&self) -> Algorithm {
        Algorithm::EpsilonGreedy
    }

    fn select<'a, R: Rng + ?Sized>(&mut self, arms: &'a [Arm], rng: &mut R) -> Result<&'a Arm> {
        if arms.is_empty() {
            return Err(EvError::NoArms);
        }

        if rng.random::<f64>() < self.epsilon {
            let arm = arms.choose(rng).ok_or(EvError::NoArms)?;
            trace!(arm = %arm.id, epsilon = self.epsilon, "epsilon-greedy exploring");
            return Ok(arm);
        }

        if let Some(arm) = self.stats.best_by_mean(arms) {
            trace!(arm = %arm.id, "epsilon-greedy exploiting");
            return Ok(arm);
        }

        // Nothing tried yet.
        arms.choose(rng).ok_or(EvError::NoArms)
    }

    fn update(&mut self, arm: &Arm, reward: f64) {
        self.stats.record(&arm.id, reward);
    }

    fn stats(&self) -> &ArmStats {
        &self.stats
    }

    fn decaying(&mut self) -> Option<&mut dyn ExplorationDecay> {
        Some(self)
    }
}

impl ExplorationDecay for EpsilonGreedyBandit {
    fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.config.decay).max(self.config.min_epsilon);
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }
}
