//! Upper Confidence Bound (UCB1-style) arm selection.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Algorithm, ArmStats, BanditPolicy};
use crate::error::{EvError, Result};
use crate::placement::Arm;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UcbConfig {
    /// Exploration constant `c` in `mean + c * sqrt(ln(total) / pulls)`.
    pub exploration: f64,
}

impl Default for UcbConfig {
    fn default() -> Self {
        Self { exploration: 2.0 }
    }
}

impl UcbConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(EvError::Config(format!(
                "ucb exploration must be a non-negative number, got {}",
                self.exploration
            )));
        }
        Ok(())
    }
}

/// UCB bandit. Every arm is tried once before confidence bounds are compared.
#[derive(Debug, Clone, Default)]
pub struct UcbBandit {
    config: UcbConfig,
    stats: ArmStats,
}

impl UcbBandit {
    pub fn new(config: UcbConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stats: ArmStats::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &UcbConfig {
        &self.config
    }

    /// Upper confidence bound for `arm`, `None` while the arm is untried.
    #[must_use]
    pub fn ucb_value(&self, arm: &Arm) -> Option<f64> {
        let record = self.stats.get(&arm.id)?;
        let mean = record.mean()?;
        let total = self.stats.total_pulls() as f64;
        let bonus = self.config.exploration * (total.ln() / record.pulls as f64).sqrt();
        Some(mean + bonus)
    }
}

impl BanditPolicy for UcbBandit {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Ucb
    }

    fn select<'a, R: Rng + ?Sized>(&mut self, arms: &'a [Arm], rng: &mut R) -> Result<&'a Arm> {
        if arms.is_empty() {
            return Err(EvError::NoArms);
        }

        let untried: Vec<&'a Arm> = arms
            .iter()
            .filter(|arm| self.stats.pulls(&arm.id) == 0)
            .collect();
        if let Some(&arm) = untried.choose(rng) {
            trace!(arm = %arm.id, untried = untried.len(), "ucb exploring untried arm");
            return Ok(arm);
        }

        let mut best: Option<(&'a Arm, f64)> = None;
        for arm in arms {
            let Some(value) = self.ucb_value(arm) else {
                continue;
            };
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((arm, value)),
            }
        }

        let (arm, value) = best.ok_or(EvError::NoArms)?;
        trace!(arm = %arm.id, ucb = value, "ucb selected arm");
        Ok(arm)
    }

    fn update(&mut self, arm: &Arm, reward: f64) {
        self.stats.record(&arm.id, reward);
    }

    fn stats(&self) -> &ArmStats {
        &self.stats
    }
}
