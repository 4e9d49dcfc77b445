//! Bandit policies for arm selection.
//!
//! Two policies share the [`BanditPolicy`] contract:
//! - [`UcbBandit`]: upper confidence bound, tries every arm once first
//! - [`EpsilonGreedyBandit`]: epsilon exploration with per-episode decay
//!
//! [`Policy`] is the tagged variant built from configuration. Decay is an
//! optional capability exposed through [`BanditPolicy::decaying`].

pub mod epsilon;
pub mod stats;
pub mod ucb;

use std::str::FromStr;

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EvError, Result};
use crate::placement::Arm;

pub use epsilon::{EpsilonGreedyBandit, EpsilonGreedyConfig};
pub use stats::{ArmRecord, ArmStats};
pub use ucb::{UcbBandit, UcbConfig};

/// Stateful arm-selection strategy.
///
/// A policy only ever sees `(arm, reward)` pairs; it never inspects
/// placements.
pub trait BanditPolicy {
    /// Algorithm this policy implements; labels runs and reports.
    fn algorithm(&self) -> Algorithm;

    fn name(&self) -> &'static str {
        self.algorithm().as_str()
    }

    /// Choose an arm from `arms`. Fails with [`EvError::NoArms`] on an empty pool.
    fn select<'a, R: Rng + ?Sized>(&mut self, arms: &'a [Arm], rng: &mut R) -> Result<&'a Arm>;

    /// Record the reward observed for `arm`.
    fn update(&mut self, arm: &Arm, reward: f64);

    fn stats(&self) -> &ArmStats;

    /// Arm with the highest mean reward so far, or the first arm when nothing
    /// has been tried.
    fn best_arm<'a>(&self, arms: &'a [Arm]) -> Option<&'a Arm> {
        self.stats().best_by_mean(arms).or_else(|| arms.first())
    }

    /// The decay capability, for policies that have one.
    fn decaying(&mut self) -> Option<&mut dyn ExplorationDecay> {
        None
    }
}

/// Policies whose exploration rate shrinks over episodes.
pub trait ExplorationDecay {
    fn decay(&mut self);
    fn epsilon(&self) -> f64;
}

/// Which bandit algorithm drives a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Ucb,
    EpsilonGreedy,
}

impl Algorithm {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ucb => "ucb",
            Self::EpsilonGreedy => "epsilon_greedy",
        }
    }

    /// Human-readable name recorded in exported reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Ucb => "UCB (Multi-Armed Bandit)",
            Self::EpsilonGreedy => "Epsilon-Greedy (Multi-Armed Bandit)",
        }
    }

    /// Short tag used in result file names.
    #[must_use]
    pub const fn file_tag(self) -> &'static str {
        match self {
            Self::Ucb => "ucb",
            Self::EpsilonGreedy => "epsilon",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = EvError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().replace('-', "_").as_str() {
            "ucb" => Ok(Self::Ucb),
            "epsilon_greedy" | "epsilon" => Ok(Self::EpsilonGreedy),
            _ => Err(EvError::Config(format!(
                "invalid algorithm {value} (expected ucb|epsilon_greedy)"
            ))),
        }
    }
}

/// A freshly constructed policy of either kind.
#[derive(Debug, Clone)]
pub enum Policy {
    Ucb(UcbBandit),
    EpsilonGreedy(EpsilonGreedyBandit),
}

impl Policy {
    pub fn new(
        algorithm: Algorithm,
        ucb: UcbConfig,
        epsilon_greedy: EpsilonGreedyConfig,
    ) -> Result<Self> {
        match algorithm {
            Algorithm::Ucb => Ok(Self::Ucb(UcbBandit::new(ucb)?)),
            Algorithm::EpsilonGreedy => {
                Ok(Self::EpsilonGreedy(EpsilonGreedyBandit::new(epsilon_greedy)?))
            }
        }
    }
}

impl BanditPolicy for Policy {
    fn algorithm(&self) -> Algorithm {
        match self {
            Self::Ucb(bandit) => bandit.algorithm(),
            Self::EpsilonGreedy(bandit) => bandit.algorithm(),
        }
    }

    fn select<'a, R: Rng + ?Sized>(&mut self, arms: &'a [Arm], rng: &mut R) -> Result<&'a Arm> {
        match self {
            Self::Ucb(bandit) => bandit.select(arms, rng),
            Self::EpsilonGreedy(bandit) => bandit.select(arms, rng),
        }
    }

    fn update(&mut self, arm: &Arm, reward: f64) {
        match self {
            Self::Ucb(bandit) => bandit.update(arm, reward),
            Self::EpsilonGreedy(bandit) => bandit.update(arm, reward),
        }
    }

    fn stats(&self) -> &ArmStats {
        match self {
            Self::Ucb(bandit) => bandit.stats(),
            Self::EpsilonGreedy(bandit) => bandit.stats(),
        }
    }

    fn decaying(&mut self) -> Option<&mut dyn ExplorationDecay> {
        match self {
            Self::Ucb(bandit) => bandit.decaying(),
            Self::EpsilonGreedy(bandit) => bandit.decaying(),
        }
    }
}
