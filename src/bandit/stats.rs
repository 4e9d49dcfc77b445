//! Per-arm reward bookkeeping shared by the bandit policies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::placement::Arm;

/// Observations for a single arm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmRecord {
    pub pulls: u64,
    pub rewards: Vec<f64>,
}

impl ArmRecord {
    /// Mean observed reward, `None` before the first pull.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.rewards.is_empty() {
            None
        } else {
            Some(self.rewards.iter().sum::<f64>() / self.rewards.len() as f64)
        }
    }
}

/// Pull counts and reward histories keyed by arm id.
///
/// Counts and histories only grow. A fresh instance is created for every
/// optimization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmStats {
    arms: BTreeMap<String, ArmRecord>,
    total_pulls: u64,
}

impl ArmStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, arm_id: &str, reward: f64) {
        let entry = self.arms.entry(arm_id.to_string()).or_default();
        entry.pulls += 1;
        entry.rewards.push(reward);
        self.total_pulls += 1;
    }

    #[must_use]
    pub fn get(&self, arm_id: &str) -> Option<&ArmRecord> {
        self.arms.get(arm_id)
    }

    #[must_use]
    pub fn pulls(&self, arm_id: &str) -> u64 {
        self.arms.get(arm_id).map_or(0, |record| record.pulls)
    }

    #[must_use]
    pub fn mean(&self, arm_id: &str) -> Option<f64> {
        self.arms.get(arm_id).and_then(ArmRecord::mean)
    }

    #[must_use]
    pub fn history(&self, arm_id: &str) -> &[f64] {
        self.arms
            .get(arm_id)
            .map_or(&[], |record| record.rewards.as_slice())
    }

    #[must_use]
    pub const fn total_pulls(&self) -> u64 {
        self.total_pulls
    }

    /// Arms that have been pulled at least once, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArmRecord)> {
        self.arms.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Arm in `arms` with the strictly highest mean reward.
    ///
    /// Ties keep the earliest arm in pool order. Returns `None` when no arm in
    /// `arms` has been pulled.
    #[must_use]
    pub fn best_by_mean<'a>(&self, arms: &'a [Arm]) -> Option<&'a Arm> {
        let mut best: Option<(&'a Arm, f64)> = None;
        for arm in arms {
            let Some(mean) = self.mean(&arm.id) else {
                continue;
            };
            match best {
                Some((_, best_mean)) if mean <= best_mean => {}
                _ => best = Some((arm, mean)),
            }
        }
        best.map(|(arm, _)| arm)
    }
}
