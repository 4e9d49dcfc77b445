use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bandit::{Algorithm, EpsilonGreedyConfig, UcbConfig};
use crate::error::{EvError, Result};
use crate::geo::BoundingBox;
use crate::placement::{ArmLayout, DemandCenter, default_demand_centers};
use crate::utils::read_optional;

/// Project-local config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "evplace.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub city: CityConfig,
    #[serde(default = "default_demand_centers")]
    pub demand_centers: Vec<DemandCenter>,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub ucb: UcbConfig,
    #[serde(default)]
    pub epsilon_greedy: EpsilonGreedyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: CityConfig::default(),
            demand_centers: default_demand_centers(),
            optimizer: OptimizerConfig::default(),
            ucb: UcbConfig::default(),
            epsilon_greedy: EpsilonGreedyConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then config files, then `EVPLACE_*`
    /// environment overrides. The result is validated.
    pub fn load(explicit_path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("EVPLACE_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            match Self::load_patch(&path)? {
                Some(patch) => config.merge_patch(patch),
                None => {
                    return Err(EvError::MissingConfig(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_dir.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a complete config from TOML text, filling gaps with defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| EvError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("evplace/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        let Some(raw) = read_optional(path)
            .map_err(|err| EvError::Config(format!("read config {}: {err}", path.display())))?
        else {
            return Ok(None);
        };
        let patch = toml::from_str(&raw)
            .map_err(|err| EvError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.city {
            self.city.merge(patch);
        }
        if let Some(centers) = patch.demand_centers {
            self.demand_centers = centers;
        }
        if let Some(patch) = patch.optimizer {
            self.optimizer.merge(patch);
        }
        if let Some(patch) = patch.ucb {
            if let Some(value) = patch.exploration {
                self.ucb.exploration = value;
            }
        }
        if let Some(patch) = patch.epsilon_greedy {
            if let Some(value) = patch.epsilon {
                self.epsilon_greedy.epsilon = value;
            }
            if let Some(value) = patch.decay {
                self.epsilon_greedy.decay = value;
            }
            if let Some(value) = patch.min_epsilon {
                self.epsilon_greedy.min_epsilon = value;
            }
        }
        if let Some(patch) = patch.output {
            if let Some(value) = patch.dir {
                self.output.dir = value;
            }
            if let Some(value) = patch.robot {
                self.output.robot = value;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("EVPLACE_CITY") {
            self.city.name = value;
        }

        if let Some(value) = env_usize("EVPLACE_NUM_STATIONS")? {
            self.optimizer.num_stations = value;
        }
        if let Some(value) = env_usize("EVPLACE_NUM_EPISODES")? {
            self.optimizer.num_episodes = value;
        }
        if let Some(value) = env_string("EVPLACE_ALGORITHM") {
            self.optimizer.algorithm = value.parse()?;
        }
        if let Some(value) = env_u64("EVPLACE_SEED")? {
            self.optimizer.seed = Some(value);
        }
        if let Some(value) = env_string("EVPLACE_ARM_LAYOUT") {
            self.optimizer.arm_layout = value.parse()?;
        }

        if let Some(value) = env_f64("EVPLACE_UCB_EXPLORATION")? {
            self.ucb.exploration = value;
        }
        if let Some(value) = env_f64("EVPLACE_EPSILON")? {
            self.epsilon_greedy.epsilon = value;
        }
        if let Some(value) = env_f64("EVPLACE_EPSILON_DECAY")? {
            self.epsilon_greedy.decay = value;
        }
        if let Some(value) = env_f64("EVPLACE_MIN_EPSILON")? {
            self.epsilon_greedy.min_epsilon = value;
        }

        if let Some(value) = env_string("EVPLACE_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(value);
        }
        if let Some(value) = env_bool("EVPLACE_ROBOT") {
            self.output.robot = value;
        }

        Ok(())
    }

    /// Reject configurations the optimizer cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.city.bounds().validate()?;

        if self.demand_centers.is_empty() {
            return Err(EvError::Config(
                "at least one demand center is required".to_string(),
            ));
        }
        for center in &self.demand_centers {
            if !center.lat.is_finite() || !center.lon.is_finite() {
                return Err(EvError::Config(format!(
                    "demand center {} has a non-finite coordinate",
                    center.label
                )));
            }
            if !center.weight.is_finite() || center.weight < 0.0 {
                return Err(EvError::Config(format!(
                    "demand center {} has invalid weight {}",
                    center.label, center.weight
                )));
            }
        }

        if self.optimizer.num_stations == 0 {
            return Err(EvError::Config(
                "optimizer.num_stations must be at least 1".to_string(),
            ));
        }
        if self.optimizer.num_episodes == 0 {
            return Err(EvError::Config(
                "optimizer.num_episodes must be at least 1".to_string(),
            ));
        }

        self.ucb.validate()?;
        self.epsilon_greedy.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub min_lat: f64,
    #[serde(default)]
    pub max_lat: f64,
    #[serde(default)]
    pub min_lon: f64,
    #[serde(default)]
    pub max_lon: f64,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            name: "Bhubaneswar".to_string(),
            min_lat: 20.20,
            max_lat: 20.40,
            min_lon: 85.70,
            max_lon: 85.95,
        }
    }
}

impl CityConfig {
    #[must_use]
    pub const fn bounds(&self) -> BoundingBox {
        BoundingBox {
            min_lat: self.min_lat,
            max_lat: self.max_lat,
            min_lon: self.min_lon,
            max_lon: self.max_lon,
        }
    }

    /// Lowercase, underscore-separated city name for file names.
    #[must_use]
    pub fn slug(&self) -> String {
        let slug: String = self
            .name
            .trim()
            .to_lowercase()
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
            .collect();
        if slug.is_empty() {
            "city".to_string()
        } else {
            slug
        }
    }

    fn merge(&mut self, patch: CityPatch) {
        if let Some(value) = patch.name {
            self.name = value;
        }
        if let Some(value) = patch.min_lat {
            self.min_lat = value;
        }
        if let Some(value) = patch.max_lat {
            self.max_lat = value;
        }
        if let Some(value) = patch.min_lon {
            self.min_lon = value;
        }
        if let Some(value) = patch.max_lon {
            self.max_lon = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default)]
    pub num_stations: usize,
    #[serde(default)]
    pub num_episodes: usize,
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Fixed RNG seed. When unset a seed is drawn per run and recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub arm_layout: ArmLayout,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            num_stations: 25,
            num_episodes: 10,
            algorithm: Algorithm::Ucb,
            seed: None,
            arm_layout: ArmLayout::Resample,
        }
    }
}

impl OptimizerConfig {
    fn merge(&mut self, patch: OptimizerPatch) {
        if let Some(value) = patch.num_stations {
            self.num_stations = value;
        }
        if let Some(value) = patch.num_episodes {
            self.num_episodes = value;
        }
        if let Some(value) = patch.algorithm {
            self.algorithm = value;
        }
        if let Some(value) = patch.seed {
            self.seed = Some(value);
        }
        if let Some(value) = patch.arm_layout {
            self.arm_layout = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: PathBuf,
    #[serde(default)]
    pub robot: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            robot: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub city: Option<CityPatch>,
    pub demand_centers: Option<Vec<DemandCenter>>,
    pub optimizer: Option<OptimizerPatch>,
    pub ucb: Option<UcbPatch>,
    pub epsilon_greedy: Option<EpsilonGreedyPatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CityPatch {
    pub name: Option<String>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OptimizerPatch {
    pub num_stations: Option<usize>,
    pub num_episodes: Option<usize>,
    pub algorithm: Option<Algorithm>,
    pub seed: Option<u64>,
    pub arm_layout: Option<ArmLayout>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct UcbPatch {
    pub exploration: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EpsilonGreedyPatch {
    pub epsilon: Option<f64>,
    pub decay: Option<f64>,
    pub min_epsilon: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub dir: Option<PathBuf>,
    pub robot: Option<bool>,
}

/// Robot mode requested through `EVPLACE_ROBOT`, known before any config loads.
#[must_use]
pub fn robot_from_env() -> bool {
    env_bool("EVPLACE_ROBOT").unwrap_or(false)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| EvError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| EvError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|err| EvError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
