use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::Result;

/// Resolved state shared by every command.
pub struct AppContext {
    pub project_dir: PathBuf,
    /// Explicit config file, or the project config path when none was given.
    pub config_path: PathBuf,
    pub config: Config,
    pub robot_mode: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_dir)?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| project_dir.join(PROJECT_CONFIG_FILE));

        Ok(Self {
            robot_mode: cli.robot || config.output.robot,
            project_dir,
            config_path,
            config,
        })
    }

    /// Context over an already-built config, for embedding and tests.
    #[must_use]
    pub fn with_config(config: Config, robot_mode: bool) -> Self {
        let project_dir = PathBuf::from(".");
        Self {
            config_path: project_dir.join(PROJECT_CONFIG_FILE),
            project_dir,
            config,
            robot_mode,
        }
    }

    /// Resolve an output path against the project directory.
    #[must_use]
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}
