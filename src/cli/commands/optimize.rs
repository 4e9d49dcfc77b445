use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::bandit::Algorithm;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, format_reward};
use crate::config::Config;
use crate::error::Result;
use crate::export::{RunReport, report_file_name};
use crate::optimizer::{OptimizationRun, run_with_config};

/// Per-invocation overrides of the `[optimizer]` config section.
#[derive(Args, Debug, Default, Clone)]
pub struct RunOverrides {
    /// Stations per placement
    #[arg(long)]
    pub stations: Option<usize>,

    /// Episodes to run
    #[arg(long)]
    pub episodes: Option<usize>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

impl RunOverrides {
    /// Copy of `config` with these overrides applied and validated.
    pub fn apply(&self, config: &Config) -> Result<Config> {
        let mut config = config.clone();
        if let Some(stations) = self.stations {
            config.optimizer.num_stations = stations;
        }
        if let Some(episodes) = self.episodes {
            config.optimizer.num_episodes = episodes;
        }
        if let Some(seed) = self.seed {
            config.optimizer.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Default)]
pub struct OptimizeArgs {
    /// Bandit algorithm (defaults to the configured one)
    #[arg(long, value_enum)]
    pub algorithm: Option<Algorithm>,

    #[command(flatten)]
    pub overrides: RunOverrides,

    /// Report path (defaults to <output dir>/<city>_stations_<algorithm>.json)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &OptimizeArgs) -> Result<()> {
    let config = args.overrides.apply(&ctx.config)?;
    let algorithm = args.algorithm.unwrap_or(config.optimizer.algorithm);

    let run = run_with_config(&config, algorithm)?;
    let report = RunReport::from_run(&config.city.name, &run, &config.demand_centers);

    let path = args.output.clone().unwrap_or_else(|| {
        config
            .output
            .dir
            .join(report_file_name(&config.city.slug(), algorithm))
    });
    let path = ctx.resolve(&path);
    report.save(&path)?;

    if ctx.robot_mode {
        return emit_robot(serde_json::json!({
            "path": path.display().to_string(),
            "best_episode": run.best_episode,
            "best_arm_id": run.best_arm_id,
            "policy_best_arm": run.policy_best_arm,
            "candidate_count": run.candidate_count,
            "report": report,
        }));
    }

    let mut layout = HumanLayout::new();
    summarize(&mut layout, &run, &report);
    layout.blank().kv("Saved to", &path.display().to_string());
    emit_human(&layout);
    Ok(())
}

/// Append a human summary of one run to `layout`.
pub(crate) fn summarize(layout: &mut HumanLayout, run: &OptimizationRun, report: &RunReport) {
    layout
        .title(&format!("{} placement for {}", report.algorithm, report.city))
        .kv("Stations", &report.num_stations.to_string())
        .kv("Episodes", &report.num_episodes.to_string())
        .kv("Candidates", &run.candidate_count.to_string())
        .kv("Seed", &run.seed.to_string())
        .kv("Best reward", &format!("{:.2}", report.final_reward))
        .kv(
            "Best episode",
            &format!("{} ({})", run.best_episode, run.best_arm_id),
        )
        .kv("Coverage", &format!("{:.0}%", report.metrics.coverage * 100.0))
        .kv("Avg distance", &format!("{:.2} km", report.metrics.avg_distance))
        .kv("Spread", &format!("{:.2}", report.metrics.spread))
        .blank()
        .section("Episodes");

    for record in &run.episodes {
        layout.push_line(format!(
            "{:>4}  {:<14} {}  best {}",
            record.episode,
            record.arm_id,
            format_reward(record.reward),
            format_reward(record.best_reward),
        ));
    }
}
