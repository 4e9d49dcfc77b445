use std::path::PathBuf;

use clap::Args;
use rand::Rng;
use serde::Serialize;

use super::optimize::{RunOverrides, summarize};
use crate::app::AppContext;
use crate::bandit::Algorithm;
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::error::Result;
use crate::export::{RunReport, report_file_name};
use crate::optimizer::run_with_config;

#[derive(Args, Debug, Default)]
pub struct CompareArgs {
    #[command(flatten)]
    pub overrides: RunOverrides,

    /// Directory for both reports (defaults to the configured output dir)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ComparisonEntry {
    algorithm: Algorithm,
    path: String,
    final_reward: f64,
    coverage: f64,
    avg_distance: f64,
    spread: f64,
}

pub fn run(ctx: &AppContext, args: &CompareArgs) -> Result<()> {
    let mut config = args.overrides.apply(&ctx.config)?;
    // Both algorithms search from the same seed.
    if config.optimizer.seed.is_none() {
        config.optimizer.seed = Some(rand::rng().random());
    }
    let output_dir = ctx.resolve(args.output_dir.as_ref().unwrap_or(&config.output.dir));

    let mut layout = HumanLayout::new();
    let mut entries = Vec::new();

    for algorithm in [Algorithm::Ucb, Algorithm::EpsilonGreedy] {
        let run = run_with_config(&config, algorithm)?;
        let report = RunReport::from_run(&config.city.name, &run, &config.demand_centers);
        let path = output_dir.join(report_file_name(&config.city.slug(), algorithm));
        report.save(&path)?;

        if !ctx.robot_mode {
            summarize(&mut layout, &run, &report);
            layout
                .blank()
                .kv("Saved to", &path.display().to_string())
                .blank();
        }
        entries.push(ComparisonEntry {
            algorithm,
            path: path.display().to_string(),
            final_reward: report.final_reward,
            coverage: report.metrics.coverage,
            avg_distance: report.metrics.avg_distance,
            spread: report.metrics.spread,
        });
    }

    let winner = best_entry(&entries).map(|entry| entry.algorithm);

    if ctx.robot_mode {
        return emit_robot(serde_json::json!({
            "runs": entries,
            "winner": winner,
        }));
    }

    layout.section("Comparison");
    for entry in &entries {
        layout.kv(
            entry.algorithm.display_name(),
            &format!(
                "reward {:.2}, coverage {:.0}%",
                entry.final_reward,
                entry.coverage * 100.0
            ),
        );
    }
    if let Some(winner) = winner {
        layout.blank().kv("Higher reward", winner.display_name());
    }
    emit_human(&layout);
    Ok(())
}

/// Entry with the strictly highest reward; the first one wins ties.
fn best_entry(entries: &[ComparisonEntry]) -> Option<&ComparisonEntry> {
    entries.iter().fold(None, |best: Option<&ComparisonEntry>, entry| match best {
        Some(current) if entry.final_reward <= current.final_reward => Some(current),
        _ => Some(entry),
    })
}
