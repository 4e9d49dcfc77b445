use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, format_reward};
use crate::error::Result;
use crate::export::RunReport;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Saved report JSON
    pub path: PathBuf,

    /// Also list every station
    #[arg(long)]
    pub stations: bool,
}

pub fn run(ctx: &AppContext, args: &ReportArgs) -> Result<()> {
    let report = RunReport::load(&ctx.resolve(&args.path))?;

    if ctx.robot_mode {
        return emit_robot(&report);
    }

    let mut layout = HumanLayout::new();
    layout
        .title(&format!("{} placement for {}", report.algorithm, report.city))
        .kv("Stations", &report.num_stations.to_string())
        .kv("Episodes", &report.num_episodes.to_string())
        .kv(
            "Seed",
            &report
                .seed
                .map_or_else(|| "(unrecorded)".to_string(), |seed| seed.to_string()),
        )
        .kv("Best reward", &format!("{:.2}", report.final_reward))
        .kv("Coverage", &format!("{:.0}%", report.metrics.coverage * 100.0))
        .kv("Avg distance", &format!("{:.2} km", report.metrics.avg_distance))
        .kv("Spread", &format!("{:.2}", report.metrics.spread))
        .blank()
        .section("Episode rewards");
    for (index, reward) in report.episode_rewards.iter().enumerate() {
        layout.push_line(format!("{:>4}  {}", index + 1, format_reward(*reward)));
    }

    if args.stations {
        layout.blank().section("Stations");
        for station in &report.stations {
            layout.push_line(format!(
                "{}  {:>9.5} {:>9.5}  {:<9} {}",
                station.station_id, station.lat, station.lon, station.kind, station.name
            ));
        }
    }

    emit_human(&layout);
    Ok(())
}
