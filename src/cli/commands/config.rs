use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::error::{EvError, Result};

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub toml: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    let config = &ctx.config;

    if ctx.robot_mode {
        return emit_robot(serde_json::json!({
            "config_path": ctx.config_path.display().to_string(),
            "config_file_exists": ctx.config_path.exists(),
            "config": config,
        }));
    }

    if args.toml {
        let rendered = toml::to_string_pretty(config)
            .map_err(|err| EvError::Config(format!("render config: {err}")))?;
        println!("{rendered}");
        return Ok(());
    }

    let seed = config
        .optimizer
        .seed
        .map_or_else(|| "(random per run)".to_string(), |seed| seed.to_string());

    let mut layout = HumanLayout::new();
    layout
        .title("Effective configuration")
        .kv("Config path", &ctx.config_path.display().to_string())
        .blank()
        .section("City")
        .kv("Name", &config.city.name)
        .kv(
            "Latitude",
            &format!("{:.4} .. {:.4}", config.city.min_lat, config.city.max_lat),
        )
        .kv(
            "Longitude",
            &format!("{:.4} .. {:.4}", config.city.min_lon, config.city.max_lon),
        )
        .blank()
        .section("Demand centers");
    for center in &config.demand_centers {
        layout.bullet(&format!(
            "{} ({:.4}, {:.4}) weight {:.2}",
            center.label, center.lat, center.lon, center.weight
        ));
    }
    layout
        .blank()
        .section("Optimizer")
        .kv("Algorithm", config.optimizer.algorithm.as_str())
        .kv("Stations", &config.optimizer.num_stations.to_string())
        .kv("Episodes", &config.optimizer.num_episodes.to_string())
        .kv("Seed", &seed)
        .kv("Arm layout", &format!("{:?}", config.optimizer.arm_layout).to_lowercase())
        .kv("UCB exploration", &config.ucb.exploration.to_string())
        .kv("Epsilon", &config.epsilon_greedy.epsilon.to_string())
        .kv("Epsilon decay", &config.epsilon_greedy.decay.to_string())
        .kv("Min epsilon", &config.epsilon_greedy.min_epsilon.to_string())
        .blank()
        .section("Output")
        .kv("Directory", &config.output.dir.display().to_string());
    emit_human(&layout);
    Ok(())
}
