use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::error::Result;
use crate::optimizer::{Optimizer, RunSettings};
use crate::placement::{Arm, PlacementKind};

#[derive(Args, Debug, Default)]
pub struct CandidatesArgs {
    /// Stations per placement
    #[arg(long)]
    pub stations: Option<usize>,

    /// RNG seed (only affects layout seeds of frozen arms)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(ctx: &AppContext, args: &CandidatesArgs) -> Result<()> {
    let mut settings = RunSettings::from(&ctx.config.optimizer);
    if let Some(stations) = args.stations {
        settings.num_stations = stations;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }

    let mut optimizer = Optimizer::new(
        settings,
        ctx.config.city.bounds(),
        ctx.config.demand_centers.clone(),
    )?;
    let arms = optimizer.candidates()?;

    if ctx.robot_mode {
        return emit_robot(serde_json::json!({
            "stations": settings.num_stations,
            "count": arms.len(),
            "arms": arms,
        }));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Candidate placements")
        .kv("Stations", &settings.num_stations.to_string())
        .kv("Arms", &arms.len().to_string());
    for kind in [
        PlacementKind::Strategic,
        PlacementKind::Grid,
        PlacementKind::Random,
    ] {
        let group: Vec<&Arm> = arms.iter().filter(|arm| arm.kind == kind).collect();
        if group.is_empty() {
            continue;
        }
        layout
            .blank()
            .section(&format!("{kind} ({})", group.len()));
        for arm in group {
            layout.bullet(&describe(arm, ctx));
        }
    }
    emit_human(&layout);
    Ok(())
}

fn describe(arm: &Arm, ctx: &AppContext) -> String {
    match arm.kind {
        PlacementKind::Strategic => ctx
            .config
            .demand_centers
            .get(arm.index)
            .map_or_else(|| arm.id.clone(), |center| format!("{} near {}", arm.id, center.label)),
        PlacementKind::Grid => arm.cell.map_or_else(
            || arm.id.clone(),
            |cell| format!("{} at row {}, col {}", arm.id, cell.row, cell.col),
        ),
        PlacementKind::Random => arm.id.clone(),
    }
}
