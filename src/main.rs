//! evplace - EV charging station placement
//!
//! Search for charging station layouts with multi-armed bandits.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use evplace::EvError;
use evplace::app::AppContext;
use evplace::cli::output::{emit_json, robot_error};
use evplace::cli::{Cli, Commands};
use evplace::config::robot_from_env;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let robot = cli.robot || robot_from_env();
    init_tracing(&cli, robot);

    if let Commands::Completions(args) = &cli.command {
        return finish(evplace::cli::commands::completions::run(args), robot);
    }

    let ctx = match AppContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => return finish(Err(e), robot),
    };
    // A config file may turn robot mode on as well.
    let robot = ctx.robot_mode;
    finish(evplace::cli::commands::run(&ctx, &cli.command), robot)
}

fn finish(result: evplace::Result<()>, robot: bool) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, robot);
            ExitCode::FAILURE
        }
    }
}

fn report_error(e: &EvError, robot: bool) {
    if robot {
        // Robot mode: JSON error output to stdout
        if emit_json(&robot_error(e)).is_err() {
            eprintln!("Error: {e}");
        }
    } else {
        eprintln!("Error: {e}");
    }
}

fn init_tracing(cli: &Cli, robot: bool) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,evplace=info",
        1 => "info,evplace=debug",
        2 => "debug,evplace=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
