//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod candidates;
pub mod compare;
pub mod completions;
pub mod config;
pub mod optimize;
pub mod report;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one optimization and save its report
    Optimize(optimize::OptimizeArgs),

    /// Run UCB and epsilon-greedy on the same city and compare them
    Compare(compare::CompareArgs),

    /// List the candidate placement arms
    Candidates(candidates::CandidatesArgs),

    /// Show a saved run report
    Report(report::ReportArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Optimize(args) => optimize::run(ctx, args),
        Commands::Compare(args) => compare::run(ctx, args),
        Commands::Candidates(args) => candidates::run(ctx, args),
        Commands::Report(args) => report::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
        Commands::Completions(args) => completions::run(args),
    }
}
