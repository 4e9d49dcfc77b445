use std::path::PathBuf;

use clap::Parser;

use evplace::bandit::Algorithm;
use evplace::cli::{Cli, Commands};

fn parse(args: &[&str]) -> Commands {
    let mut argv = vec!["evplace"];
    argv.extend_from_slice(args);
    Cli::parse_from(argv).command
}

#[test]
fn parse_optimize_flags() {
    match parse(&[
        "optimize",
        "--algorithm",
        "epsilon-greedy",
        "--stations",
        "12",
        "--episodes",
        "40",
        "--seed",
        "7",
        "--output",
        "out.json",
    ]) {
        Commands::Optimize(args) => {
            assert_eq!(args.algorithm, Some(Algorithm::EpsilonGreedy));
            assert_eq!(args.overrides.stations, Some(12));
            assert_eq!(args.overrides.episodes, Some(40));
            assert_eq!(args.overrides.seed, Some(7));
            assert_eq!(args.output, Some(PathBuf::from("out.json")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_optimize_defaults() {
    match parse(&["optimize"]) {
        Commands::Optimize(args) => {
            assert!(args.algorithm.is_none());
            assert!(args.overrides.stations.is_none());
            assert!(args.output.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_compare_output_dir() {
    match parse(&["compare", "--episodes", "5", "--output-dir", "runs"]) {
        Commands::Compare(args) => {
            assert_eq!(args.overrides.episodes, Some(5));
            assert_eq!(args.output_dir, Some(PathBuf::from("runs")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_report_path() {
    match parse(&["report", "data/bhubaneswar_stations_ucb.json", "--stations"]) {
        Commands::Report(args) => {
            assert_eq!(
                args.path,
                PathBuf::from("data/bhubaneswar_stations_ucb.json")
            );
            assert!(args.stations);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_unknown_algorithm() {
    let result = Cli::try_parse_from(["evplace", "optimize", "--algorithm", "thompson"]);
    assert!(result.is_err());
}

#[test]
fn report_requires_path() {
    assert!(Cli::try_parse_from(["evplace", "report"]).is_err());
}
