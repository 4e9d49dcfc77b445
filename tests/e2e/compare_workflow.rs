use serde_json::Value;
use tempfile::tempdir;

use super::common::{evplace_in, robot_data};

#[test]
fn compare_writes_both_reports() {
    let dir = tempdir().unwrap();
    let output = evplace_in(dir.path())
        .args([
            "--robot",
            "compare",
            "--stations",
            "8",
            "--episodes",
            "5",
            "--seed",
            "3",
            "--output-dir",
            "out",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let data = robot_data(&output.stdout);
    let runs = data["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["algorithm"], "ucb");
    assert_eq!(runs[1]["algorithm"], "epsilon_greedy");
    assert!(data["winner"].is_string());

    for (file, algorithm) in [
        ("bhubaneswar_stations_ucb.json", "UCB (Multi-Armed Bandit)"),
        (
            "bhubaneswar_stations_epsilon.json",
            "Epsilon-Greedy (Multi-Armed Bandit)",
        ),
    ] {
        let raw = std::fs::read_to_string(dir.path().join("out").join(file)).unwrap();
        let report: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(report["algorithm"], algorithm);
        assert_eq!(report["num_episodes"], 5);
        assert_eq!(report["stations"].as_array().unwrap().len(), 8);
    }
}

#[test]
fn compare_human_output_names_both_algorithms() {
    let dir = tempdir().unwrap();
    let output = evplace_in(dir.path())
        .args(["compare", "--stations", "4", "--episodes", "2", "--seed", "9"])
        .env("NO_COLOR", "1")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("UCB (Multi-Armed Bandit)"));
    assert!(stdout.contains("Epsilon-Greedy (Multi-Armed Bandit)"));
    assert!(stdout.contains("Comparison"));
    assert!(dir.path().join("data/bhubaneswar_stations_epsilon.json").exists());
}
