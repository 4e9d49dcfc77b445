use std::fs;
use std::path::PathBuf;

use evplace::bandit::Algorithm;
use evplace::config::Config;
use evplace::placement::ArmLayout;
use evplace::test_utils::fixtures::UnitTestFixture;
use evplace::test_utils::{TestCase, run_table_tests};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn config_city_and_centers_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "default",
            input: "tests/fixtures/configs/default.toml",
            expected: ("Bhubaneswar".to_string(), 5usize, "bhubaneswar".to_string()),
            should_panic: false,
        },
        TestCase {
            name: "custom",
            input: "tests/fixtures/configs/custom.toml",
            expected: ("Cuttack".to_string(), 2usize, "cuttack".to_string()),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |relative_path| {
        let content = fs::read_to_string(fixture_path(relative_path)).expect("read fixture");
        let config = Config::from_toml_str(&content).expect("parse config");
        (
            config.city.name.clone(),
            config.demand_centers.len(),
            config.city.slug(),
        )
    })?;
    Ok(())
}

#[test]
fn config_optimizer_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "default",
            input: "tests/fixtures/configs/default.toml",
            expected: (25usize, 10usize, Algorithm::Ucb, None, ArmLayout::Resample),
            should_panic: false,
        },
        TestCase {
            name: "custom",
            input: "tests/fixtures/configs/custom.toml",
            expected: (
                8usize,
                30usize,
                Algorithm::EpsilonGreedy,
                Some(1234u64),
                ArmLayout::Frozen,
            ),
            should_panic: false,
        },
        TestCase {
            name: "partial keeps defaults",
            input: "tests/fixtures/configs/partial.toml",
            expected: (25usize, 50usize, Algorithm::Ucb, None, ArmLayout::Resample),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |relative_path| {
        let content = fs::read_to_string(fixture_path(relative_path)).expect("read fixture");
        let config = Config::from_toml_str(&content).expect("parse config");
        (
            config.optimizer.num_stations,
            config.optimizer.num_episodes,
            config.optimizer.algorithm,
            config.optimizer.seed,
            config.optimizer.arm_layout,
        )
    })?;
    Ok(())
}

#[test]
fn policy_parameters_from_fixture() {
    let content =
        fs::read_to_string(fixture_path("tests/fixtures/configs/custom.toml")).unwrap();
    let config = Config::from_toml_str(&content).unwrap();
    assert!((config.epsilon_greedy.epsilon - 0.5).abs() < f64::EPSILON);
    assert!((config.epsilon_greedy.decay - 0.9).abs() < f64::EPSILON);
    assert!((config.epsilon_greedy.min_epsilon - 0.05).abs() < f64::EPSILON);
    assert!((config.ucb.exploration - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.output.dir, PathBuf::from("results"));

    let partial =
        fs::read_to_string(fixture_path("tests/fixtures/configs/partial.toml")).unwrap();
    let config = Config::from_toml_str(&partial).unwrap();
    assert!((config.ucb.exploration - 1.5).abs() < f64::EPSILON);
}

#[test]
fn invalid_bounds_fixture_rejected() {
    let content =
        fs::read_to_string(fixture_path("tests/fixtures/configs/invalid_bounds.toml")).unwrap();
    assert!(Config::from_toml_str(&content).is_err());
}

#[test]
fn explicit_config_file_is_loaded() {
    let fixture = UnitTestFixture::new();
    let path = fixture.create_file(
        "custom.toml",
        &fs::read_to_string(fixture_path("tests/fixtures/configs/custom.toml")).unwrap(),
    );
    let config = Config::load(Some(&path), &fixture.data_path).unwrap();
    assert_eq!(config.city.name, "Cuttack");
    assert_eq!(config.optimizer.num_stations, 8);
}

#[test]
fn project_config_file_is_merged() {
    let fixture = UnitTestFixture::new();
    let _ = fixture.create_project_config("[optimizer]\nnum_stations = 12\n");
    let config = Config::load(None, &fixture.data_path).unwrap();
    assert_eq!(config.optimizer.num_stations, 12);
    assert_eq!(config.demand_centers.len(), 5);
}

#[test]
fn invalid_project_config_is_an_error() {
    let fixture = UnitTestFixture::new();
    let _ = fixture.create_project_config("[optimizer\nnum_stations = ");
    assert!(Config::load(None, &fixture.data_path).is_err());
}
