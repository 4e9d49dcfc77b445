//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

/// `evplace` binary running inside `dir` with no ambient configuration.
pub fn evplace_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("evplace").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("EVPLACE_CONFIG")
        .env_remove("EVPLACE_ROBOT")
        .env_remove("RUST_LOG")
        .arg("--quiet");
    cmd
}

/// Parse the robot envelope printed on stdout and return its `data` field.
pub fn robot_data(stdout: &[u8]) -> serde_json::Value {
    let value: serde_json::Value = serde_json::from_slice(stdout).expect("robot output is JSON");
    assert_eq!(value["status"], "ok", "unexpected envelope: {value}");
    value["data"].clone()
}
