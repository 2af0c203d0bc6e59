//! Description files on disk, through the library and the `trellis` binary

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;
use trellis_cli::{commands, AppConfig, ConfigError};

const CAPPED: &str = r#"
app = "App"

[[stacks]]
id = "Stack"
topics = [{ id = "Topic1" }, { id = "Topic2" }, { id = "Topic3" }]

[[stacks.sinks]]
id = "MySinkQueue"
max_connections = 3
connect = ["Topic1", "Topic2", "Topic3"]
"#;

const UNDER_WIRED: &str = "
stacks:
  - id: Stack
    topics:
      - id: Topic1
      - id: Topic2
      - id: Topic3
    sinks:
      - id: MySinkQueue
        max_connections: 5
        expected_connections: 5
        connect: [Topic1, Topic2, Topic3]
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn trellis(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_trellis"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn capped_description_synthesizes_four_entries() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "capped.toml", CAPPED);

    let report = commands::synth(&AppConfig::load(&path).unwrap()).unwrap();
    assert!(report.is_success());

    let manifest: serde_json::Value = serde_json::from_str(&report.output).unwrap();
    let keys: Vec<_> = manifest.as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            "App/Stack/MySinkQueue",
            "App/Stack/Topic1",
            "App/Stack/Topic2",
            "App/Stack/Topic3",
        ]
    );
}

#[test]
fn under_wired_yaml_reports_one_problem() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "under.yaml", UNDER_WIRED);

    let report = commands::validate(&AppConfig::load(&path).unwrap()).unwrap();
    let rendered: Vec<_> = report.problems.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["[App/Stack/MySinkQueue] expected 5 connections, found 3"]
    );
}

#[test]
fn load_errors_are_typed() {
    let dir = TempDir::new().unwrap();

    let json = write(&dir, "stack.json", "{}");
    assert!(matches!(
        AppConfig::load(&json),
        Err(ConfigError::UnsupportedFormat(_))
    ));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(AppConfig::load(&missing), Err(ConfigError::Io { .. })));

    let broken = write(&dir, "broken.yml", "stacks: [");
    assert!(matches!(AppConfig::load(&broken), Err(ConfigError::Yaml(_))));
}

#[test]
fn binary_writes_manifest_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "capped.toml", CAPPED);
    let out = dir.path().join("manifest.json");

    let output = trellis(&[
        "synth",
        "--config",
        config.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(manifest.as_object().unwrap().len(), 4);
}

#[test]
fn binary_exits_one_on_problems() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "under.yml", UNDER_WIRED);

    let output = trellis(&["synth", "--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[App/Stack/MySinkQueue] expected 5 connections, found 3"));
}

#[test]
fn binary_prints_tree() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "capped.toml", CAPPED);

    let output = trellis(&["tree", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let paths: Vec<_> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(
        paths,
        vec![
            "App",
            "App/Stack",
            "App/Stack/MySinkQueue",
            "App/Stack/Topic1",
            "App/Stack/Topic2",
            "App/Stack/Topic3",
        ]
    );
}
