//! CLI integration tests for dtugraph
//!
//! Tests the dtugraph CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const GRAPH_JSON: &str = r#"{
    "nodes": [
        {"id": "A", "label": "Attention", "tier": "regular"},
        {"id": "B", "label": "Backprop", "tier": "mega", "resonance": 0.5},
        {"id": "C", "label": "Compression", "tier": "hyper"},
        {"id": "D", "label": "Dreams", "tier": "shadow"}
    ],
    "edges": [
        {"source": "A", "target": "B", "type": "supports"},
        {"source": "B", "target": "C"},
        {"source": "C", "target": "ghost"}
    ]
}"#;

/// Temp dir holding a graph file and an isolated config directory
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("graph.json"), GRAPH_JSON).unwrap();
        Self { dir }
    }

    fn graph(&self) -> PathBuf {
        self.dir.path().join("graph.json")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Command with the config directory pointed at the temp dir
    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dtugraph").unwrap();
        cmd.env("DTUGRAPH_CONFIG_DIR", self.dir.path().join("config"));
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_stats_text() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("stats")
        .arg(fx.graph())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Nodes:         4"))
        .stdout(predicate::str::contains("Dangling Edges:      1"))
        .stdout(predicate::str::contains("supports"));
}

#[test]
fn test_stats_json() {
    let fx = Fixture::new();
    let output = fx
        .cmd()
        .args(["--format", "json", "stats"])
        .arg(fx.graph())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["total_nodes"], 4);
    assert_eq!(stats["nodes_by_tier"]["mega"], 1);
    assert_eq!(stats["average_resonance"], 0.5);
}

#[test]
fn test_view_filters_tiers_and_highlights_focus() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("view")
        .arg(fx.graph())
        .args(["-t", "regular", "-t", "mega", "-t", "hyper", "--focus", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visible:  3 nodes, 2 edges (1 dropped)"))
        .stdout(predicate::str::contains("Focus:    A (2 focused, 1 faded)"))
        .stdout(predicate::str::contains("Dreams").not());
}

#[test]
fn test_view_json_snapshot() {
    let fx = Fixture::new();
    let output = fx
        .cmd()
        .arg("--format=json")
        .arg("view")
        .arg(fx.graph())
        .args(["--query", "COMP", "--select", "B", "--layout", "concentric"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["layout"]["kind"], "concentric");
    assert_eq!(snapshot["layout"]["algorithm"]["name"], "concentric");
    assert_eq!(snapshot["selected"], "B");
    assert_eq!(snapshot["query"], "COMP");

    let nodes = snapshot["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    let matched: Vec<&str> = nodes
        .iter()
        .filter(|n| n["search_match"] == true)
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(matched, vec!["C"]);
}

#[test]
fn test_view_selection_of_unknown_node() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("view")
        .arg(fx.graph())
        .args(["--select", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected: nope (not loaded)"));
}

#[test]
fn test_view_rejects_unknown_tier() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("view")
        .arg(fx.graph())
        .args(["--tier", "legendary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tier"));
}

#[test]
fn test_invalid_graph_file_reports_hint() {
    let fx = Fixture::new();
    let bad = fx.path("bad.json");
    std::fs::write(&bad, "{\"nodes\": \"oops\"}").unwrap();

    fx.cmd()
        .arg("stats")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("E001"));
}

#[test]
fn test_missing_graph_file() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["stats", "does-not-exist.json"])
        .current_dir(fx.dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read graph file"));
}

#[test]
fn test_export_to_file() {
    let fx = Fixture::new();
    let out = fx.path("snapshot.json");

    fx.cmd()
        .arg("export")
        .arg(fx.graph())
        .args(["--tier", "hyper", "--layout", "grid", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 nodes and 0 edges"));

    let snapshot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(snapshot["nodes"][0]["id"], "C");
    assert_eq!(snapshot["nodes"][0]["size"], 56.0);
    assert!(snapshot["nodes"][0]["position"].is_object());
    assert_eq!(snapshot["layout"]["animate"], false);
}

#[test]
fn test_config_roundtrip() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["config", "set", "view.layout", "circle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set view.layout = circle"));

    fx.cmd()
        .args(["config", "get", "view.layout"])
        .assert()
        .success()
        .stdout(predicate::str::diff("circle\n"));

    fx.cmd()
        .arg("view")
        .arg(fx.graph())
        .assert()
        .success()
        .stdout(predicate::str::contains("Layout:   circle"));

    fx.cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("relayout.timeout_ms = 10000"));

    fx.cmd().args(["config", "reset"]).assert().success();

    fx.cmd()
        .args(["config", "get", "view.layout"])
        .assert()
        .success()
        .stdout(predicate::str::diff("force\n"));
}

#[test]
fn test_config_default_tiers_apply_to_view() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "set", "view.default_tiers", "shadow"])
        .assert()
        .success();

    fx.cmd()
        .arg("view")
        .arg(fx.graph())
        .assert()
        .success()
        .stdout(predicate::str::contains("Visible:  1 nodes, 0 edges"))
        .stdout(predicate::str::contains("Dreams"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "get", "view.colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
