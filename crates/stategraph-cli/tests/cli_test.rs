use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn stdout_of(args: &[&str]) -> String {
    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    let assert = Command::new(exe).args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn validate_prints_ok() {
    let path = fixture("basic_graph.json");
    let out = stdout_of(&["validate", path.to_string_lossy().as_ref()]);
    assert_eq!(out.trim(), "ok");
}

#[test]
fn validate_reports_the_dangling_link() {
    let path = fixture("broken_graph.json");
    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    let assert = Command::new(exe)
        .args(["validate", path.to_string_lossy().as_ref()])
        .assert()
        .failure()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("link #1 has unknown target `Z`"), "{stderr}");
}

#[test]
fn render_prints_svg_and_warns_on_stderr() {
    let path = fixture("basic_graph.json");
    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    let assert = Command::new(exe)
        .args(["render", "--id", "demo", path.to_string_lossy().as_ref()])
        .assert()
        .success();
    let output = assert.get_output();
    let svg = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(svg.starts_with(r#"<svg id="demo""#));
    assert!(svg.contains(">Visit frequency</text>"));
    assert!(svg.contains(">Needs work</text>"));
    assert!(svg.contains("What is 3 + 3?"));
    assert!(stderr.contains("warning: opacity 1.4 for state `END`"), "{stderr}");
}

#[test]
fn render_json_emits_the_scene() {
    let path = fixture("basic_graph.json");
    let out = stdout_of(&["render", "--format", "json", path.to_string_lossy().as_ref()]);
    let scene: Value = serde_json::from_str(&out).expect("scene json");

    let nodes = scene["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0]["fill"], "olive");
    assert_eq!(nodes[2]["fill"], "pink");
    assert_eq!(nodes[3]["fill"], "green");
    assert_eq!(scene["links"].as_array().map(Vec::len), Some(4));
    assert_eq!(scene["legend"]["rows"].as_array().map(Vec::len), Some(2));
    assert!(scene["canvasWidth"].as_f64().unwrap() >= 680.0);
}

#[test]
fn layout_emits_positions_per_node() {
    let path = fixture("basic_graph.json");
    let out = stdout_of(&["layout", path.to_string_lossy().as_ref()]);
    let layout: Value = serde_json::from_str(&out).expect("layout json");
    let positions = layout["positions"].as_object().expect("positions");
    let keys: Vec<&str> = positions.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["intro", "q1", "hint", "END"]);
    assert_eq!(positions["intro"]["y"], 20.0);
}

#[test]
fn out_flag_writes_a_file() {
    let path = fixture("basic_graph.json");
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("graph.svg");

    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    Command::new(exe)
        .args([
            "render",
            "--out",
            out.to_string_lossy().as_ref(),
            path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn config_overrides_are_merged() {
    let path = fixture("basic_graph.json");
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = tmp.path().join("viz.json");
    fs::write(&cfg, r#"{"minCanvasWidth": 900, "legend": {"x": 500}}"#).expect("write config");

    let svg = stdout_of(&[
        "render",
        "--config",
        cfg.to_string_lossy().as_ref(),
        path.to_string_lossy().as_ref(),
    ]);
    assert!(svg.contains(r#"width="900""#), "{svg}");

    fs::write(&cfg, r#"{"maxLabelLength": 1}"#).expect("write config");
    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    Command::new(exe)
        .args([
            "validate",
            "--config",
            cfg.to_string_lossy().as_ref(),
            path.to_string_lossy().as_ref(),
        ])
        .assert()
        .code(1);
}

#[test]
fn reads_stdin_and_fills_in_reachability() {
    let doc = r#"{
        "initStateId": "A",
        "nodes": [
            {"id": "A", "hashId": "A", "name": "Start"},
            {"id": "B", "hashId": "B", "name": "Island"},
            {"id": "END", "hashId": "END", "name": "END"}
        ],
        "links": [{"source": "A", "target": "END"}]
    }"#;

    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    let assert = assert_cmd::Command::new(exe)
        .args(["render", "--format", "json", "--reachability", "-"])
        .write_stdin(doc)
        .assert()
        .success();
    let scene: Value = serde_json::from_slice(&assert.get_output().stdout).expect("scene json");
    let island = &scene["nodes"][1];
    assert_eq!(island["fill"], "pink");
    assert_eq!(
        island["tooltip"],
        "Island (Warning: this state is unreachable.)"
    );
}

#[test]
fn usage_errors_exit_with_two() {
    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    Command::new(exe)
        .args(["render", "--format", "png"])
        .assert()
        .code(2);

    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    Command::new(exe).args(["--bogus"]).assert().code(2);
}

#[test]
fn diff_json_reports_statuses_and_link_counts() {
    let old = fixture("version_old.json");
    let new = fixture("version_new.json");
    let out = stdout_of(&[
        "diff",
        "--format",
        "json",
        old.to_string_lossy().as_ref(),
        new.to_string_lossy().as_ref(),
    ]);
    let diff: Value = serde_json::from_str(&out).expect("diff json");

    let statuses: Vec<(&str, &str)> = diff["states"]
        .as_array()
        .expect("states")
        .iter()
        .map(|s| {
            (
                s["stableId"].as_str().unwrap_or_default(),
                s["status"].as_str().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("s1", "renamed"),
            ("s2", "changed"),
            ("s4", "added"),
            ("END", "unchanged"),
            ("s3", "deleted"),
        ]
    );
    assert_eq!(diff["links"]["total"], 5);
    assert_eq!(diff["links"]["added"], 2);
    assert_eq!(diff["links"]["deleted"], 2);
}

#[test]
fn diff_svg_colors_states_by_change() {
    let old = fixture("version_old.json");
    let new = fixture("version_new.json");
    let svg = stdout_of(&[
        "diff",
        old.to_string_lossy().as_ref(),
        new.to_string_lossy().as_ref(),
    ]);
    assert!(svg.contains("Welcome (was: Intro)"));
    assert!(svg.contains(r#"stroke="rgb(255, 215, 0)""#));
    assert!(svg.contains(">Renamed</text>"));
    assert!(svg.contains(">Deleted</text>"));
    assert!(!svg.contains("delete-target"));
}

#[test]
fn diff_needs_two_inputs() {
    let old = fixture("version_old.json");
    let exe = assert_cmd::cargo_bin!("stategraph-cli");
    Command::new(exe)
        .args(["diff", old.to_string_lossy().as_ref()])
        .assert()
        .code(2);
}
