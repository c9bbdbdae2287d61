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

fn fixture(name: &str) -> String {
    let path = repo_root().join("fixtures").join("checkout").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path.to_string_lossy().to_string()
}

fn run_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("uidiff-cli");
    let out = Command::new(exe)
        .args(args)
        .env_remove("UIDIFF_TIMING")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).expect("stdout is JSON")
}

fn issue_types(out: &Value) -> Vec<String> {
    out["diagnostic_report"]["issues"]
        .as_array()
        .expect("issues array")
        .iter()
        .map(|i| i["type"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn compare_reports_cta_rewrite_and_missing_banner() {
    let out = run_json(&[
        "compare",
        "--deterministic-ids",
        &fixture("design.json"),
        &fixture("runtime.json"),
    ]);
    assert_eq!(issue_types(&out), ["TEXT_MISMATCH", "MISSING_WIDGET"]);
    assert_eq!(out["diagnostic_report"]["report_id"], "diff_00000010");
    assert_eq!(out["semantic_graph_runtime"]["meta"]["resolution"], serde_json::json!([375, 812]));
    assert_eq!(out["metrics"]["difference_count"], 1);
    assert_eq!(out["metrics"]["total_components"], 5);

    let blueprints = out["blueprints"].as_array().unwrap();
    assert_eq!(blueprints.len(), 2);
    assert_eq!(blueprints[0]["action_type"], "MODIFY_TEXT");
    assert_eq!(blueprints[0]["location_hint"]["search_text"], "去下单");
    assert_eq!(blueprints[1]["action_type"], "ADD_COMPONENT");
    assert_eq!(blueprints[1]["location_hint"]["anchors"]["parent_role"], "container");
}

#[test]
fn compare_writes_step_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out_dir = tmp.path().to_string_lossy().to_string();
    let out = run_json(&[
        "compare",
        "--deterministic-ids",
        "--out-dir",
        &out_dir,
        &fixture("design.json"),
        &fixture("runtime.json"),
    ]);
    let report_id = out["diagnostic_report"]["report_id"].as_str().unwrap();
    let dir = tmp.path().join(report_id);
    for name in [
        "step1_design.json",
        "step1_runtime.json",
        "step2_matching.json",
        "step3_diagnostic.json",
        "step4_blueprints.json",
    ] {
        assert!(dir.join(name).is_file(), "{name} not written");
    }
    let step4: Value =
        serde_json::from_str(&fs::read_to_string(dir.join("step4_blueprints.json")).unwrap())
            .unwrap();
    assert_eq!(step4["report_id"], report_id);
    assert_eq!(step4["blueprints"], out["blueprints"]);
}

#[test]
fn compare_points_text_fix_at_project_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("Checkout.tsx"), "<Button>去下单</Button>\n").unwrap();

    let out = run_json(&[
        "compare",
        "--project-root",
        tmp.path().to_string_lossy().as_ref(),
        &fixture("design.json"),
        &fixture("runtime.json"),
    ]);
    let target = out["blueprints"][0]["target_file"].as_str().unwrap();
    assert_eq!(Path::new(target), Path::new("src").join("Checkout.tsx"));
}

#[test]
fn graph_flattens_runtime_tree() {
    let out = run_json(&["graph", "--source", "runtime", &fixture("runtime.json")]);
    assert_eq!(out["meta"]["source"], "runtime");
    assert_eq!(out["meta"]["node_count"], 4);
    let labels: Vec<&str> = out["elements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"]["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["container", "text", "text", "button"]);
}

#[test]
fn match_prints_pairs_and_leftovers() {
    let out = run_json(&["match", &fixture("design.json"), &fixture("runtime.json")]);
    assert_eq!(out["matches"].as_array().unwrap().len(), 4);
    assert_eq!(out["missing"].as_array().unwrap().len(), 1);
    assert_eq!(out["missing"][0]["type"]["label"], "image");
    assert!(out["added"].as_array().unwrap().is_empty());
}

#[test]
fn yaml_config_overrides_cutoff() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = tmp.path().join("strict.yaml");
    fs::write(&cfg, "matcher:\n  thresholds:\n    match_cutoff: 0.01\n").unwrap();
    let out = run_json(&[
        "match",
        "--config",
        cfg.to_string_lossy().as_ref(),
        &fixture("design.json"),
        &fixture("runtime.json"),
    ]);
    // Only the untouched header title survives such a strict cutoff.
    assert_eq!(out["matches"].as_array().unwrap().len(), 1);
}

#[test]
fn empty_input_exits_with_missing_input_code() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let empty = tmp.path().join("empty.json");
    fs::write(&empty, "  \n").unwrap();
    let exe = assert_cmd::cargo_bin!("uidiff-cli");
    Command::new(exe)
        .args([
            "compare",
            empty.to_string_lossy().as_ref(),
            fixture("runtime.json").as_str(),
        ])
        .assert()
        .code(3);
}

#[test]
fn bad_arguments_exit_with_usage_code() {
    let exe = assert_cmd::cargo_bin!("uidiff-cli");
    Command::new(exe)
        .args(["match", "only-one.json"])
        .assert()
        .code(2);
}

#[test]
fn timing_switch_reports_stages_on_stderr() {
    let exe = assert_cmd::cargo_bin!("uidiff-cli");
    let out = Command::new(exe)
        .args(["compare", &fixture("design.json"), &fixture("runtime.json")])
        .env("UIDIFF_TIMING", "1")
        .assert()
        .success()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("[uidiff-timing] command=compare"), "{stderr}");
    assert!(stderr.contains("plan="), "{stderr}");
}
