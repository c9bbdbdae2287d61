#![cfg(feature = "planner")]

use serde_json::{Value, json};
use uidiff::planner::{ActionType, BlueprintFile, Planner, STEP_FILES, compare_and_plan_sync};
use uidiff::{Engine, IssueKind, Severity};

fn checkout_design() -> Value {
    json!([
        { "box": [0, 0, 375, 812], "label": "container" },
        { "box": [16, 20, 200, 60], "label": "text", "text": "Checkout" },
        { "box": [20, 400, 180, 440], "label": "text", "text": "合计: ¥100" },
        { "box": [200, 730, 355, 790], "label": "button", "text": "立即下单" }
    ])
}

fn checkout_runtime() -> Value {
    json!([
        { "box": [0, 0, 375, 812], "label": "container" },
        { "box": [16, 20, 200, 60], "label": "text", "text": "Checkout" },
        { "box": [20, 400, 180, 440], "label": "text", "text": "合计: ¥120" },
        { "box": [200, 730, 355, 790], "label": "button", "text": "去下单" }
    ])
}

#[test]
fn checkout_flow_reports_cta_rewrite_only() {
    let engine = Engine::new().with_sequential_ids();
    let run =
        compare_and_plan_sync(&engine, &Planner::new(), &checkout_design(), &checkout_runtime())
            .unwrap();

    let issues = &run.comparison.report.issues;
    assert_eq!(issues.len(), 2, "{issues:?}");
    // The price line differs by one digit and is reported as a typo.
    assert_eq!(issues[0].kind, IssueKind::TextTypo);
    assert_eq!(issues[1].kind, IssueKind::TextMismatch);
    assert_eq!(issues[1].severity, Severity::Major);

    let out = run.output();
    assert_eq!(out.blueprints.len(), 2);
    assert_eq!(out.blueprints[1].action_type, ActionType::ModifyText);
    assert_eq!(
        out.blueprints[1].location_hint.search_text.as_deref(),
        Some("去下单")
    );
    assert_eq!(out.metrics.difference_count, 0);
    assert_eq!(out.metrics.match_rate, 100.0);
    assert_eq!(out.metrics.completeness, 50.0);
    assert_eq!(out.matching.matches.len(), 4);

    let value = serde_json::to_value(&out).unwrap();
    for key in [
        "semantic_graph_design",
        "semantic_graph_runtime",
        "matching",
        "diagnostic_report",
        "blueprints",
        "metrics",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn identical_inputs_plan_no_action() {
    let engine = Engine::new().with_sequential_ids();
    let run =
        compare_and_plan_sync(&engine, &Planner::new(), &checkout_design(), &checkout_design())
            .unwrap();
    assert!(run.comparison.report.is_clean());
    assert_eq!(run.blueprints.len(), 1);
    assert_eq!(run.blueprints[0].action_type, ActionType::NoAction);
}

#[test]
fn step_files_land_under_report_id() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = Engine::new().with_sequential_ids();
    let run =
        compare_and_plan_sync(&engine, &Planner::new(), &checkout_design(), &checkout_runtime())
            .unwrap();
    let dir = run.write_steps(tmp.path()).unwrap();
    assert_eq!(dir, tmp.path().join(run.report_id()));
    for name in STEP_FILES {
        assert!(dir.join(name).is_file(), "{name} not written");
    }
    let text = std::fs::read_to_string(dir.join("step4_blueprints.json")).unwrap();
    let file: BlueprintFile = serde_json::from_str(&text).unwrap();
    assert_eq!(file.report_id, run.report_id());
    assert_eq!(file.blueprints, run.blueprints);
}

#[test]
fn missing_input_is_an_error() {
    let engine = Engine::new();
    let err = compare_and_plan_sync(&engine, &Planner::new(), &Value::Null, &checkout_runtime())
        .unwrap_err();
    assert!(matches!(
        err,
        uidiff::planner::PipelineError::Compare(uidiff::Error::MissingInput { .. })
    ));
}
