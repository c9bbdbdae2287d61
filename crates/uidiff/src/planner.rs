//! End-to-end pipeline: compare, diagnose, then plan a blueprint per issue.

pub use uidiff_planner::*;

use crate::summary::{MatchingSummary, Metrics};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use uidiff_core::{Comparison, DiagnosticReport, Engine, SemanticGraph};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Compare(#[from] uidiff_core::Error),
    #[error("Failed to encode {name}: {source}")]
    Encode {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// The serializable result handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub semantic_graph_design: SemanticGraph,
    pub semantic_graph_runtime: SemanticGraph,
    pub matching: MatchingSummary,
    pub diagnostic_report: DiagnosticReport,
    pub blueprints: Vec<ModificationBlueprint>,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintFile {
    pub report_id: String,
    pub blueprints: Vec<ModificationBlueprint>,
}

/// One finished comparison with its blueprints.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    pub comparison: Comparison,
    pub blueprints: Vec<ModificationBlueprint>,
}

pub const STEP_FILES: [&str; 5] = [
    "step1_design.json",
    "step1_runtime.json",
    "step2_matching.json",
    "step3_diagnostic.json",
    "step4_blueprints.json",
];

impl PipelineRun {
    pub fn report_id(&self) -> &str {
        &self.comparison.report.report_id
    }

    pub fn output(&self) -> ComparisonOutput {
        let c = &self.comparison;
        ComparisonOutput {
            semantic_graph_design: c.design.clone(),
            semantic_graph_runtime: c.runtime.clone(),
            matching: MatchingSummary::from(&c.matching),
            diagnostic_report: c.report.clone(),
            blueprints: self.blueprints.clone(),
            metrics: Metrics::from_comparison(c),
        }
    }

    /// Writes the intermediate artifacts as pretty JSON into `out_root/<report_id>/` and
    /// returns that directory.
    pub fn write_steps(&self, out_root: &Path) -> PipelineResult<PathBuf> {
        let dir = out_root.join(self.report_id());
        fs::create_dir_all(&dir).map_err(|source| PipelineError::Write {
            path: dir.clone(),
            source,
        })?;

        let c = &self.comparison;
        let blueprints = BlueprintFile {
            report_id: c.report.report_id.clone(),
            blueprints: self.blueprints.clone(),
        };
        let payloads = [
            serde_json::to_string_pretty(&c.design),
            serde_json::to_string_pretty(&c.runtime),
            serde_json::to_string_pretty(&c.matching),
            serde_json::to_string_pretty(&c.report),
            serde_json::to_string_pretty(&blueprints),
        ];
        for (name, payload) in STEP_FILES.into_iter().zip(payloads) {
            let text = payload.map_err(|source| PipelineError::Encode { name, source })?;
            let path = dir.join(name);
            fs::write(&path, text).map_err(|source| PipelineError::Write { path, source })?;
        }
        tracing::debug!(dir = %dir.display(), "wrote step files");
        Ok(dir)
    }
}

/// Compares both inputs and plans every resulting issue. Node, report and plan ids come
/// from one generator in the engine's id mode.
pub async fn compare_and_plan(
    engine: &Engine,
    planner: &Planner,
    design: &Value,
    runtime: &Value,
) -> PipelineResult<PipelineRun> {
    let mut ids = engine.id_generator();
    let comparison = engine.compare_with_ids(design, runtime, &mut ids)?;
    let blueprints = planner
        .plan_report(&comparison.report, &comparison.design, &mut ids)
        .await;
    Ok(PipelineRun {
        comparison,
        blueprints,
    })
}

/// Synchronous variant of [`compare_and_plan`], driven by a local executor.
pub fn compare_and_plan_sync(
    engine: &Engine,
    planner: &Planner,
    design: &Value,
    runtime: &Value,
) -> PipelineResult<PipelineRun> {
    futures::executor::block_on(compare_and_plan(engine, planner, design, runtime))
}
