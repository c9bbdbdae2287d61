#![forbid(unsafe_code)]

//! Design-vs-runtime UI comparison (headless).
//!
//! Two sets of UI element boxes (a design mockup and a rendered screen) are turned into
//! semantic graphs, paired one-to-one per page zone by a cost-minimizing assignment, and
//! diffed into a severity-ranked diagnostic report.
//!
//! Design goals:
//! - pure functions of input + configuration (no I/O, no state between calls)
//! - deterministic, testable outputs when a sequential id source is used
//! - runtime-agnostic async APIs (no specific executor required)

pub mod assignment;
pub mod builder;
pub mod config;
pub mod context;
pub mod differ;
pub mod error;
pub mod geom;
pub mod id;
pub mod input;
pub mod matcher;
pub mod model;
pub mod report;
pub mod text;

pub use builder::GraphBuilder;
pub use config::CompareConfig;
pub use context::IssueContext;
pub use differ::Differ;
pub use error::{Error, Result};
pub use id::{IdGenerator, IdMode};
pub use input::{GraphInput, RawDetection};
pub use matcher::FuzzyMatcher;
pub use model::{GraphMeta, MatchPair, MatchResult, Node, SemanticGraph, Source, Zone};
pub use report::{DiagnosticReport, Direction, Issue, IssueKind, Severity};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything one comparison produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub design: SemanticGraph,
    pub runtime: SemanticGraph,
    pub matching: MatchResult,
    pub report: DiagnosticReport,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: CompareConfig,
    id_mode: IdMode,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, overrides: CompareConfig) -> Self {
        // Merge onto defaults so partial overrides keep the remaining thresholds.
        self.config.deep_merge(overrides.as_value());
        self
    }

    pub fn with_id_mode(mut self, mode: IdMode) -> Self {
        self.id_mode = mode;
        self
    }

    /// Uses zero-padded counters instead of random ids.
    ///
    /// This exists primarily to make fixture snapshots deterministic.
    pub fn with_sequential_ids(self) -> Self {
        self.with_id_mode(IdMode::Sequential)
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    pub fn id_mode(&self) -> IdMode {
        self.id_mode
    }

    /// A fresh id source in this engine's mode; one per comparison.
    pub fn id_generator(&self) -> IdGenerator {
        IdGenerator::new(self.id_mode)
    }

    /// Builds one side. A ready graph passes through unmodified.
    pub fn build_graph(
        &self,
        input: &GraphInput,
        source: Source,
        ids: &mut IdGenerator,
    ) -> Result<SemanticGraph> {
        if let GraphInput::Graph(graph) = input {
            return Ok(graph.clone());
        }
        let detections = input.detections();
        let [width, height] = input.infer_resolution(&detections);
        let builder = GraphBuilder::new(width, height, source).with_config(self.config.builder()?);
        Ok(builder.build_with_ids(&detections, ids))
    }

    /// Matches and diffs two ready graphs.
    pub fn compare_graphs_sync(
        &self,
        design: SemanticGraph,
        runtime: SemanticGraph,
        ids: &mut IdGenerator,
    ) -> Result<Comparison> {
        let matcher = FuzzyMatcher::new(self.config.matcher()?);
        let differ = Differ::new(self.config.differ()?);

        let matching = matcher.run(&design, &runtime);
        let report =
            differ.analyze_with_ids(&matching, Some(&design.meta), Some(&runtime.meta), ids);
        tracing::debug!(
            report_id = %report.report_id,
            matched = matching.matches.len(),
            issues = report.issues.len(),
            "compared graphs"
        );
        Ok(Comparison {
            design,
            runtime,
            matching,
            report,
        })
    }

    /// Like [`Engine::compare_sync`], drawing ids from `ids`.
    pub fn compare_with_ids(
        &self,
        design: &Value,
        runtime: &Value,
        ids: &mut IdGenerator,
    ) -> Result<Comparison> {
        let design_input = GraphInput::from_value(design, Source::Design)?;
        let runtime_input = GraphInput::from_value(runtime, Source::Runtime)?;
        let design = self.build_graph(&design_input, Source::Design, ids)?;
        let runtime = self.build_graph(&runtime_input, Source::Runtime, ids)?;
        self.compare_graphs_sync(design, runtime, ids)
    }

    /// Synchronous variant of [`Engine::compare`].
    ///
    /// The work is CPU-bound and does not perform I/O.
    pub fn compare_sync(&self, design: &Value, runtime: &Value) -> Result<Comparison> {
        self.compare_with_ids(design, runtime, &mut self.id_generator())
    }

    pub async fn compare(&self, design: &Value, runtime: &Value) -> Result<Comparison> {
        self.compare_sync(design, runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_side_is_the_only_hard_error() {
        let engine = Engine::new();
        let design = json!([{ "box": [0, 0, 10, 10], "label": "text" }]);
        let err = engine.compare_sync(&design, &Value::Null).unwrap_err();
        assert!(matches!(err, Error::MissingInput { side: Source::Runtime }));
        let err = engine.compare_sync(&json!(""), &design).unwrap_err();
        assert!(matches!(err, Error::MissingInput { side: Source::Design }));
    }

    #[test]
    fn invalid_override_is_reported() {
        let engine = Engine::new().with_config(CompareConfig::from_value(json!({
            "matcher": { "thresholds": { "match_cutoff": "high" } }
        })));
        let side = json!([{ "box": [0, 0, 10, 10], "label": "text" }]);
        let err = engine.compare_sync(&side, &side).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let engine = Engine::new().with_config(CompareConfig::from_value(json!({
            "matcher": { "thresholds": { "match_cutoff": 0.5 } }
        })));
        let matcher = engine.config().matcher().unwrap();
        assert_eq!(matcher.thresholds.match_cutoff, 0.5);
        assert_eq!(matcher.weights.geo, 0.4);
    }

    #[test]
    fn ready_graph_passes_through() {
        let engine = Engine::new().with_sequential_ids();
        let mut ids = engine.id_generator();
        let built = engine
            .build_graph(
                &GraphInput::Detections(vec![RawDetection::new([0.0, 0.0, 50.0, 20.0], "text")]),
                Source::Design,
                &mut ids,
            )
            .unwrap();
        let again = engine
            .build_graph(&GraphInput::Graph(built.clone()), Source::Runtime, &mut ids)
            .unwrap();
        assert_eq!(again, built);
        assert_eq!(again.meta.source, Source::Design);
    }
}
