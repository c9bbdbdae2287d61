use crate::blueprint::ModificationBlueprint;
use crate::fallback::fallback_blueprint;
use crate::generator::{BlueprintGenerator, PlanRequest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uidiff_core::{DiagnosticReport, IdGenerator, Issue, IssueContext, SemanticGraph};

/// Turns diagnostic issues into blueprints, preferring the configured generator.
#[derive(Clone, Default)]
pub struct Planner {
    generator: Option<Arc<dyn BlueprintGenerator>>,
    project_root: Option<PathBuf>,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("generator", &self.generator.is_some())
            .field("project_root", &self.project_root)
            .finish()
    }
}

impl Planner {
    /// Rule-based only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generator(mut self, generator: impl BlueprintGenerator + 'static) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Checkout searched by the fallback to fill `target_file`.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Blueprint for one issue. Never fails: generator errors fall back to the rules.
    pub async fn plan(
        &self,
        issue: &Issue,
        context: &IssueContext,
        ids: &mut IdGenerator,
    ) -> ModificationBlueprint {
        if let Some(generator) = &self.generator {
            let request = PlanRequest {
                issue: issue.clone(),
                context: context.clone(),
            };
            match generator.generate(&request).await {
                Ok(blueprint) => return blueprint,
                Err(err) => {
                    tracing::warn!(
                        issue = %issue.kind,
                        node_id = %issue.node_id,
                        error = %err,
                        "blueprint generator failed; using rule-based fallback"
                    );
                }
            }
        }
        self.fallback(issue, context, ids)
    }

    pub fn fallback(
        &self,
        issue: &Issue,
        context: &IssueContext,
        ids: &mut IdGenerator,
    ) -> ModificationBlueprint {
        fallback_blueprint(ids.next_id("plan"), issue, context, self.project_root())
    }

    /// One blueprint per issue in report order, or a single `NO_ACTION` plan for a clean
    /// report. Contexts are looked up in the design graph.
    pub async fn plan_report(
        &self,
        report: &DiagnosticReport,
        design: &SemanticGraph,
        ids: &mut IdGenerator,
    ) -> Vec<ModificationBlueprint> {
        if report.issues.is_empty() {
            return vec![ModificationBlueprint::no_action(ids.next_id("plan"))];
        }
        let mut blueprints = Vec::with_capacity(report.issues.len());
        for issue in &report.issues {
            let node_id = (!issue.node_id.is_empty()).then_some(issue.node_id.as_str());
            let context = IssueContext::for_node(&design.elements, node_id);
            blueprints.push(self.plan(issue, &context, ids).await);
        }
        tracing::debug!(
            report_id = %report.report_id,
            blueprints = blueprints.len(),
            "planned report"
        );
        blueprints
    }

    /// Synchronous variant of [`Planner::plan_report`], driven by a local executor.
    pub fn plan_report_sync(
        &self,
        report: &DiagnosticReport,
        design: &SemanticGraph,
        ids: &mut IdGenerator,
    ) -> Vec<ModificationBlueprint> {
        futures::executor::block_on(self.plan_report(report, design, ids))
    }
}
