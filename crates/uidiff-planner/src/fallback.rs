//! Conservative rule-based plans used when no generator is available or it fails.

use crate::blueprint::{ActionType, Confidence, LocationHint, ModificationBlueprint};
use crate::search;
use std::path::Path;
use uidiff_core::{Issue, IssueContext, IssueKind};

pub const FALLBACK_REASONING: &str = "rule-based fallback";

/// Always [`Confidence::Low`].
///
/// With a `project_root`, text fixes are pointed at the first file containing the text
/// to change (path relative to the root).
pub fn fallback_blueprint(
    plan_id: String,
    issue: &Issue,
    context: &IssueContext,
    project_root: Option<&Path>,
) -> ModificationBlueprint {
    let role = if issue.widget_role.is_empty() {
        "component"
    } else {
        issue.widget_role.as_str()
    };

    let mut target_file = String::new();
    let (action_type, location_hint) = match issue.kind {
        IssueKind::TextMismatch => {
            let actual = issue.actual.as_deref().unwrap_or("").trim();
            let query = if actual.is_empty() {
                issue.expected.as_deref().unwrap_or("")
            } else {
                actual
            };
            if let Some(root) = project_root {
                if let Some(hit) = search::search_codebase(root, query).into_iter().next() {
                    let path = hit.path.strip_prefix(root).unwrap_or(&hit.path);
                    target_file = path.display().to_string();
                }
            }
            (ActionType::ModifyText, LocationHint::search(query))
        }
        IssueKind::MissingWidget => (
            ActionType::AddComponent,
            LocationHint::component(role).with_anchors(context.clone()),
        ),
        _ => (ActionType::ModifyStyle, LocationHint::component(role)),
    };

    ModificationBlueprint {
        plan_id,
        target_file,
        confidence: Confidence::Low,
        action_type,
        location_hint,
        reasoning: FALLBACK_REASONING.to_string(),
        parent_container_path: None,
    }
}
