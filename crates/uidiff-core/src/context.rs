//! Neighbourhood of a node, handed to blueprint generators to help locate code.

use crate::geom;
use crate::model::Node;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

const MAX_SIBLINGS: usize = 3;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueContext {
    /// Trimmed, non-empty texts of up to three nearest siblings.
    pub sibling_text: Vec<String>,
    /// Label of the containing node.
    pub parent_role: Option<String>,
}

impl IssueContext {
    /// Context of `node_id` within `elements`; empty when the node or its parent is unknown.
    pub fn for_node(elements: &[Node], node_id: Option<&str>) -> Self {
        let index: FxHashMap<&str, &Node> =
            elements.iter().map(|n| (n.id.as_str(), n)).collect();
        let Some(node) = node_id.and_then(|id| index.get(id).copied()) else {
            return Self::default();
        };
        let Some(parent) = node
            .topology
            .parent_id
            .as_deref()
            .and_then(|pid| index.get(pid).copied())
        else {
            return Self::default();
        };

        let mut siblings: Vec<&Node> = parent
            .topology
            .children
            .iter()
            .filter_map(|id| index.get(id.as_str()).copied())
            .filter(|s| s.id != node.id)
            .collect();
        let origin = node.geometry.center_point();
        siblings.sort_by(|a, b| {
            let da = geom::distance(origin, a.geometry.center_point());
            let db = geom::distance(origin, b.geometry.center_point());
            da.total_cmp(&db)
        });

        let sibling_text = siblings
            .iter()
            .take(MAX_SIBLINGS)
            .map(|s| s.text().trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            sibling_text,
            parent_role: Some(parent.label().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sibling_text.is_empty() && self.parent_role.is_none()
    }
}
