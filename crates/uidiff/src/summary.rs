//! Compact, id-level views of a [`Comparison`].

use serde::{Deserialize, Serialize};
use uidiff_core::geom::round_to;
use uidiff_core::{Comparison, MatchResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchLink {
    pub design_id: String,
    pub runtime_id: String,
    pub cost: f64,
}

/// [`MatchResult`] reduced to node ids.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchingSummary {
    pub matches: Vec<MatchLink>,
    pub missing: Vec<String>,
    pub added: Vec<String>,
}

impl From<&MatchResult> for MatchingSummary {
    fn from(result: &MatchResult) -> Self {
        Self {
            matches: result
                .matches
                .iter()
                .map(|m| MatchLink {
                    design_id: m.design.id.clone(),
                    runtime_id: m.runtime.id.clone(),
                    cost: m.cost,
                })
                .collect(),
            missing: result.missing.iter().map(|n| n.id.clone()).collect(),
            added: result.added.iter().map(|n| n.id.clone()).collect(),
        }
    }
}

/// Headline numbers; percentages are rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Missing plus added nodes.
    pub difference_count: usize,
    /// Matched pairs over the larger side.
    pub match_rate: f64,
    /// Design node count.
    pub total_components: usize,
    /// Matched pairs over both sides together.
    pub completeness: f64,
}

impl Metrics {
    pub fn from_comparison(comparison: &Comparison) -> Self {
        let matched = comparison.matching.matches.len() as f64;
        let design = comparison.design.meta.node_count;
        let runtime = comparison.runtime.meta.node_count;
        Self {
            difference_count: comparison.matching.missing.len() + comparison.matching.added.len(),
            match_rate: percent(matched, design.max(runtime)),
            total_components: design,
            completeness: percent(matched, design + runtime),
        }
    }
}

fn percent(part: f64, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part / whole as f64 * 100.0, 1)
}
