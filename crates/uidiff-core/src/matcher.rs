//! Zone-bucketed fuzzy matching of design nodes to runtime nodes.

use crate::assignment::{self, CostMatrix};
use crate::config::{MatchWeights, MatcherConfig};
use crate::geom::{self, point};
use crate::model::{MatchPair, MatchResult, Node, SemanticGraph, Zone};
use crate::text;

/// Unordered label pairs that are plausible stand-ins for each other, stored sorted.
const SOFT_COMPATIBLE: [(&str, &str); 3] = [("button", "text"), ("icon", "image"), ("input", "text")];

const SOFT_TYPE_COST: f64 = 0.3;

#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    config: MatcherConfig,
}

impl FuzzyMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Matches both graphs zone by zone and concatenates the results in
    /// header, body, footer order.
    pub fn run(&self, design: &SemanticGraph, runtime: &SemanticGraph) -> MatchResult {
        let mut out = MatchResult::default();
        for zone in Zone::ORDER {
            let a = design.in_zone(zone);
            let b = runtime.in_zone(zone);
            let bucket = self.match_bucket(&a, &b);
            tracing::debug!(
                zone = zone.as_str(),
                design = a.len(),
                runtime = b.len(),
                matched = bucket.matches.len(),
                "matched zone bucket"
            );
            out.extend(bucket);
        }
        out
    }

    /// Optimal one-to-one assignment within one bucket, filtered by the match cutoff.
    ///
    /// The solver's global optimum is filtered as-is: a pair above the cutoff leaves both
    /// nodes unmatched even if another assignment would have kept one of them.
    pub fn match_bucket(&self, a: &[&Node], b: &[&Node]) -> MatchResult {
        if a.is_empty() || b.is_empty() {
            return MatchResult {
                matches: Vec::new(),
                missing: a.iter().map(|n| (*n).clone()).collect(),
                added: b.iter().map(|n| (*n).clone()).collect(),
            };
        }

        let y_offset = vertical_offset(a, b);
        let cost = self.cost_matrix(a, b, y_offset);
        let cutoff = self.config.thresholds.match_cutoff;

        let mut design_used = vec![false; a.len()];
        let mut runtime_used = vec![false; b.len()];
        let mut matches = Vec::new();
        for (i, j) in assignment::solve(&cost) {
            let c = cost.get(i, j);
            if c > cutoff {
                tracing::trace!(design = %a[i].id, runtime = %b[j].id, cost = c, "rejected pair above cutoff");
                continue;
            }
            design_used[i] = true;
            runtime_used[j] = true;
            matches.push(MatchPair {
                design: a[i].clone(),
                runtime: b[j].clone(),
                cost: c,
            });
        }

        MatchResult {
            matches,
            missing: unused(a, &design_used),
            added: unused(b, &runtime_used),
        }
    }

    pub fn cost_matrix(&self, a: &[&Node], b: &[&Node], y_offset: f64) -> CostMatrix {
        CostMatrix::from_fn(a.len(), b.len(), |i, j| self.pair_cost(a[i], b[j], y_offset))
    }

    /// Weighted sum of the geometry, shape, text and type sub-costs.
    pub fn pair_cost(&self, a: &Node, b: &Node, y_offset: f64) -> f64 {
        let w: &MatchWeights = &self.config.weights;
        w.geo * geo_cost(a, b, y_offset)
            + w.shape * shape_cost(a, b)
            + w.text * text_cost(a, b)
            + w.kind * type_cost(a, b)
    }
}

fn unused(nodes: &[&Node], used: &[bool]) -> Vec<Node> {
    nodes
        .iter()
        .zip(used)
        .filter(|(_, used)| !**used)
        .map(|(n, _)| (*n).clone())
        .collect()
}

/// Mean design center-y minus mean runtime center-y; `0` when either side is empty.
pub fn vertical_offset(a: &[&Node], b: &[&Node]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mean = |nodes: &[&Node]| {
        nodes.iter().map(|n| n.geometry.center[1]).sum::<f64>() / nodes.len() as f64
    };
    mean(a) - mean(b)
}

/// `min(2·distance, 1) + (1 − IoU)` with the runtime center shifted by `y_offset`.
pub fn geo_cost(a: &Node, b: &Node, y_offset: f64) -> f64 {
    let ca = a.geometry.center_point();
    let cb = point(b.geometry.center[0], b.geometry.center[1] + y_offset);
    let dist_cost = (geom::distance(ca, cb) * 2.0).min(1.0);
    let iou = geom::iou(&a.geometry.rel_box(), &b.geometry.rel_box());
    dist_cost + (1.0 - iou)
}

pub fn shape_cost(a: &Node, b: &Node) -> f64 {
    (a.geometry.aspect_ratio() - b.geometry.aspect_ratio())
        .abs()
        .min(1.0)
}

pub fn text_cost(a: &Node, b: &Node) -> f64 {
    text::text_cost(a.text(), b.text())
}

pub fn type_cost(a: &Node, b: &Node) -> f64 {
    let la = a.label_lowercase();
    let lb = b.label_lowercase();
    if la == lb {
        return 0.0;
    }
    let pair = if la <= lb {
        (la.as_str(), lb.as_str())
    } else {
        (lb.as_str(), la.as_str())
    };
    if SOFT_COMPATIBLE.contains(&pair) {
        SOFT_TYPE_COST
    } else {
        1.0
    }
}
