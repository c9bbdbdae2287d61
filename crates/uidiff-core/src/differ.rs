//! Match result → typed, severity-ranked [`DiagnosticReport`].

use crate::config::DifferConfig;
use crate::geom::round_to;
use crate::id::IdGenerator;
use crate::model::{GraphMeta, MatchPair, MatchResult, Node};
use crate::report::{DiagnosticReport, Direction, GlobalCalibration, Issue, IssueKind, Severity};
use crate::text::{DynamicPatterns, overlap_similarity};

/// Roles whose absence always breaks the page.
const CRITICAL_ROLES: [&str; 3] = ["button", "input", "text"];

/// Share of the unit-square reference below which an unmatched node counts as small.
const SMALL_AREA_FRACTION: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct Differ {
    config: DifferConfig,
    patterns: DynamicPatterns,
}

impl Default for Differ {
    fn default() -> Self {
        Self::new(DifferConfig::default())
    }
}

impl Differ {
    pub fn new(config: DifferConfig) -> Self {
        let patterns = DynamicPatterns::compile(&config.text.dynamic_patterns);
        Self { config, patterns }
    }

    pub fn config(&self) -> &DifferConfig {
        &self.config
    }

    /// Analyzes with a random report id.
    pub fn analyze(
        &self,
        result: &MatchResult,
        design_meta: Option<&GraphMeta>,
        runtime_meta: Option<&GraphMeta>,
    ) -> DiagnosticReport {
        self.analyze_with_ids(result, design_meta, runtime_meta, &mut IdGenerator::default())
    }

    /// Issues come out as: per matched pair its text issue then layout/size issues, then
    /// missing nodes, then added nodes. Dynamic-content findings are dropped.
    pub fn analyze_with_ids(
        &self,
        result: &MatchResult,
        design_meta: Option<&GraphMeta>,
        runtime_meta: Option<&GraphMeta>,
        ids: &mut IdGenerator,
    ) -> DiagnosticReport {
        let [width, height] = select_resolution(design_meta, runtime_meta);
        let offset_y = global_offset_y(&result.matches, height);

        let mut issues = Vec::new();
        for pair in &result.matches {
            let d = &pair.design;
            if let Some(issue) = self.text_diff(d, &pair.runtime) {
                if issue.severity != Severity::Ignore {
                    issues.push(issue.with_node(&d.id, d.label()));
                }
            }
            for issue in self.layout_diff(d, &pair.runtime, [width, height], offset_y) {
                issues.push(issue.with_node(&d.id, d.label()));
            }
        }
        for node in &result.missing {
            issues.push(
                Issue::new(IssueKind::MissingWidget, missing_severity(node))
                    .with_node(&node.id, node.label()),
            );
        }
        for node in &result.added {
            issues.push(
                Issue::new(IssueKind::AddedWidget, added_severity(node))
                    .with_node(&node.id, node.label()),
            );
        }

        tracing::debug!(
            matches = result.matches.len(),
            missing = result.missing.len(),
            added = result.added.len(),
            issues = issues.len(),
            y_offset = offset_y,
            "analyzed match result"
        );

        DiagnosticReport {
            report_id: ids.next_id("diff"),
            global_calibration: GlobalCalibration {
                y_offset_px: round_to(offset_y * height, 1),
            },
            issues,
        }
    }

    /// Text finding for a matched pair, `None` when the trimmed texts are equal.
    ///
    /// A [`IssueKind::DynamicContent`] finding has [`Severity::Ignore`] and is meant to be
    /// dropped by callers.
    pub fn text_diff(&self, design: &Node, runtime: &Node) -> Option<Issue> {
        let expected = design.text().trim();
        let actual = runtime.text().trim();
        if expected == actual {
            return None;
        }
        if self.patterns.shared_pattern(expected, actual).is_some() {
            return Some(Issue::new(IssueKind::DynamicContent, Severity::Ignore));
        }
        if expected.is_empty() || actual.is_empty() {
            return Some(Issue::text(IssueKind::TextMismatch, Severity::Major, expected, actual));
        }
        let similarity = overlap_similarity(expected, actual);
        if similarity >= self.config.text.typo_threshold {
            return Some(Issue {
                similarity: Some(similarity),
                ..Issue::text(IssueKind::TextTypo, Severity::Minor, expected, actual)
            });
        }
        Some(Issue::text(IssueKind::TextMismatch, Severity::Major, expected, actual))
    }

    /// Position and size findings in pixels of `resolution`; `offset_y` is normalized.
    pub fn layout_diff(
        &self,
        design: &Node,
        runtime: &Node,
        resolution: [f64; 2],
        offset_y: f64,
    ) -> Vec<Issue> {
        let [w_px, h_px] = resolution;
        let layout = &self.config.layout;
        let cd = design.geometry.center;
        let cr = runtime.geometry.center;
        let mut issues = Vec::new();

        let dx = (cr[0] - cd[0]) * w_px;
        let dy = (cr[1] - cd[1] - offset_y) * h_px;
        if dx.abs() > layout.pos_threshold_px {
            let dir = if dx > 0.0 { Direction::Right } else { Direction::Left };
            issues.push(Issue::shift(IssueKind::LayoutShiftX, round_to(dx, 1), dir));
        }
        if dy.abs() > layout.pos_threshold_px {
            let dir = if dy > 0.0 { Direction::Down } else { Direction::Up };
            issues.push(Issue::shift(IssueKind::LayoutShiftY, round_to(dy, 1), dir));
        }

        let rd = design.geometry.rel;
        let rr = runtime.geometry.rel;
        let (wd, hd) = ((rd[2] - rd[0]) * w_px, (rd[3] - rd[1]) * h_px);
        let (wr, hr) = ((rr[2] - rr[0]) * w_px, (rr[3] - rr[1]) * h_px);
        for (kind, design_px, runtime_px) in [
            (IssueKind::SizeMismatchW, wd, wr),
            (IssueKind::SizeMismatchH, hd, hr),
        ] {
            let threshold = layout
                .size_abs_threshold_px
                .max(design_px * layout.size_threshold_pct);
            if (runtime_px - design_px).abs() > threshold {
                let dir = if runtime_px > design_px {
                    Direction::Expand
                } else {
                    Direction::Shrink
                };
                issues.push(Issue::shift(kind, round_to(runtime_px - design_px, 1), dir));
            }
        }
        issues
    }
}

/// Design resolution when both dimensions are positive, else the runtime one; each
/// dimension is finally floored at one pixel.
pub fn select_resolution(
    design_meta: Option<&GraphMeta>,
    runtime_meta: Option<&GraphMeta>,
) -> [f64; 2] {
    let [mut w, mut h] = design_meta.map_or([0, 0], |m| m.resolution);
    if w <= 0 || h <= 0 {
        if let Some(meta) = runtime_meta {
            [w, h] = meta.resolution;
        }
    }
    [w.max(1) as f64, h.max(1) as f64]
}

/// Median of the values, `0` for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Normalized vertical shift shared by the matched pairs: the median of the per-pair pixel
/// deltas, divided back by the height.
pub fn global_offset_y(matches: &[MatchPair], height_px: f64) -> f64 {
    if matches.is_empty() || height_px <= 0.0 {
        return 0.0;
    }
    let deltas: Vec<f64> = matches
        .iter()
        .map(|m| (m.runtime.geometry.center[1] - m.design.geometry.center[1]) * height_px)
        .collect();
    median(&deltas) / height_px.max(1.0)
}

fn is_small(node: &Node) -> bool {
    node.geometry.rel_area() < SMALL_AREA_FRACTION
}

pub fn missing_severity(node: &Node) -> Severity {
    if CRITICAL_ROLES.contains(&node.label_lowercase().as_str()) {
        Severity::Critical
    } else if is_small(node) {
        Severity::Minor
    } else {
        Severity::Major
    }
}

/// Additions never reach `critical`.
pub fn added_severity(node: &Node) -> Severity {
    if is_small(node) {
        Severity::Minor
    } else {
        Severity::Major
    }
}
