use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    TextMismatch,
    TextTypo,
    DynamicContent,
    LayoutShiftX,
    LayoutShiftY,
    SizeMismatchW,
    SizeMismatchH,
    MissingWidget,
    AddedWidget,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::TextMismatch => "TEXT_MISMATCH",
            IssueKind::TextTypo => "TEXT_TYPO",
            IssueKind::DynamicContent => "DYNAMIC_CONTENT",
            IssueKind::LayoutShiftX => "LAYOUT_SHIFT_X",
            IssueKind::LayoutShiftY => "LAYOUT_SHIFT_Y",
            IssueKind::SizeMismatchW => "SIZE_MISMATCH_W",
            IssueKind::SizeMismatchH => "SIZE_MISMATCH_H",
            IssueKind::MissingWidget => "MISSING_WIDGET",
            IssueKind::AddedWidget => "ADDED_WIDGET",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ignore,
    Minor,
    Major,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Expand,
    Shrink,
}

/// A single divergence between design and runtime.
///
/// Text issues carry `expected`/`actual` (and `similarity` for typos); layout and size
/// issues carry `delta_px`/`direction`. Presence issues carry neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub node_id: String,
    pub widget_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Issue {
    pub fn new(kind: IssueKind, severity: Severity) -> Self {
        Self {
            kind,
            severity,
            node_id: String::new(),
            widget_role: String::new(),
            expected: None,
            actual: None,
            similarity: None,
            delta_px: None,
            direction: None,
        }
    }

    pub fn text(kind: IssueKind, severity: Severity, expected: &str, actual: &str) -> Self {
        Self {
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
            ..Self::new(kind, severity)
        }
    }

    pub fn shift(kind: IssueKind, delta_px: f64, direction: Direction) -> Self {
        Self {
            delta_px: Some(delta_px),
            direction: Some(direction),
            ..Self::new(kind, Severity::Major)
        }
    }

    pub fn with_node(mut self, node_id: &str, widget_role: &str) -> Self {
        self.node_id = node_id.to_string();
        self.widget_role = widget_role.to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalCalibration {
    pub y_offset_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub report_id: String,
    pub global_calibration: GlobalCalibration,
    pub issues: Vec<Issue>,
}

impl DiagnosticReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity >= severity).count()
    }
}
