//! Boundary parsing of loosely-typed JSON into the inputs the graph builder understands.
//!
//! Three shapes are accepted: a ready [`SemanticGraph`] (an object with `meta` and
//! `elements`), a flat detection list, or a hierarchical tree whose nodes carry
//! `attributes.bounds`. Malformed entries are dropped here; nothing past this module
//! inspects untyped JSON.

use crate::model::{SemanticGraph, Source};
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One detected element: a pixel box `[x1, y1, x2, y2]` plus label and optional text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(rename = "box")]
    pub bbox: [f64; 4],
    pub label: String,
    #[serde(default)]
    pub conf: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ocr_conf: f64,
}

impl RawDetection {
    pub fn new(bbox: [f64; 4], label: impl Into<String>) -> Self {
        Self {
            bbox,
            label: label.into(),
            conf: 0.0,
            text: None,
            ocr_conf: 0.0,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn from_object(obj: &Map<String, Value>) -> Option<Self> {
        let items = obj.get("box")?.as_array()?;
        if items.len() < 4 {
            return None;
        }
        let mut bbox = [0.0; 4];
        for (slot, item) in bbox.iter_mut().zip(items) {
            *slot = json_number(item)?;
        }
        Some(Self {
            bbox,
            label: obj
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            conf: obj.get("conf").and_then(json_number).unwrap_or(0.0),
            text: obj.get("text").and_then(json_text),
            ocr_conf: obj.get("ocr_conf").and_then(json_number).unwrap_or(0.0),
        })
    }
}

/// Box parsed from a bounds string, as origin plus clamped size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl BoundsBox {
    pub fn corners(&self) -> [f64; 4] {
        [
            self.x as f64,
            self.y as f64,
            (self.x + self.width) as f64,
            (self.y + self.height) as f64,
        ]
    }
}

fn integer_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+").expect("valid regex"))
}

/// Parses strings such as `"[0,96][1080,240]"`: the first four integers found are
/// `x1, y1, x2, y2`. Returns `None` when fewer than four integers are present.
pub fn parse_bounds(bounds: &str) -> Option<BoundsBox> {
    let mut nums = integer_regex()
        .find_iter(bounds)
        .map(|m| m.as_str().parse::<i64>());
    let mut next = || nums.next()?.ok();
    let (x1, y1, x2, y2) = (next()?, next()?, next()?, next()?);
    Some(BoundsBox {
        x: x1,
        y: y1,
        width: (x2 - x1).max(0),
        height: (y2 - y1).max(0),
    })
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawAttributes {
    pub bounds: Option<String>,
    pub kind: Option<String>,
    pub label: Option<String>,
    pub text: Option<String>,
}

impl RawAttributes {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let non_empty = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            bounds: obj.get("bounds").and_then(Value::as_str).map(str::to_string),
            kind: non_empty("type"),
            label: non_empty("label"),
            text: obj.get("text").and_then(json_text),
        }
    }

    pub fn widget_type(&self) -> &str {
        self.kind
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or("unknown")
    }
}

/// A node of a hierarchical UI dump (e.g. an accessibility or view-hierarchy tree).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTreeNode {
    pub attributes: Option<RawAttributes>,
    pub children: Vec<RawTreeNode>,
}

impl RawTreeNode {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let mut children = Vec::new();
        if let Some(items) = obj.get("children") {
            if items.is_array() {
                collect_tree_nodes(items, &mut children);
            }
        }
        Self {
            attributes: obj
                .get("attributes")
                .and_then(Value::as_object)
                .map(RawAttributes::from_object),
            children,
        }
    }

    /// The detection this node contributes, if its bounds parse to a positive-area box
    /// and it is not the synthetic `root`.
    pub fn detection(&self) -> Option<RawDetection> {
        let attrs = self.attributes.as_ref()?;
        let bounds = parse_bounds(attrs.bounds.as_deref()?)?;
        let widget_type = attrs.widget_type();
        if widget_type == "root" || bounds.width <= 0 || bounds.height <= 0 {
            return None;
        }
        Some(RawDetection {
            bbox: bounds.corners(),
            label: widget_type.to_string(),
            conf: 0.0,
            text: attrs.text.clone(),
            ocr_conf: 0.0,
        })
    }

    /// Pre-order flattening into detections.
    pub fn flatten_into(&self, out: &mut Vec<RawDetection>) {
        if let Some(det) = self.detection() {
            out.push(det);
        }
        for child in &self.children {
            child.flatten_into(out);
        }
    }
}

fn collect_tree_nodes(value: &Value, out: &mut Vec<RawTreeNode>) {
    match value {
        Value::Object(obj) => out.push(RawTreeNode::from_object(obj)),
        Value::Array(items) => {
            for item in items {
                collect_tree_nodes(item, out);
            }
        }
        _ => {}
    }
}

/// One side of a comparison after boundary parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphInput {
    Graph(SemanticGraph),
    Detections(Vec<RawDetection>),
    Tree {
        roots: Vec<RawTreeNode>,
        /// Bounds of the top-level object, used as a last-resort resolution hint.
        root_bounds: Option<BoundsBox>,
    },
}

impl GraphInput {
    pub fn from_json_str(text: &str, side: Source) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(Error::MissingInput { side });
        }
        let value: Value =
            serde_json::from_str(text).map_err(|source| Error::InputJson { side, source })?;
        Self::from_value(&value, side)
    }

    /// Classifies a JSON value. JSON passed as a string is decoded first.
    pub fn from_value(value: &Value, side: Source) -> Result<Self> {
        match value {
            Value::Null => Err(Error::MissingInput { side }),
            Value::String(text) => Self::from_json_str(text, side),
            Value::Array(items) if items.is_empty() => Err(Error::MissingInput { side }),
            Value::Object(obj) if obj.is_empty() => Err(Error::MissingInput { side }),
            Value::Array(items) => Ok(Self::Detections(
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .filter_map(RawDetection::from_object)
                    .collect(),
            )),
            Value::Object(obj) if is_semantic_graph(obj) => {
                let graph =
                    SemanticGraph::deserialize(value).map_err(|err| Error::InvalidGraph {
                        side,
                        message: err.to_string(),
                    })?;
                Ok(Self::Graph(graph))
            }
            other => {
                let mut roots = Vec::new();
                collect_tree_nodes(other, &mut roots);
                let root_bounds = other
                    .get("attributes")
                    .and_then(|a| a.get("bounds"))
                    .and_then(Value::as_str)
                    .and_then(parse_bounds);
                Ok(Self::Tree { roots, root_bounds })
            }
        }
    }

    /// Flat detections to build from; empty for a ready graph.
    pub fn detections(&self) -> Vec<RawDetection> {
        match self {
            Self::Graph(_) => Vec::new(),
            Self::Detections(dets) => dets.clone(),
            Self::Tree { roots, .. } => {
                let mut out = Vec::new();
                for root in roots {
                    root.flatten_into(&mut out);
                }
                out
            }
        }
    }

    /// Image resolution `[width, height]` for building.
    ///
    /// A ready graph's own resolution wins. Otherwise the furthest box edge is used when
    /// both extents exceed one pixel, then the tree root's bounds, then `1×1`.
    pub fn infer_resolution(&self, detections: &[RawDetection]) -> [i64; 2] {
        if let Self::Graph(graph) = self {
            let [w, h] = graph.meta.resolution;
            return [if w == 0 { 1 } else { w }, if h == 0 { 1 } else { h }];
        }
        let mut max_x2 = 1i64;
        let mut max_y2 = 1i64;
        for det in detections {
            max_x2 = max_x2.max(det.bbox[2] as i64);
            max_y2 = max_y2.max(det.bbox[3] as i64);
        }
        if max_x2 > 1 && max_y2 > 1 {
            return [max_x2, max_y2];
        }
        if let Self::Tree {
            root_bounds: Some(bounds),
            ..
        } = self
        {
            return [bounds.width.max(1), bounds.height.max(1)];
        }
        [1, 1]
    }
}

fn is_semantic_graph(obj: &Map<String, Value>) -> bool {
    obj.get("meta").is_some_and(Value::is_object) && obj.get("elements").is_some_and(Value::is_array)
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
