use crate::geom::{self, Box2D, Point};
use serde::{Deserialize, Serialize};

/// Vertical page region a node belongs to. Matching never pairs nodes across zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Header,
    #[default]
    Body,
    Footer,
}

impl Zone {
    /// Bucket processing order; results are always concatenated in this order.
    pub const ORDER: [Zone; 3] = [Zone::Header, Zone::Body, Zone::Footer];

    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Header => "header",
            Zone::Body => "body",
            Zone::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Design,
    #[default]
    Runtime,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Design => "design",
            Source::Runtime => "runtime",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "design" => Ok(Self::Design),
            "runtime" => Ok(Self::Runtime),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeType {
    pub label: String,
    #[serde(default)]
    pub conf: f64,
}

impl Default for NodeType {
    fn default() -> Self {
        Self {
            label: "unknown".to_string(),
            conf: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Pixel box `[x1, y1, x2, y2]`.
    pub abs: [i64; 4],
    /// `abs` divided by the image size, 4 decimals.
    pub rel: [f64; 4],
    /// Normalized midpoint of `abs`.
    pub center: [f64; 2],
    pub area: i64,
    pub width: i64,
    pub height: i64,
}

impl Geometry {
    pub fn center_point(&self) -> Point {
        geom::point(self.center[0], self.center[1])
    }

    pub fn rel_box(&self) -> Box2D {
        geom::box_from_corners(self.rel)
    }

    pub fn abs_box(&self) -> Box2D {
        geom::box_from_corners(self.abs.map(|v| v as f64))
    }

    /// Width over height, with the height floored at one pixel.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / (self.height as f64).max(1.0)
    }

    /// Area of the normalized box, i.e. measured against a unit square.
    pub fn rel_area(&self) -> f64 {
        geom::clamped_area(&self.rel_box())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ocr_conf: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub zone: Zone,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub layer_level: u32,
    #[serde(default)]
    pub children: Vec<String>,
}

/// One UI element instance of a [`SemanticGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    #[serde(default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub topology: Topology,
}

impl Node {
    pub fn label(&self) -> &str {
        &self.node_type.label
    }

    pub fn label_lowercase(&self) -> String {
        self.node_type.label.to_lowercase()
    }

    /// Text content, empty when absent.
    pub fn text(&self) -> &str {
        self.content.text.as_deref().unwrap_or("")
    }

    pub fn zone(&self) -> Zone {
        self.topology.zone
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
    pub source: Source,
    /// `[width, height]` in pixels.
    pub resolution: [i64; 2],
    pub node_count: usize,
}

/// Normalized forest of UI nodes built once per comparison and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticGraph {
    pub meta: GraphMeta,
    pub elements: Vec<Node>,
}

impl SemanticGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.elements.iter().find(|n| n.id == id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.elements
            .iter()
            .filter(|n| n.topology.parent_id.is_none())
    }

    pub fn in_zone(&self, zone: Zone) -> Vec<&Node> {
        self.elements.iter().filter(|n| n.zone() == zone).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub design: Node,
    pub runtime: Node,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: Vec<MatchPair>,
    /// Design nodes without an accepted runtime counterpart.
    pub missing: Vec<Node>,
    /// Runtime nodes without an accepted design counterpart.
    pub added: Vec<Node>,
}

impl MatchResult {
    pub(crate) fn extend(&mut self, other: MatchResult) {
        self.matches.extend(other.matches);
        self.missing.extend(other.missing);
        self.added.extend(other.added);
    }
}
