//! Raw detections → [`SemanticGraph`].

use crate::config::BuilderConfig;
use crate::geom::{self, round_to};
use crate::id::IdGenerator;
use crate::input::RawDetection;
use crate::model::{Content, Geometry, GraphMeta, Node, NodeType, SemanticGraph, Source, Topology, Zone};

#[derive(Debug, Clone)]
pub struct GraphBuilder {
    width: i64,
    height: i64,
    source: Source,
    config: BuilderConfig,
}

impl GraphBuilder {
    /// Image dimensions below one pixel are raised to one.
    pub fn new(image_width: i64, image_height: i64, source: Source) -> Self {
        Self {
            width: image_width.max(1),
            height: image_height.max(1),
            source,
            config: BuilderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn resolution(&self) -> [i64; 2] {
        [self.width, self.height]
    }

    /// Builds a graph with random node ids.
    pub fn build(&self, detections: &[RawDetection]) -> SemanticGraph {
        self.build_with_ids(detections, &mut IdGenerator::default())
    }

    pub fn build_with_ids(
        &self,
        detections: &[RawDetection],
        ids: &mut IdGenerator,
    ) -> SemanticGraph {
        let mut nodes: Vec<Node> = detections
            .iter()
            .map(|det| {
                let geometry = self.geometry(det.bbox);
                let zone = self.zone_for(geometry.center[1]);
                Node {
                    id: ids.next_id("node"),
                    node_type: NodeType {
                        label: det.label.clone(),
                        conf: det.conf,
                    },
                    geometry,
                    content: Content {
                        text: det.text.clone(),
                        ocr_conf: det.ocr_conf,
                    },
                    topology: Topology {
                        zone,
                        parent_id: None,
                        layer_level: 0,
                        children: Vec::new(),
                    },
                }
            })
            .collect();

        self.link_containment(&mut nodes);

        tracing::debug!(
            source = self.source.as_str(),
            nodes = nodes.len(),
            roots = nodes.iter().filter(|n| n.topology.parent_id.is_none()).count(),
            "built semantic graph"
        );

        SemanticGraph {
            meta: GraphMeta {
                source: self.source,
                resolution: [self.width, self.height],
                node_count: nodes.len(),
            },
            elements: nodes,
        }
    }

    /// Pixel box, normalized box, normalized center and clamped size of a detection box.
    pub fn geometry(&self, bbox: [f64; 4]) -> Geometry {
        let [x1, y1, x2, y2] = bbox.map(|v| v as i64);
        let w = (x2 - x1).max(0);
        let h = (y2 - y1).max(0);
        let iw = self.width as f64;
        let ih = self.height as f64;
        Geometry {
            abs: [x1, y1, x2, y2],
            rel: [
                round_to(x1 as f64 / iw, 4),
                round_to(y1 as f64 / ih, 4),
                round_to(x2 as f64 / iw, 4),
                round_to(y2 as f64 / ih, 4),
            ],
            center: [
                round_to((x1 as f64 + w as f64 / 2.0) / iw, 4),
                round_to((y1 as f64 + h as f64 / 2.0) / ih, 4),
            ],
            area: w * h,
            width: w,
            height: h,
        }
    }

    /// Boundary values belong to `body`.
    pub fn zone_for(&self, center_y: f64) -> Zone {
        if center_y < self.config.zones.header_max {
            Zone::Header
        } else if center_y > self.config.zones.footer_min {
            Zone::Footer
        } else {
            Zone::Body
        }
    }

    /// Single-pass containment forest.
    ///
    /// Nodes are visited by descending area; each takes as parent the nearest preceding node
    /// in that order that covers enough of its own area. This is not guaranteed to be the
    /// smallest enclosing ancestor.
    fn link_containment(&self, nodes: &mut [Node]) {
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_by(|&a, &b| nodes[b].geometry.area.cmp(&nodes[a].geometry.area));

        for i in 0..order.len() {
            let child_idx = order[i];
            let parent_idx = order[..i].iter().rev().copied().find(|&candidate| {
                covers(
                    &nodes[candidate].geometry,
                    &nodes[child_idx].geometry,
                    self.config.containment_threshold,
                )
            });
            let Some(parent_idx) = parent_idx else {
                continue;
            };
            let parent_id = nodes[parent_idx].id.clone();
            let parent_level = nodes[parent_idx].topology.layer_level;
            let child_id = nodes[child_idx].id.clone();

            let child = &mut nodes[child_idx].topology;
            child.parent_id = Some(parent_id);
            child.layer_level = parent_level + 1;
            nodes[parent_idx].topology.children.push(child_id);
        }
    }
}

/// Whether `parent` overlaps at least `threshold` of `child`'s own area.
pub fn covers(parent: &Geometry, child: &Geometry, threshold: f64) -> bool {
    if child.area == 0 {
        return false;
    }
    let inter = geom::intersection_area(&parent.abs_box(), &child.abs_box());
    inter > 0.0 && inter / child.area as f64 >= threshold
}
