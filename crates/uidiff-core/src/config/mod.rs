use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Loosely-typed comparison configuration.
///
/// Overrides are deep-merged onto [`CompareConfig::defaults`]; typed views such as
/// [`MatcherConfig`] are deserialized from the merged value on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareConfig(Value);

impl Default for CompareConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl CompareConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn defaults() -> Self {
        Self(json!({
            "builder": {
                "containment_threshold": 0.9,
                "zones": { "header_max": 0.15, "footer_min": 0.85 }
            },
            "matcher": {
                "weights": { "geo": 0.4, "shape": 0.2, "text": 0.3, "type": 0.1 },
                "thresholds": { "match_cutoff": 0.65 }
            },
            "differ": {
                "layout": {
                    "pos_threshold_px": 5.0,
                    "size_abs_threshold_px": 2.0,
                    "size_threshold_pct": 0.05
                },
                "text": {
                    "typo_threshold": 0.8,
                    "dynamic_patterns": {
                        "currency": r"^[¥$￥]\s*\d+(?:\.\d+)?$",
                        "time": r"^\d{1,2}:\d{2}$",
                        "date": r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$",
                        "number": r"^\d+$"
                    }
                }
            }
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    pub fn builder(&self) -> Result<BuilderConfig> {
        self.section("builder")
    }

    pub fn matcher(&self) -> Result<MatcherConfig> {
        self.section("matcher")
    }

    pub fn differ(&self) -> Result<DifferConfig> {
        self.section("differ")
    }

    fn section<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let Some(value) = self.get(name) else {
            return Ok(T::default());
        };
        T::deserialize(value).map_err(|err| Error::InvalidConfig {
            message: format!("{name}: {err}"),
        })
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBounds {
    /// Centers strictly above this normalized y are `header`.
    pub header_max: f64,
    /// Centers strictly below this normalized y are `footer`.
    pub footer_min: f64,
}

impl Default for ZoneBounds {
    fn default() -> Self {
        Self {
            header_max: 0.15,
            footer_min: 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Minimum share of the child's own area that must sit inside a parent candidate.
    pub containment_threshold: f64,
    #[serde(default)]
    pub zones: ZoneBounds,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            containment_threshold: 0.9,
            zones: ZoneBounds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub geo: f64,
    pub shape: f64,
    pub text: f64,
    #[serde(rename = "type")]
    pub kind: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            geo: 0.4,
            shape: 0.2,
            text: 0.3,
            kind: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    pub match_cutoff: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self { match_cutoff: 0.65 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub weights: MatchWeights,
    #[serde(default)]
    pub thresholds: MatchThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutThresholds {
    pub pos_threshold_px: f64,
    pub size_abs_threshold_px: f64,
    pub size_threshold_pct: f64,
}

impl Default for LayoutThresholds {
    fn default() -> Self {
        Self {
            pos_threshold_px: 5.0,
            size_abs_threshold_px: 2.0,
            size_threshold_pct: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRules {
    pub typo_threshold: f64,
    /// Named regexes, tried in order. Two texts matching the same entry are dynamic content.
    #[serde(default)]
    pub dynamic_patterns: IndexMap<String, String>,
}

impl Default for TextRules {
    fn default() -> Self {
        let mut dynamic_patterns = IndexMap::new();
        for (name, pattern) in [
            ("currency", r"^[¥$￥]\s*\d+(?:\.\d+)?$"),
            ("time", r"^\d{1,2}:\d{2}$"),
            ("date", r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$"),
            ("number", r"^\d+$"),
        ] {
            dynamic_patterns.insert(name.to_string(), pattern.to_string());
        }
        Self {
            typo_threshold: 0.8,
            dynamic_patterns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DifferConfig {
    #[serde(default)]
    pub layout: LayoutThresholds,
    #[serde(default)]
    pub text: TextRules,
}
