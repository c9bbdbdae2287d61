use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uidiff_core::IssueContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    ModifyText,
    AddComponent,
    ModifyStyle,
    NoAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

/// Where to look for the code to change. Generators may add their own keys; those are kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchors: Option<IssueContext>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocationHint {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn component(name: impl Into<String>) -> Self {
        Self {
            component_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_anchors(mut self, anchors: IssueContext) -> Self {
        self.anchors = Some(anchors);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search_text.is_none()
            && self.component_name.is_none()
            && self.anchors.is_none()
            && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationBlueprint {
    pub plan_id: String,
    /// Empty when no file could be located.
    #[serde(default)]
    pub target_file: String,
    pub confidence: Confidence,
    pub action_type: ActionType,
    #[serde(default)]
    pub location_hint: LocationHint,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub parent_container_path: Option<String>,
}

impl ModificationBlueprint {
    /// The single plan emitted for a report without issues.
    pub fn no_action(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            target_file: String::new(),
            confidence: Confidence::High,
            action_type: ActionType::NoAction,
            location_hint: LocationHint::default(),
            reasoning: "Design and implementation are consistent; no change needed".to_string(),
            parent_container_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_wire_names() {
        let bp = ModificationBlueprint::no_action("plan_00000001");
        let v = serde_json::to_value(&bp).unwrap();
        assert_eq!(v["action_type"], "NO_ACTION");
        assert_eq!(v["confidence"], "high");
        assert_eq!(v["location_hint"], json!({}));
        assert_eq!(v["parent_container_path"], Value::Null);
    }

    #[test]
    fn unknown_hint_keys_round_trip_through_extra() {
        let hint: LocationHint = serde_json::from_value(json!({
            "component_name": "OrderBar",
            "selector": ".order-bar > button"
        }))
        .unwrap();
        assert_eq!(hint.component_name.as_deref(), Some("OrderBar"));
        assert_eq!(hint.extra["selector"], ".order-bar > button");
        let back = serde_json::to_value(&hint).unwrap();
        assert_eq!(back["selector"], ".order-bar > button");
        assert!(back.get("search_text").is_none());
    }
}
