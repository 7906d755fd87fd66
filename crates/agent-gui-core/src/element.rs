use serde::Deserialize;
use serde::Serialize;

use crate::classify::is_actionable;
use crate::geometry::Rect;
use crate::label::LabelCandidates;
use crate::label::resolve_label;

/// One addressable control in a captured accessibility snapshot.
///
/// Elements are created in bulk at classification time and never mutated
/// individually; a re-capture replaces the whole map. Textual attributes are
/// carried through verbatim from the source tree. Field names follow the
/// persisted `map.json` layout and must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiElement {
    /// Session-scoped ID assigned once at classification time, e.g. `B3`.
    pub id: String,
    /// Opaque reference to the originating tree node.
    pub element_id: String,
    /// Role string as reported by the source tree.
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Absolute frame of the control.
    pub frame: Rect,
    /// Derived from `role`; recomputed, never cached independently of it.
    pub is_actionable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_shortcut: Option<String>,
}

impl UiElement {
    /// Best human-readable label for this element, per the resolver's
    /// priority order.
    pub fn best_label(&self) -> Option<String> {
        resolve_label(LabelCandidates {
            label: self.label.as_deref(),
            description: self.description.as_deref(),
            help: self.help.as_deref(),
            role_description: self.role_description.as_deref(),
            title: self.title.as_deref(),
            value: self.value.as_deref(),
        })
    }

    /// Case-insensitive substring match against title, label, value and
    /// role. A role match means the query is a substring of the role name,
    /// so `"button"` matches every button.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&query))
        };
        contains(&self.title)
            || contains(&self.label)
            || contains(&self.value)
            || self.role.to_lowercase().contains(&query)
    }

    /// Recompute `is_actionable` from the role. The stored flag must never
    /// drift from what the role implies.
    pub fn recompute_actionable(&mut self) {
        self.is_actionable = is_actionable(&self.role);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(id: &str, title: &str) -> UiElement {
        UiElement {
            id: id.to_string(),
            element_id: format!("node-{}", id),
            role: "button".to_string(),
            title: Some(title.to_string()),
            label: None,
            value: None,
            description: None,
            help: None,
            role_description: None,
            identifier: None,
            frame: Rect::new(0.0, 0.0, 10.0, 10.0),
            is_actionable: true,
            keyboard_shortcut: None,
        }
    }

    #[test]
    fn test_matches_query_title_substring() {
        let el = button("B1", "Save Document");
        assert!(el.matches_query("save"));
        assert!(el.matches_query("SAVE"));
        assert!(el.matches_query("Document"));
        assert!(!el.matches_query("cancel"));
    }

    #[test]
    fn test_matches_query_role() {
        let el = button("B1", "Save");
        assert!(el.matches_query("button"));
        assert!(el.matches_query("BUTTON"));
        assert!(el.matches_query("utto"));
    }

    #[test]
    fn test_matches_query_value() {
        let mut el = button("T1", "Search");
        el.role = "text field".to_string();
        el.value = Some("hello world".to_string());
        assert!(el.matches_query("world"));
    }

    #[test]
    fn test_best_label_prefers_label_over_title() {
        let mut el = button("B1", "generic");
        el.label = Some("Close window".to_string());
        assert_eq!(el.best_label(), Some("Close window".to_string()));
    }

    #[test]
    fn test_serde_round_trip_camel_case() {
        let el = button("B1", "Save");
        let json = serde_json::to_string(&el).unwrap();
        assert!(json.contains("\"elementId\""));
        assert!(json.contains("\"isActionable\""));
        assert!(!json.contains("\"label\""));

        let back: UiElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_recompute_actionable_follows_role() {
        let mut el = button("B1", "Save");
        el.role = "static text".to_string();
        el.recompute_actionable();
        assert!(!el.is_actionable);
    }
}
