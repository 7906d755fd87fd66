use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::classify::IdGenerator;
use crate::classify::is_actionable;
use crate::element::UiElement;
use crate::geometry::Rect;

/// The classified element map for one capture, keyed by element ID.
///
/// A `BTreeMap` keeps iteration (and therefore query resolution and the
/// persisted JSON) deterministic for a given tree shape.
pub type UiMap = BTreeMap<String, UiElement>;

/// Owned snapshot of one accessibility-tree node.
///
/// The source tree belongs to another process and can change while we walk
/// it, so the platform layer copies every attribute into this value before
/// classification runs. Nothing here refers back into the live tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxNode {
    /// Opaque identifier of the source node, carried into `UiElement::element_id`.
    #[serde(default)]
    pub element_id: String,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_shortcut: Option<String>,
    #[serde(default)]
    pub frame: Rect,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AxNode>,
}

impl AxNode {
    pub fn new(role: impl Into<String>, frame: Rect) -> Self {
        Self {
            role: role.into(),
            frame,
            ..Default::default()
        }
    }
}

/// Walk a tree snapshot depth-first (parent before children), classify every
/// node and assign IDs.
///
/// Every node lands in the map, actionable or not; non-actionable nodes get
/// the `G` prefix by default and stay addressable for inspection commands.
pub fn build_ui_map(root: &AxNode) -> UiMap {
    let mut generator = IdGenerator::new();
    let mut map = UiMap::new();
    walk(root, &mut generator, &mut map);
    map
}

fn walk(node: &AxNode, generator: &mut IdGenerator, map: &mut UiMap) {
    let id = generator.next_id(&node.role);
    let element = UiElement {
        id: id.clone(),
        element_id: node.element_id.clone(),
        role: node.role.clone(),
        title: node.title.clone(),
        label: node.label.clone(),
        value: node.value.clone(),
        description: node.description.clone(),
        help: node.help.clone(),
        role_description: node.role_description.clone(),
        identifier: node.identifier.clone(),
        frame: node.frame,
        is_actionable: is_actionable(&node.role),
        keyboard_shortcut: node.keyboard_shortcut.clone(),
    };
    map.insert(id, element);

    for child in &node.children {
        walk(child, generator, map);
    }
}
