use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

use agent_gui_core::AxNode;
use agent_gui_core::LabelCandidates;
use agent_gui_core::Rect;
use agent_gui_core::UiMap;
use agent_gui_core::normalize_role;
use agent_gui_core::resolve_label;

use crate::error::SessionError;

/// Version tag stored with every snapshot so the layout can evolve.
pub const SCHEMA_VERSION: u32 = 1;

/// Unique identifier for a capture session.
///
/// Either caller-supplied (any non-empty string) or generated as
/// `<13-digit-millisecond-timestamp>-<4-digit-random>` when no session
/// exists yet and none was named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Accept a caller-supplied ID, rejecting empty and whitespace-only
    /// strings.
    pub fn try_new(id: impl Into<String>) -> Result<Self, SessionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SessionError::InvalidId(id));
        }
        Ok(Self(id))
    }

    /// Generate a fresh timestamp-random token.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
        Self(format!("{:013}-{:04}", millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One entry of the captured menu bar, recorded for inspection commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuBarItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_shortcut: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuBarItem>,
}

impl MenuBarItem {
    fn from_node(node: &AxNode) -> Self {
        let title = resolve_label(LabelCandidates {
            label: node.label.as_deref(),
            description: node.description.as_deref(),
            help: node.help.as_deref(),
            role_description: node.role_description.as_deref(),
            title: node.title.as_deref(),
            value: node.value.as_deref(),
        })
        .unwrap_or_default();
        Self {
            title,
            keyboard_shortcut: node.keyboard_shortcut.clone(),
            items: node.children.iter().map(Self::from_node).collect(),
        }
    }
}

/// Extract the menu bar from a capture tree, if the tree contains one.
///
/// Menu nodes still classify into the element map like any other node; this
/// additionally records them as a titled hierarchy in the persisted snapshot
/// so an agent can browse available commands and keyboard shortcuts without
/// walking element IDs.
pub fn menu_bar_from_tree(root: &AxNode) -> Option<Vec<MenuBarItem>> {
    fn find_menu_bar(node: &AxNode) -> Option<&AxNode> {
        if normalize_role(&node.role) == "menubar" {
            return Some(node);
        }
        node.children.iter().find_map(find_menu_bar)
    }

    find_menu_bar(root)
        .map(|bar| bar.children.iter().map(MenuBarItem::from_node).collect())
}

/// The full persisted snapshot of one session (`map.json`).
///
/// Keys in `ui_map` are globally unique within the session and never reused;
/// a re-capture replaces the entire map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotated_path: Option<String>,
    #[serde(default)]
    pub ui_map: UiMap,
    pub last_update_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_bounds: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_bar: Option<Vec<MenuBarItem>>,
}

impl SessionData {
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            screenshot_path: None,
            annotated_path: None,
            ui_map: UiMap::new(),
            last_update_time: Utc::now(),
            application_name: None,
            window_title: None,
            window_bounds: None,
            menu_bar: None,
        }
    }

    pub fn touch(&mut self) {
        self.last_update_time = Utc::now();
    }
}

impl Default for SessionData {
    fn default() -> Self {
        Self::new()
    }
}
