//! Core types and the element model for agent-gui.
//!
//! This crate turns a snapshot of a platform accessibility tree into the
//! classified, ID-tagged element map that every automation command
//! (click/type/scroll/annotate) addresses against.

#![deny(clippy::all)]

mod classify;
mod element;
mod geometry;
mod label;
mod tree;

pub use classify::IdGenerator;
pub use classify::id_prefix;
pub use classify::is_actionable;
pub use classify::normalize_role;
pub use element::UiElement;
pub use geometry::Point;
pub use geometry::Rect;
pub use label::LabelCandidates;
pub use label::resolve_label;
pub use tree::AxNode;
pub use tree::UiMap;
pub use tree::build_ui_map;
