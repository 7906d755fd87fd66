//! Session persistence for agent-gui.
//!
//! A session is one bounded unit of captured-and-addressable UI state: a
//! screenshot, the classified element map, and capture metadata, persisted
//! under a per-session directory. Automation commands write through
//! [`SessionStore`] and later resolve click/type targets against the stored
//! map.

#![deny(clippy::all)]

mod error;
mod session_types;
mod store;
mod target;

pub use error::SessionError;
pub use session_types::MenuBarItem;
pub use session_types::SCHEMA_VERSION;
pub use session_types::menu_bar_from_tree;
pub use session_types::SessionData;
pub use session_types::SessionId;
pub use store::SessionPaths;
pub use store::SessionStore;
pub use store::clear_all_sessions;
pub use store::list_sessions;
pub use store::most_recent_session;
pub use target::ResolvedTarget;
pub use target::Selector;
pub use target::resolve_target;
