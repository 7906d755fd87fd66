//! Overlay rendering for agent-gui.
//!
//! Draws a translucent highlight plus a compact ID badge over every
//! actionable element of a captured session, so a human (or a vision model)
//! can see exactly which IDs the automation commands will accept.

#![deny(clippy::all)]

mod glyphs;
mod renderer;

pub use renderer::AnnotateError;
pub use renderer::annotate_session;
pub use renderer::render;
