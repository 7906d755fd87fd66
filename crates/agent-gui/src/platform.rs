//! Platform ports for live capture and input synthesis.
//!
//! Accessibility tree walks and screenshots come from the platform capture
//! helper and enter through `capture --tree-file/--screenshot`; this module
//! covers the remaining native surface, input synthesis. No backend is
//! wired up yet, so every entry point reports a clean unsupported error
//! instead of pretending to act.

use thiserror::Error;

use agent_gui_core::Point;

use crate::commands::ScrollDirection;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("{operation} is not available on this platform")]
    Unsupported { operation: &'static str },
}

impl PlatformError {
    /// Returns a helpful suggestion for resolving the error.
    pub fn suggestion(&self) -> String {
        match self {
            PlatformError::Unsupported { .. } => {
                "Capture from a helper snapshot with --tree-file/--screenshot, or use --dry-run to resolve targets without synthesizing input.".to_string()
            }
        }
    }
}

/// Live accessibility capture, for `capture` runs without `--tree-file`.
pub fn capture_tree(_app: Option<&str>) -> Result<agent_gui_core::AxNode, PlatformError> {
    Err(PlatformError::Unsupported {
        operation: "live accessibility capture",
    })
}

pub fn send_click(_point: Point) -> Result<(), PlatformError> {
    Err(PlatformError::Unsupported {
        operation: "click synthesis",
    })
}

pub fn send_text(_text: &str) -> Result<(), PlatformError> {
    Err(PlatformError::Unsupported {
        operation: "keyboard synthesis",
    })
}

pub fn send_scroll(
    _point: Point,
    _direction: ScrollDirection,
    _amount: u16,
) -> Result<(), PlatformError> {
    Err(PlatformError::Unsupported {
        operation: "scroll synthesis",
    })
}
