use thiserror::Error;

/// Errors from session persistence and element lookup.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No session exists yet and the caller did not ask to create one.
    #[error("No capture session found")]
    NoSession,
    /// The caller named a session ID that is empty or whitespace-only.
    #[error("Invalid session id: {0:?}")]
    InvalidId(String),
    /// An element ID that is not in the current map.
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// A free-text query that matched nothing.
    #[error("No element matched query: {0:?}")]
    NoMatch(String),
    /// The stored snapshot exists but cannot be parsed.
    #[error("Corrupt session snapshot at {path}: {reason}")]
    Corrupt { path: String, reason: String },
    /// Directory/file creation or write failure. Never swallowed: a failed
    /// save leaves automation state stale.
    #[error("Persistence error during {operation}: {reason}")]
    Persistence { operation: String, reason: String },
}

impl SessionError {
    pub(crate) fn io(operation: &str, err: std::io::Error) -> Self {
        SessionError::Persistence {
            operation: operation.to_string(),
            reason: err.to_string(),
        }
    }

    /// Returns a helpful suggestion for resolving the error.
    pub fn suggestion(&self) -> String {
        match self {
            SessionError::NoSession => {
                "Run 'capture' first to create a session.".to_string()
            }
            SessionError::InvalidId(_) => {
                "Session IDs must be non-empty. Omit --session to use the most recent session."
                    .to_string()
            }
            SessionError::ElementNotFound(id) => {
                format!(
                    "Element '{}' not found. Run 'elements' to list current IDs, or re-run 'capture' if the screen changed.",
                    id
                )
            }
            SessionError::NoMatch(query) => {
                format!(
                    "Nothing matched '{}'. Run 'elements' to inspect the map or try a shorter query.",
                    query
                )
            }
            SessionError::Corrupt { .. } => {
                "The snapshot on disk is unreadable. Run 'clean' and capture again.".to_string()
            }
            SessionError::Persistence { .. } => {
                "Check that the sessions directory is writable (AGENT_GUI_SESSIONS_DIR)."
                    .to_string()
            }
        }
    }

    /// Whether this error is potentially transient and may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Persistence { .. })
    }
}
