use std::path::PathBuf;

/// Environment variable overriding where session directories live.
pub const SESSIONS_DIR_ENV: &str = "AGENT_GUI_SESSIONS_DIR";

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding one subdirectory per session.
    pub sessions_root: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment: `AGENT_GUI_SESSIONS_DIR`
    /// when set and non-empty, otherwise `~/.agent-gui/sessions`.
    pub fn from_env() -> Self {
        let sessions_root = std::env::var_os(SESSIONS_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_sessions_root);
        Self { sessions_root }
    }
}

fn default_sessions_root() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".agent-gui").join("sessions")
}
