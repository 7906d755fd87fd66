use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;
use sysinfo::System;
use tracing::debug;

/// A read-only snapshot of one running process. The resolver never mutates
/// these; a fresh snapshot is taken per command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningProcess {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    pub pid: u32,
    pub is_active: bool,
    pub window_count: u32,
}

/// Background daemons that never own a window; no point offering them as
/// automation targets.
const SYSTEM_PROCESS_MARKERS: &[&str] = &[
    "kernel",
    "kthreadd",
    "ksoftirqd",
    "kworker",
    "systemd",
    "dbus",
    "NetworkManager",
    "pulseaudio",
    "pipewire",
    "gdm",
    "gnome-session",
    "gnome-shell",
    "Xorg",
    "wayland",
    "launchd",
    "mdworker",
    "cfprefsd",
];

/// The user-facing application list: only processes that currently own at
/// least one window, sorted ascending by name, case-insensitively.
///
/// The ordering is an externally observable contract; callers script
/// against it.
pub fn visible_applications(mut snapshot: Vec<RunningProcess>) -> Vec<RunningProcess> {
    snapshot.retain(|p| p.window_count >= 1);
    snapshot.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    snapshot
}

/// Enumerate running processes from the live system.
///
/// Window ownership is not observable through the process table alone, so
/// every surviving process is credited one window here; the platform window
/// layer refines the count where it can.
pub fn system_snapshot() -> Vec<RunningProcess> {
    let mut system = System::new_all();
    system.refresh_all();

    let mut seen_names = HashSet::new();
    let mut processes = Vec::new();
    for (pid, process) in system.processes() {
        let raw_name = process.name().to_string_lossy().to_string();
        if raw_name.is_empty() || is_system_process(&raw_name) {
            continue;
        }

        let name = display_name(&raw_name);
        if !seen_names.insert(name.clone()) {
            continue;
        }

        processes.push(RunningProcess {
            name,
            bundle_id: None,
            pid: pid.as_u32(),
            is_active: false,
            window_count: 1,
        });
    }

    debug!(count = processes.len(), "Enumerated running processes");
    processes
}

fn is_system_process(name: &str) -> bool {
    SYSTEM_PROCESS_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
}

/// Clean a raw executable name up for display: drop packaging suffixes and
/// capitalize the first letter.
fn display_name(raw: &str) -> String {
    let name = raw.trim_end_matches(".exe").trim_end_matches("-bin");
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
