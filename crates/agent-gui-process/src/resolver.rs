use tracing::debug;

use crate::error::ProcessError;
use crate::snapshot::RunningProcess;

/// Upper bound on tolerated edits for approximate name matching.
///
/// Single-character typos ("Finderr", "Fnder", "Fidner") must resolve;
/// anything needing more than two edits is treated as a different name.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Identifiers longer than this are rejected outright rather than searched.
pub const MAX_IDENTIFIER_LEN: usize = 512;

/// Multi-process browsers whose worker processes shadow the umbrella
/// application in a name search.
const BROWSER_NAMES: &[&str] = &[
    "chrome", "chromium", "safari", "firefox", "edge", "brave", "opera",
];

/// Name fragments marking a browser worker process.
const HELPER_MARKERS: &[&str] = &["helper", "renderer", "utility"];

/// Resolve a human-supplied identifier to exactly one running process.
///
/// Resolution order, first successful rule wins:
/// 1. `PID:<n>` syntax (malformed syntax is an error, never a fallback),
/// 2. case-insensitive exact match on name or bundle identifier,
/// 3. case-insensitive prefix match on name,
/// 4. case-insensitive substring match on name (shortest name wins),
/// 5. approximate match within [`MAX_EDIT_DISTANCE`] edits
///    (insert/delete/substitute/transpose), smallest distance first, then
///    closest length, then input order.
///
/// When the identifier resembles a known multi-process browser, helper and
/// renderer processes are excluded from the name rules so only the umbrella
/// application is eligible.
pub fn resolve<'a>(
    identifier: &str,
    processes: &'a [RunningProcess],
) -> Result<&'a RunningProcess, ProcessError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return Err(ProcessError::InvalidIdentifier(identifier.to_string()));
    }
    if trimmed.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(ProcessError::InvalidIdentifier(format!(
            "{}…",
            trimmed.chars().take(32).collect::<String>()
        )));
    }

    if let Some(rest) = strip_pid_prefix(trimmed) {
        return resolve_pid(trimmed, rest, processes);
    }

    let lower = trimmed.to_lowercase();
    let candidates: Vec<&RunningProcess> = if is_browser_identifier(&lower) {
        processes.iter().filter(|p| !is_helper(&p.name)).collect()
    } else {
        processes.iter().collect()
    };

    if let Some(found) = exact_match(&lower, &candidates) {
        debug!(identifier, name = %found.name, "Resolved by exact match");
        return Ok(found);
    }

    if let Some(found) = prefix_match(&lower, &candidates) {
        debug!(identifier, name = %found.name, "Resolved by prefix match");
        return Ok(found);
    }

    if let Some(found) = substring_match(&lower, &candidates) {
        debug!(identifier, name = %found.name, "Resolved by substring match");
        return Ok(found);
    }

    if let Some(found) = approximate_match(&lower, &candidates) {
        debug!(identifier, name = %found.name, "Resolved by approximate match");
        return Ok(found);
    }

    Err(ProcessError::NotFound(identifier.to_string()))
}

fn strip_pid_prefix(identifier: &str) -> Option<&str> {
    let (prefix, rest) = identifier.split_at_checked(4)?;
    prefix.eq_ignore_ascii_case("pid:").then_some(rest)
}

fn resolve_pid<'a>(
    original: &str,
    digits: &str,
    processes: &'a [RunningProcess],
) -> Result<&'a RunningProcess, ProcessError> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ProcessError::InvalidPid(original.to_string()));
    }
    let pid: u32 = digits
        .parse()
        .map_err(|_| ProcessError::InvalidPid(original.to_string()))?;
    if pid == 0 {
        return Err(ProcessError::InvalidPid(original.to_string()));
    }

    processes
        .iter()
        .find(|p| p.pid == pid)
        .ok_or_else(|| ProcessError::NotFound(original.to_string()))
}

fn is_browser_identifier(lower_identifier: &str) -> bool {
    BROWSER_NAMES.iter().any(|b| lower_identifier.contains(b))
}

fn is_helper(name: &str) -> bool {
    let lower = name.to_lowercase();
    HELPER_MARKERS.iter().any(|m| lower.contains(m))
}

fn exact_match<'a>(
    lower_identifier: &str,
    candidates: &[&'a RunningProcess],
) -> Option<&'a RunningProcess> {
    candidates
        .iter()
        .find(|p| {
            p.name.to_lowercase() == lower_identifier
                || p.bundle_id
                    .as_deref()
                    .is_some_and(|b| b.to_lowercase() == lower_identifier)
        })
        .copied()
}

fn prefix_match<'a>(
    lower_identifier: &str,
    candidates: &[&'a RunningProcess],
) -> Option<&'a RunningProcess> {
    // Among several prefix matches, the shortest name is the closest one;
    // min_by_key keeps the first on ties, which preserves input order.
    candidates
        .iter()
        .filter(|p| p.name.to_lowercase().starts_with(lower_identifier))
        .min_by_key(|p| p.name.chars().count())
        .copied()
}

fn substring_match<'a>(
    lower_identifier: &str,
    candidates: &[&'a RunningProcess],
) -> Option<&'a RunningProcess> {
    candidates
        .iter()
        .filter(|p| p.name.to_lowercase().contains(lower_identifier))
        .min_by_key(|p| p.name.chars().count())
        .copied()
}

fn approximate_match<'a>(
    lower_identifier: &str,
    candidates: &[&'a RunningProcess],
) -> Option<&'a RunningProcess> {
    let identifier_len = lower_identifier.chars().count();

    let mut best: Option<(usize, usize, &RunningProcess)> = None;
    for process in candidates {
        let name_lower = process.name.to_lowercase();
        let distance = strsim::damerau_levenshtein(&name_lower, lower_identifier);
        if distance > MAX_EDIT_DISTANCE {
            continue;
        }
        let length_gap = name_lower.chars().count().abs_diff(identifier_len);
        // Strict less-than: earlier candidates win ties.
        let score = (distance, length_gap);
        if best.is_none_or(|(d, g, _)| score < (d, g)) {
            best = Some((distance, length_gap, process));
        }
    }
    best.map(|(_, _, process)| process)
}
