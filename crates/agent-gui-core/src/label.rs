/// Candidate attributes for an element's human-readable label, in priority
/// order.
///
/// The order is load-bearing: source trees often leave the more correct
/// fields empty while populating a generic title, so an explicit label must
/// beat description, description beats help, and so on down to value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelCandidates<'a> {
    pub label: Option<&'a str>,
    pub description: Option<&'a str>,
    pub help: Option<&'a str>,
    pub role_description: Option<&'a str>,
    pub title: Option<&'a str>,
    pub value: Option<&'a str>,
}

/// Pick the best human-readable label: the first non-empty candidate in
/// priority order, or `None` when every candidate is absent or blank.
pub fn resolve_label(candidates: LabelCandidates<'_>) -> Option<String> {
    [
        candidates.label,
        candidates.description,
        candidates.help,
        candidates.role_description,
        candidates.title,
        candidates.value,
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .map(str::to_string)
}
