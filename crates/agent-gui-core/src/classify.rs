use std::collections::HashMap;

/// Roles that support direct interaction (click/type/toggle).
///
/// Anything not in this table -- groups, static text, images, and any role
/// string the source tree invents -- is non-actionable by default.
const ACTIONABLE_ROLES: &[&str] = &[
    "button",
    "textfield",
    "textarea",
    "checkbox",
    "radiobutton",
    "popupbutton",
    "link",
    "menuitem",
    "slider",
    "combobox",
    "segmentedcontrol",
];

/// Normalize an accessibility role string for table lookup.
///
/// Source trees report roles in several spellings (`AXButton`, `button`,
/// `text field`). Stripping the `AX` prefix, lowercasing and dropping
/// separators folds them into one canonical form.
pub fn normalize_role(role: &str) -> String {
    let trimmed = role.trim();
    let trimmed = trimmed
        .strip_prefix("AX")
        .unwrap_or(trimmed);
    trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Single-character ID prefix for a role.
///
/// The mapping is a fixed table; unmapped roles (including groups) fall
/// through to `G` so novel role strings stay addressable.
pub fn id_prefix(role: &str) -> char {
    match normalize_role(role).as_str() {
        "button" => 'B',
        "textfield" | "textarea" => 'T',
        "checkbox" => 'C',
        "link" => 'L',
        "slider" => 'S',
        "radiobutton" => 'R',
        "menu" | "menuitem" => 'M',
        _ => 'G',
    }
}

/// Whether a role supports direct interaction.
pub fn is_actionable(role: &str) -> bool {
    let normalized = normalize_role(role);
    ACTIONABLE_ROLES.contains(&normalized.as_str())
}

/// Assigns session-scoped element IDs during one classification pass.
///
/// Keeps a monotonically increasing counter per prefix, so the Nth element
/// of a given prefix anywhere in the tree receives `<prefix><N>` regardless
/// of nesting depth. A generator must not be reused across passes.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counters: HashMap<char, u32>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next ID for an element of the given role, e.g. `B3`.
    pub fn next_id(&mut self, role: &str) -> String {
        let prefix = id_prefix(role);
        let counter = self.counters.entry(prefix).or_insert(0);
        *counter += 1;
        format!("{}{}", prefix, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_table() {
        assert_eq!(id_prefix("button"), 'B');
        assert_eq!(id_prefix("text field"), 'T');
        assert_eq!(id_prefix("text area"), 'T');
        assert_eq!(id_prefix("checkbox"), 'C');
        assert_eq!(id_prefix("link"), 'L');
        assert_eq!(id_prefix("slider"), 'S');
        assert_eq!(id_prefix("radio button"), 'R');
        assert_eq!(id_prefix("menu"), 'M');
        assert_eq!(id_prefix("menu item"), 'M');
        assert_eq!(id_prefix("group"), 'G');
        assert_eq!(id_prefix("static text"), 'G');
        assert_eq!(id_prefix("image"), 'G');
        assert_eq!(id_prefix("made-up role"), 'G');
    }

    #[test]
    fn test_prefix_accepts_ax_spellings() {
        assert_eq!(id_prefix("AXButton"), 'B');
        assert_eq!(id_prefix("AXTextField"), 'T');
        assert_eq!(id_prefix("AXCheckBox"), 'C');
        assert_eq!(id_prefix("AXRadioButton"), 'R');
        assert_eq!(id_prefix("AXMenuItem"), 'M');
        assert_eq!(id_prefix("AXGroup"), 'G');
    }

    #[test]
    fn test_actionable_roles() {
        for role in [
            "button",
            "text field",
            "text area",
            "checkbox",
            "radio button",
            "pop up button",
            "link",
            "menu item",
            "slider",
            "combo box",
            "segmented control",
        ] {
            assert!(is_actionable(role), "{} should be actionable", role);
        }
    }

    #[test]
    fn test_non_actionable_roles() {
        for role in ["group", "static text", "image", "menu", "toolbar", ""] {
            assert!(!is_actionable(role), "{} should not be actionable", role);
        }
    }

    #[test]
    fn test_unknown_role_is_never_actionable() {
        assert!(!is_actionable("AXBrandNewRole"));
        assert!(!is_actionable("☃"));
    }

    #[test]
    fn test_id_generator_counts_per_prefix() {
        let mut gen = IdGenerator::new();
        assert_eq!(gen.next_id("button"), "B1");
        assert_eq!(gen.next_id("text field"), "T1");
        assert_eq!(gen.next_id("button"), "B2");
        assert_eq!(gen.next_id("group"), "G1");
        assert_eq!(gen.next_id("button"), "B3");
        assert_eq!(gen.next_id("static text"), "G2");
    }

    #[test]
    fn test_id_generator_unmapped_shares_g_counter() {
        let mut gen = IdGenerator::new();
        assert_eq!(gen.next_id("group"), "G1");
        assert_eq!(gen.next_id("image"), "G2");
        assert_eq!(gen.next_id("whatever"), "G3");
    }

    #[test]
    fn test_normalize_role() {
        assert_eq!(normalize_role("AXTextField"), "textfield");
        assert_eq!(normalize_role("text_field"), "textfield");
        assert_eq!(normalize_role("Text-Field"), "textfield");
        assert_eq!(normalize_role("  button  "), "button");
    }
}
