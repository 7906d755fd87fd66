use std::sync::OnceLock;

use regex::Regex;

use agent_gui_core::Point;
use agent_gui_core::UiElement;

use crate::error::SessionError;
use crate::store::SessionStore;

fn element_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[BTCLSRMG]\d+$").unwrap())
}

fn coordinates_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)$").unwrap())
}

/// How a command names the thing it wants to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Explicit element ID from a previous capture, e.g. `B3`.
    Id(String),
    /// Free-text query resolved through the element search.
    Query(String),
    /// Absolute screen coordinates, bypassing the map entirely.
    Coordinates(Point),
}

impl Selector {
    /// Classify a raw CLI argument: `B3`-shaped tokens are element IDs,
    /// `x,y` pairs are coordinates, anything else is a text query.
    pub fn parse(raw: &str) -> Selector {
        let trimmed = raw.trim();
        if element_id_regex().is_match(trimmed) {
            return Selector::Id(trimmed.to_string());
        }
        if let Some(caps) = coordinates_regex().captures(trimmed) {
            // The regex only admits decimal numbers, so parsing cannot fail.
            let x = caps[1].parse().unwrap_or_default();
            let y = caps[2].parse().unwrap_or_default();
            return Selector::Coordinates(Point::new(x, y));
        }
        Selector::Query(trimmed.to_string())
    }
}

/// A resolved automation target: the matched element, if the selector went
/// through the map, and the point an input command should act at.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    pub element: Option<UiElement>,
    pub point: Point,
}

/// Resolve a selector against a session's stored element map.
///
/// IDs must exist; queries take the best match (lowest element ID among
/// matches, which the map's ordering makes deterministic); coordinates pass
/// through untouched. Not-found outcomes echo the original selector so the
/// caller can report precisely what failed.
pub fn resolve_target(
    store: &SessionStore,
    selector: &Selector,
) -> Result<ResolvedTarget, SessionError> {
    match selector {
        Selector::Id(id) => {
            let element = store
                .get_element(id)?
                .ok_or_else(|| SessionError::ElementNotFound(id.clone()))?;
            let point = element.frame.center();
            Ok(ResolvedTarget {
                element: Some(element),
                point,
            })
        }
        Selector::Query(query) => {
            let matches = store.find_elements(query)?;
            let element = matches
                .into_iter()
                .next()
                .ok_or_else(|| SessionError::NoMatch(query.clone()))?;
            let point = element.frame.center();
            Ok(ResolvedTarget {
                element: Some(element),
                point,
            })
        }
        Selector::Coordinates(point) => Ok(ResolvedTarget {
            element: None,
            point: *point,
        }),
    }
}
