//! Pattern matchers for transcript text.
//!
//! Pure functions: substring tests for trigger phrases and regex extraction of
//! command parameters. Every matcher is case-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{LOCATION_STOP_WORDS, NAVIGATION_TRIGGERS, NearbySearch, SEARCH_VERBS};

/// One pattern per navigation trigger, in trigger order:
/// `<trigger> (.*?)( in| near| with| and|$)`
static NAVIGATION_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    let stops = LOCATION_STOP_WORDS.join("|");
    NAVIGATION_TRIGGERS
        .iter()
        .map(|trigger| Regex::new(&format!(r"(?i){} (.*?)({}|$)", trigger, stops)).unwrap())
        .collect()
});

static NEARBY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(find|show|display|search for) (.*?) (near|around|in) (.*?)( with| and|$)")
        .unwrap()
});

static NEARBY_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(.*?) (near|around|in) (.*)").unwrap());

/// Case-insensitive substring test
pub fn contains(text: &str, phrase: &str) -> bool {
    text.to_lowercase().contains(&phrase.to_lowercase())
}

pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains(text, p))
}

/// Extract the location phrase following "go to" or "show me".
///
/// The phrase ends at the first stop-word (" in", " near", " with", " and") or
/// end-of-string. When the trigger is not followed by a space the remainder
/// after the trigger is used. Returns `None` only when neither trigger occurs;
/// a blank phrase is returned as an empty string.
pub fn extract_location(text: &str) -> Option<String> {
    for re in NAVIGATION_RES.iter() {
        if let Some(location) = re.captures(text).and_then(|c| c.get(1)) {
            let location = location.as_str().trim();
            if !location.is_empty() {
                return Some(location.to_string());
            }
        }
    }

    let lower = text.to_lowercase();
    NAVIGATION_TRIGGERS.iter().find_map(|trigger| {
        lower
            .find(trigger)
            .map(|idx| lower[idx + trigger.len()..].trim().to_string())
    })
}

/// Extract `{poi_type, location}` from a nearby-search command.
///
/// Tries `(find|show|display|search for) <poi> (near|around|in) <location>`
/// first, then falls back to splitting on the first connector and stripping
/// search verbs from the left side. Both fields must be non-empty.
pub fn extract_nearby_search(text: &str) -> Option<NearbySearch> {
    if let Some(caps) = NEARBY_RE.captures(text) {
        let poi = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
        let location = caps.get(4).map(|m| m.as_str().trim()).unwrap_or_default();
        if !poi.is_empty() && !location.is_empty() {
            return Some(NearbySearch {
                poi_type: poi.to_string(),
                location: location.to_string(),
            });
        }
    }

    let caps = NEARBY_SPLIT_RE.captures(text)?;
    let left = caps.get(1)?.as_str();
    let right = caps.get(3)?.as_str().trim();

    let mut poi = left.trim().to_string();
    for verb in SEARCH_VERBS {
        poi = poi.replacen(verb, "", 1);
    }
    let poi = poi.trim();

    if poi.is_empty() || right.is_empty() {
        return None;
    }
    Some(NearbySearch {
        poi_type: poi.to_string(),
        location: right.to_string(),
    })
}
