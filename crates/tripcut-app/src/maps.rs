//! Google Maps links for the places visited in a timeline.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tripcut_ai::AnalysisResult;

/// Characters left unescaped in a URL component.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const PLACEHOLDERS: [&str; 5] = ["", "unknown", "unknown location", "n/a", "none"];

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/";
const SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

fn is_placeholder(place: &str) -> bool {
    let lowered = place.trim().to_lowercase();
    PLACEHOLDERS.contains(&lowered.as_str())
}

fn encode(place: &str) -> String {
    utf8_percent_encode(place, COMPONENT).to_string()
}

/// Distinct real place names in timeline order.
///
/// Placeholders such as "Unknown" are skipped and repeats are compared
/// case-insensitively, keeping the first spelling.
pub fn places(analysis: &AnalysisResult) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut ordered = Vec::new();
    for place in analysis.timeline.iter().filter_map(|e| e.place()) {
        if is_placeholder(place) {
            continue;
        }
        let key = place.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            ordered.push(place.to_string());
        }
    }
    ordered
}

/// A directions link through every place in the timeline, or `None` if
/// no place was identified.
pub fn directions_url(analysis: &AnalysisResult) -> Option<String> {
    let stops = places(analysis);
    if stops.is_empty() {
        return None;
    }
    let path: Vec<String> = stops.iter().map(|place| encode(place)).collect();
    Some(format!("{DIRECTIONS_BASE}{}", path.join("/")))
}

/// A search link for a single place.
pub fn search_url(place: &str) -> String {
    format!("{SEARCH_BASE}{}", encode(place.trim()))
}
