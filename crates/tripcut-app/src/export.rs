//! Markdown and JSON export of an analysis.

use crate::error::{AppError, AppResult};
use std::collections::HashSet;
use std::path::Path;
use tripcut_ai::AnalysisResult;

/// Heading used for events without a place name.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Render an analysis as a Markdown travel log.
pub fn to_markdown(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", analysis.title.trim()));
    out.push_str(&format!("> {}\n\n", analysis.summary.trim()));

    let tags: Vec<String> = analysis
        .vibe
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{}", tag.split_whitespace().collect::<Vec<_>>().join("-")))
        .collect();
    if !tags.is_empty() {
        out.push_str(&format!("{}\n\n", tags.join(" ")));
    }

    for (i, event) in analysis.timeline.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n\n");
        }
        let place = event.place().unwrap_or(UNKNOWN_LOCATION);
        out.push_str(&format!("### {} - {}\n\n", event.timestamp.trim(), place));
        out.push_str(&format!("*{}*\n\n", event.content.trim()));

        let items: Vec<&str> = event
            .food_items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .collect();
        if !items.is_empty() {
            out.push_str(&format!("**Food & drink:** {}\n\n", items.join(", ")));
        }
    }

    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

/// Output file stems for a batch of videos, one per input and in order.
///
/// Later inputs whose stem repeats an earlier one (ignoring case) get a
/// `-2`, `-3`, ... suffix so no output overwrites another.
pub fn output_stems<P: AsRef<Path>>(videos: &[P]) -> Vec<String> {
    let mut taken = HashSet::new();
    videos
        .iter()
        .map(|video| {
            let stem = video
                .as_ref()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "tripcut".to_string());
            let mut candidate = stem.clone();
            let mut n = 2;
            while !taken.insert(candidate.to_lowercase()) {
                candidate = format!("{stem}-{n}");
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Serialize an analysis, including resolved frame references, as JSON.
pub fn to_json(analysis: &AnalysisResult) -> AppResult<String> {
    serde_json::to_string_pretty(analysis)
        .map_err(|e| AppError::SerializationError(format!("Failed to serialize analysis: {e}")))
}
