//! Activity list: loading, ID extraction and CLI selection.

use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};

/// Used when the activity list cannot be read
pub const DEFAULT_ACTIVITY: &str = "ESARCEN000359";

/// Matches both `ESARC123` and language-tagged `ESARCEN000359` forms
const ACTIVITY_ID_PATTERN: &str = r"ESARC[A-Z]*\d+";

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ACTIVITY_ID_PATTERN).expect("activity id regex compiles"))
}

/// Failures of the ID-extraction step
#[derive(Error, Debug)]
pub enum ActivityListError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("No activity IDs found in {0}")]
    NoMatches(String),

    #[error("Failed to write activity list: {0}")]
    Write(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures resolving a CLI selection against the loaded list
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Activity {0} not found in the activity list")]
    NotFound(String),

    #[error("Invalid range {start}-{end}: start is after end")]
    InvalidRange { start: usize, end: usize },

    #[error("No activities to test")]
    Empty,
}

/// Load the activity list, falling back to [`DEFAULT_ACTIVITY`] when the file
/// is missing or is not valid JSON. A JSON value that is not an array yields
/// an empty list.
pub fn load_activities(path: &Path) -> Vec<String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "activity list unreadable, using default activity");
            return vec![DEFAULT_ACTIVITY.to_string()];
        }
    };

    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(id) => Some(id),
                other => {
                    warn!(value = %other, "skipping non-string activity entry");
                    None
                }
            })
            .collect(),
        Ok(_) => {
            warn!(path = %path.display(), "activity list is not a JSON array");
            Vec::new()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "activity list is not valid JSON, using default activity");
            vec![DEFAULT_ACTIVITY.to_string()]
        }
    }
}

/// Every activity ID in `text`, duplicates removed, in first-seen order
pub fn extract_ids(text: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for found in id_regex().find_iter(text) {
        if !ids.iter().any(|id| id == found.as_str()) {
            ids.push(found.as_str().to_string());
        }
    }
    ids
}

/// Extract IDs from `input` (read as plain text) and write them to `output`
/// as a pretty JSON array. Returns the number of IDs written.
pub fn extract_to_file(input: &Path, output: &Path) -> Result<usize, ActivityListError> {
    let raw = fs::read_to_string(input).map_err(|source| ActivityListError::Read {
        path: input.display().to_string(),
        source,
    })?;

    let ids = extract_ids(&raw);
    if ids.is_empty() {
        return Err(ActivityListError::NoMatches(input.display().to_string()));
    }

    fs::write(output, serde_json::to_string_pretty(&ids)?)?;
    info!(count = ids.len(), output = %output.display(), "extracted activity IDs");
    Ok(ids.len())
}

/// Which activities of the list to run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every activity
    #[default]
    All,
    /// A single zero-based index
    Index(usize),
    /// Inclusive zero-based range
    Range(usize, usize),
    /// A literal activity ID
    Id(String),
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Ok(Selection::Index(index));
        }
        if let Some((start, end)) = s.split_once('-') {
            if let (Ok(start), Ok(end)) = (start.parse::<usize>(), end.parse::<usize>()) {
                return Ok(Selection::Range(start, end));
            }
        }
        Ok(Selection::Id(s.to_string()))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Index(index) => write!(f, "{}", index),
            Selection::Range(start, end) => write!(f, "{}-{}", start, end),
            Selection::Id(id) => f.write_str(id),
        }
    }
}

/// Resolve a selection to `(index, id)` pairs in list order.
///
/// Indices past the end of the list are clamped away; a literal ID that is
/// not in the list is an error.
pub fn resolve(selection: &Selection, ids: &[String]) -> Result<Vec<(usize, String)>, SelectionError> {
    if ids.is_empty() {
        return Err(SelectionError::Empty);
    }

    let range = match selection {
        Selection::All => 0..ids.len(),
        Selection::Index(index) => *index..index.saturating_add(1),
        Selection::Range(start, end) => {
            if start > end {
                return Err(SelectionError::InvalidRange {
                    start: *start,
                    end: *end,
                });
            }
            *start..end.saturating_add(1)
        }
        Selection::Id(id) => {
            let index = ids
                .iter()
                .position(|candidate| candidate == id)
                .ok_or_else(|| SelectionError::NotFound(id.clone()))?;
            index..index + 1
        }
    };

    let end = range.end.min(ids.len());
    let start = range.start.min(end);
    if start == end {
        warn!(selection = %selection, available = ids.len(), "selection is past the end of the activity list");
    }

    Ok((start..end).map(|index| (index, ids[index].clone())).collect())
}
