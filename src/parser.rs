//! Song list parsing.
//!
//! Accepts either a JSON array (strings or `{title, artist}` objects) or
//! line-oriented text such as `3. Goosebumps - Travis Scott`, and produces
//! an ordered list of [`SongQuery`]. Parsing is pure: the same input always
//! yields the same output and nothing is read or written.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::SongQuery;

static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s*[.)\-]\s*").expect("valid regex"));
static TITLE_ARTIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s[-–]\s").expect("valid regex"));

/// Parses raw user input into songs, preserving input order.
///
/// Input that is a valid JSON array is read element by element; anything else
/// is treated as one song per line. Entries without a title are dropped.
pub fn parse(raw: &str) -> Vec<SongQuery> {
    let text = raw.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        return items.iter().filter_map(parse_json_item).collect();
    }

    text.split('\n').filter_map(normalize_line).collect()
}

/// Normalizes one line of text into a song.
///
/// Strips a leading ordinal such as `12.`, `3)` or `7 -`, then splits on the
/// first ` - ` or ` – `. Everything after that separator is the artist.
pub fn normalize_line(line: &str) -> Option<SongQuery> {
    let s = line.trim();
    if s.is_empty() {
        return None;
    }

    let s = ORDINAL_PREFIX.replace(s, "");
    let s = s.trim();

    let parts: Vec<&str> = TITLE_ARTIST_SEPARATOR.split(s).collect();
    if parts.len() >= 2 {
        let title = parts[0].trim();
        let artist = parts[1..].join(" - ");
        if title.is_empty() {
            return None;
        }
        return Some(SongQuery::new(title, artist.trim()));
    }

    if s.is_empty() {
        return None;
    }
    Some(SongQuery::new(s, ""))
}

fn parse_json_item(item: &Value) -> Option<SongQuery> {
    match item {
        Value::String(line) => normalize_line(line),
        Value::Object(obj) => {
            let title = non_empty_str(obj.get("title"))
                .or_else(|| non_empty_str(obj.get("name")))
                .unwrap_or_default()
                .trim()
                .to_string();
            if title.is_empty() {
                return None;
            }

            let artist = obj
                .get("artist")
                .and_then(coerce_artist)
                .or_else(|| obj.get("artists").and_then(coerce_artist))
                .unwrap_or_default();

            Some(SongQuery::new(title, artist.trim()))
        }
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Turns an `artist`/`artists` field into a string. Empty values count as absent
/// so that an empty `artist` falls through to `artists`.
fn coerce_artist(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Object(o) => o.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(","),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}
