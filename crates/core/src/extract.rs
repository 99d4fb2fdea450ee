//! Extraction primitives for loosely formatted generator output.
//!
//! Every function here is total: a label or section that cannot be found
//! yields an empty string or an empty list, never an error. Substituting
//! fallbacks is the job of [`crate::record::build_record`].

use std::sync::LazyLock;

use regex::Regex;

/// Most items taken from a bulleted block.
pub const BULLET_LIMIT: usize = 5;

/// Separators between items of a delimited list: comma, semicolon or a
/// whitespace-surrounded "and".
static LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;]|\sand\s").unwrap());

/// Marker at the start of a bullet line: `•`, `-`, or `12.`.
static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•\-]|\d+\.)\s*").unwrap());

/// Build a case-insensitive pattern around a literal label.
///
/// Returns `None` only if the escaped label exceeds the regex size limit,
/// which callers treat as a miss.
fn literal_pattern(prefix: &str, label: &str, suffix: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){prefix}{}{suffix}", regex::escape(label))).ok()
}

/// Strip one leading `[` and one trailing `]`, then surrounding whitespace.
fn strip_brackets(value: &str) -> &str {
    let value = value.strip_prefix('[').unwrap_or(value);
    let value = value.strip_suffix(']').unwrap_or(value);
    value.trim()
}

/// Value of the first `label:` line, case-insensitive.
///
/// Everything after the colon up to end of line is returned with
/// whitespace and one pair of surrounding brackets removed. The label is
/// matched anywhere in the line, so `Conditions` also matches
/// `Medical Conditions:`; use a scoped search for labels that repeat.
pub fn extract_value(text: &str, label: &str) -> String {
    let Some(pattern) = literal_pattern("", label, r":[^\S\n]*([^\n]*)") else {
        return String::new();
    };

    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| strip_brackets(m.as_str().trim()).to_string())
        .unwrap_or_default()
}

/// Body of the `**section_name:**` section, up to the next `**` or end of text.
pub fn extract_section(text: &str, section_name: &str) -> String {
    let Some(pattern) = literal_pattern(r"(?s)\*\*", section_name, r":\*\*(.*?)(?:\*\*|\z)")
    else {
        return String::new();
    };

    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Items of the `label:` line split on `,`, `;` and ` and `.
///
/// Each item is trimmed and loses one leading `•` and one pair of
/// surrounding brackets. Empty items are dropped; order and duplicates are
/// preserved.
pub fn extract_list(text: &str, label: &str) -> Vec<String> {
    let value = extract_value(text, label);
    if value.is_empty() {
        return Vec::new();
    }

    LIST_SEPARATOR
        .split(&value)
        .map(clean_list_item)
        .filter(|item| !item.is_empty())
        .collect()
}

fn clean_list_item(item: &str) -> String {
    let item = item.trim();
    let item = item.strip_prefix('•').map(str::trim_start).unwrap_or(item);
    strip_brackets(item).to_string()
}

/// Bullet lines following the first line that mentions `keyword`.
///
/// The keyword match is case-insensitive. After it, lines starting with
/// `•`, `-` or a number and a dot are collected without their marker,
/// other lines are skipped, and a blank line ends the list once at least
/// one item was collected. At most `limit` items are returned.
pub fn extract_bullets(text: &str, keyword: &str, limit: usize) -> Vec<String> {
    let keyword = keyword.to_lowercase();
    let mut items = Vec::new();
    let mut capturing = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if !capturing {
            capturing = line.to_lowercase().contains(&keyword);
            continue;
        }

        if trimmed.is_empty() {
            if items.is_empty() {
                continue;
            }
            break;
        }

        if let Some(marker) = BULLET_MARKER.find(trimmed) {
            let item = trimmed[marker.end()..].trim();
            if !item.is_empty() {
                items.push(item.to_string());
            }
            if items.len() >= limit {
                break;
            }
        }
    }

    items
}

/// Items of the first line containing `key:` split on `|`.
///
/// The key is matched case-sensitively; these keys are upper-case tokens
/// such as `WARNING-SIGNS` that the prompt asks for verbatim.
pub fn extract_pipe_list(text: &str, key: &str) -> Vec<String> {
    let needle = format!("{key}:");

    text.lines()
        .find_map(|line| line.find(&needle).map(|at| &line[at + needle.len()..]))
        .map(split_pipes)
        .unwrap_or_default()
}

/// Value of the first line containing `key:`, case-sensitive.
pub fn extract_token_value(text: &str, key: &str) -> String {
    let needle = format!("{key}:");

    text.lines()
        .find_map(|line| line.find(&needle).map(|at| line[at + needle.len()..].trim()))
        .map(|value| strip_brackets(value).to_string())
        .unwrap_or_default()
}

fn split_pipes(content: &str) -> Vec<String> {
    content
        .split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pipe-delimited rows inside a `**SECTION ...**` block.
///
/// The block starts after the first line containing both `**SECTION` and
/// `section_name` and ends at the next `**SECTION` line for a different
/// section. Rows are lines starting with `prefix`; the cells are the text
/// after the row's first colon split on `|`. Empty cells are kept so that
/// column positions line up.
pub fn extract_rows(text: &str, section_name: &str, prefix: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        let is_header = line.contains("**SECTION");

        if !in_section {
            in_section = is_header && line.contains(section_name);
            continue;
        }

        if is_header && !line.contains(section_name) {
            break;
        }

        let trimmed = line.trim();
        if !trimmed.starts_with(prefix) {
            continue;
        }

        let content = trimmed.split_once(':').map_or("", |(_, rest)| rest);
        rows.push(content.split('|').map(|cell| cell.trim().to_string()).collect());
    }

    rows
}
