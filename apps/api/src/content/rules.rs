//! Pagination rules: separator syntax and layout-specific atomic units.
//!
//! The measured paginator never sees raw lines. It sees *units*: one or more source
//! lines joined with `\n` that must land on the same slide, plus normalized `===`
//! entries marking user-authored hard breaks.
//!
//! # Units per layout
//! - every layout: a markdown heading keeps with the next non-blank line
//! - list: indented continuation lines stay with their list item
//! - grid: a numbered entry header (`一.` … `十.`, `1.`) keeps with its body line
//! - dict: a term line ending in `:` / `：` keeps with its definition

use std::sync::LazyLock;

use regex::Regex;

use crate::models::card::Layout;

/// Canonical separator written between pages of processed content.
pub const PAGE_SEPARATOR: &str = "\n\n===\n\n";

/// Normalized separator entry inside a unit list.
pub const SEPARATOR_UNIT: &str = "===";

static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^={3,}$").expect("separator pattern is valid"));

/// Latin bulleted or numbered list item: `- x`, `* x`, `12. x`.
pub(crate) static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*]|\d+\.)\s").expect("list marker pattern is valid"));

/// Grid entry header: CJK numeral or arabic number followed by `.`.
pub(crate) static GRID_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[一二三四五六七八九十]|\d+)\.").expect("grid header pattern is valid")
});

/// True for a user-authored hard page break (`===`, `=====`, ...).
pub fn is_separator_line(line: &str) -> bool {
    SEPARATOR_LINE.is_match(line.trim())
}

pub fn has_manual_separator(content: &str) -> bool {
    content.lines().any(is_separator_line)
}

/// Splits processed content into slides: break on separator lines, trim each
/// piece, drop the empty ones.
pub fn split_slides(content: &str) -> Vec<String> {
    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if is_separator_line(line) {
            push_trimmed(&mut slides, &current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_trimmed(&mut slides, &current.join("\n"));

    slides
}

/// Joins pages with the canonical separator.
pub fn join_slides<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Atomic units
// ────────────────────────────────────────────────────────────────────────────

/// A line that must not end a slide on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Heading,
    GridEntry,
    DictTerm,
}

fn block_kind(line: &str, layout: Layout) -> Option<BlockKind> {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return Some(BlockKind::Heading);
    }
    match layout {
        Layout::Grid if GRID_HEADER.is_match(trimmed) => Some(BlockKind::GridEntry),
        Layout::Dict if trimmed.ends_with(':') || trimmed.ends_with('：') => {
            Some(BlockKind::DictTerm)
        }
        _ => None,
    }
}

/// A grid entry renders everything after its first `.` as the point.
fn grid_header_has_body(line: &str) -> bool {
    line.trim()
        .split_once('.')
        .is_some_and(|(_, rest)| !rest.trim().is_empty())
}

struct PendingUnit {
    text: String,
    head: Option<BlockKind>,
    /// Set while the unit ends in a heading/entry header still waiting for its body.
    awaiting_body: bool,
    is_list_item: bool,
}

impl PendingUnit {
    fn start(line: &str, layout: Layout) -> Self {
        let head = block_kind(line, layout);
        PendingUnit {
            text: line.to_string(),
            head,
            awaiting_body: match head {
                Some(BlockKind::GridEntry) => !grid_header_has_body(line),
                other => other.is_some(),
            },
            is_list_item: LIST_MARKER.is_match(line),
        }
    }

    fn accepts(&self, line: &str, layout: Layout) -> bool {
        if self.awaiting_body {
            // Two grid headers (or two dict terms) in a row are two entries.
            let next_kind = block_kind(line, layout);
            return !matches!(
                (self.head, next_kind),
                (Some(BlockKind::GridEntry), Some(BlockKind::GridEntry))
                    | (Some(BlockKind::DictTerm), Some(BlockKind::DictTerm))
            );
        }
        layout == Layout::List
            && self.is_list_item
            && line.starts_with(char::is_whitespace)
            && !line.trim().is_empty()
            && !LIST_MARKER.is_match(line)
    }

    fn append(&mut self, line: &str, layout: Layout) {
        self.text.push('\n');
        self.text.push_str(line);
        if !line.trim().is_empty() {
            self.awaiting_body = block_kind(line, layout) == Some(BlockKind::Heading);
        }
    }
}

/// Groups lines into atomic units and normalizes manual separators.
///
/// The output keeps every input line exactly once, in order; joining all non-separator
/// units with `\n` reproduces the input segment text.
pub fn apply_pagination_rules<S: AsRef<str>>(lines: &[S], layout: Layout) -> Vec<String> {
    let mut units = Vec::with_capacity(lines.len());
    let mut pending: Option<PendingUnit> = None;

    for line in lines.iter().map(|l| l.as_ref()) {
        if is_separator_line(line) {
            if let Some(unit) = pending.take() {
                units.push(unit.text);
            }
            units.push(SEPARATOR_UNIT.to_string());
            continue;
        }

        if let Some(unit) = pending.as_mut() {
            if unit.accepts(line, layout) {
                unit.append(line, layout);
                continue;
            }
        }

        if let Some(unit) = pending.replace(PendingUnit::start(line, layout)) {
            units.push(unit.text);
        }
    }

    if let Some(unit) = pending {
        units.push(unit.text);
    }
    units
}

/// Splits a unit list at separator entries. Empty segments are kept so callers can
/// drop them after trimming.
pub fn split_segments(units: &[String]) -> Vec<&[String]> {
    units
        .split(|u| u == SEPARATOR_UNIT)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── separators ──────────────────────────────────────────────────────────

    #[test]
    fn test_separator_line_recognition() {
        assert!(is_separator_line("==="));
        assert!(is_separator_line("=========="));
        assert!(is_separator_line("  ===  "));
        assert!(!is_separator_line("=="));
        assert!(!is_separator_line("=== title"));
        assert!(!is_separator_line("a = b"));
    }

    #[test]
    fn test_split_slides_two_segments() {
        assert_eq!(split_slides("A\n===\nB"), vec!["A", "B"]);
    }

    #[test]
    fn test_split_slides_drops_empty_segments() {
        let slides = split_slides("===\n\nA\n\n===\n\n\n=====\nB\n===");
        assert_eq!(slides, vec!["A", "B"]);
    }

    #[test]
    fn test_split_slides_round_trip_with_join() {
        let pages = vec!["first page\nline two", "second"];
        let joined = join_slides(&pages);
        assert_eq!(joined, "first page\nline two\n\n===\n\nsecond");
        assert_eq!(split_slides(&joined), pages);
    }

    #[test]
    fn test_split_slides_without_separator_is_single_trimmed_slide() {
        assert_eq!(split_slides("\n  hello \n"), vec!["hello"]);
        assert!(split_slides("  \n ").is_empty());
    }

    // ── unit grouping ───────────────────────────────────────────────────────

    #[test]
    fn test_separator_normalized_and_splits_units() {
        let units = apply_pagination_rules(&["a", "=====", "b"], Layout::Quote);
        assert_eq!(units, vec!["a", "===", "b"]);
        let segments = split_segments(&units);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], ["a".to_string()]);
    }

    #[test]
    fn test_heading_keeps_with_next_line() {
        let units = apply_pagination_rules(&["## Title", "", "body", "next"], Layout::Sketch);
        assert_eq!(units, vec!["## Title\n\nbody", "next"]);
    }

    #[test]
    fn test_heading_does_not_cross_separator() {
        let units = apply_pagination_rules(&["# Title", "===", "body"], Layout::List);
        assert_eq!(units, vec!["# Title", "===", "body"]);
    }

    #[test]
    fn test_grid_header_binds_body() {
        let lines = ["一.", "每天六点起床", "二.", "跑步三十分钟"];
        let units = apply_pagination_rules(&lines, Layout::Grid);
        assert_eq!(units, vec!["一.\n每天六点起床", "二.\n跑步三十分钟"]);
    }

    #[test]
    fn test_grid_header_with_inline_point_stands_alone() {
        let lines = ["一. 早起. 六点起床", "随手记"];
        let units = apply_pagination_rules(&lines, Layout::Grid);
        assert_eq!(units, vec!["一. 早起. 六点起床", "随手记"]);

        let lines = ["一. 早起", "随手记"];
        assert_eq!(apply_pagination_rules(&lines, Layout::Grid).len(), 2);
    }

    #[test]
    fn test_grid_consecutive_headers_stay_separate() {
        let lines = ["一. 早起. 六点", "二. 运动. 跑步"];
        let units = apply_pagination_rules(&lines, Layout::Grid);
        assert_eq!(units.len(), 2);
    }

    #[test]
    fn test_grid_header_only_binds_in_grid_layout() {
        let lines = ["一. 早起", "每天六点起床"];
        let units = apply_pagination_rules(&lines, Layout::Minimalist);
        assert_eq!(units.len(), 2);
    }

    #[test]
    fn test_dict_term_binds_definition() {
        let lines = ["熵：", "系统混乱程度的度量", "Entropy:", "a measure of disorder"];
        let units = apply_pagination_rules(&lines, Layout::Dict);
        assert_eq!(units.len(), 2);
        assert_eq!(units[1], "Entropy:\na measure of disorder");
    }

    #[test]
    fn test_list_continuation_lines_stay_with_item() {
        let lines = ["1. buy milk", "   whole, not skim", "2. call mom", "plain"];
        let units = apply_pagination_rules(&lines, Layout::List);
        assert_eq!(
            units,
            vec!["1. buy milk\n   whole, not skim", "2. call mom", "plain"]
        );
    }

    #[test]
    fn test_units_preserve_every_line_in_order() {
        let lines = ["# H", "", "a", "- b", "  c", "===", "", "d"];
        let units = apply_pagination_rules(&lines, Layout::List);
        let rebuilt: Vec<String> = units
            .iter()
            .filter(|u| u.as_str() != SEPARATOR_UNIT)
            .cloned()
            .collect();
        assert_eq!(rebuilt.join("\n"), "# H\n\na\n- b\n  c\n\nd");
    }
}
