//! Fixed-budget pagination: a fast character-count estimate per aspect ratio.
//!
//! Used where no measurement surface is available. It cannot see fonts, wrapping or
//! glyph widths; the measured paginator is the precise path.

use serde::{Deserialize, Serialize};

use crate::content::rules::{has_manual_separator, split_slides};
use crate::models::card::AspectRatio;

/// Character budgets per aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharBudgets {
    pub portrait: usize,
    pub story: usize,
}

impl Default for CharBudgets {
    fn default() -> Self {
        CharBudgets {
            portrait: 150,
            story: 250,
        }
    }
}

impl CharBudgets {
    /// Budget for the ratio, never below one char.
    pub fn for_ratio(&self, ratio: AspectRatio) -> usize {
        let budget = match ratio {
            AspectRatio::Portrait => self.portrait,
            AspectRatio::Story => self.story,
        };
        budget.max(1)
    }
}

const SENTENCE_ENDS: [char; 6] = ['。', '！', '？', '.', '!', '?'];

/// Splits content into pages sized for `ratio`, preferring natural breaks.
///
/// Manual `===` separators are honored first; each manual slide is then split on its
/// own. Content with no separator that already fits comes back as a single page,
/// untouched.
pub fn paginate_content(content: &str, ratio: AspectRatio, budgets: &CharBudgets) -> Vec<String> {
    paginate_with_budget(content, budgets.for_ratio(ratio))
}

fn paginate_with_budget(content: &str, budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    if !has_manual_separator(content) && content.chars().count() <= budget {
        return vec![content.to_string()];
    }

    split_slides(content)
        .iter()
        .flat_map(|slide| split_by_budget(slide, budget))
        .collect()
}

/// Greedy budget split of one separator-free segment.
///
/// Break preference inside each window: paragraph break in the back half, line break
/// in the back half, sentence end past 30% of the window, hard cut at the budget.
pub(crate) fn split_by_budget(segment: &str, budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    let mut pages = Vec::new();
    let mut remaining: Vec<char> = segment.trim().chars().collect();

    while !remaining.is_empty() {
        if remaining.len() <= budget {
            pages.push(remaining.iter().collect());
            break;
        }

        let split_at = find_split(&remaining, budget);

        let page: String = remaining[..split_at].iter().collect::<String>();
        let page = page.trim();
        if !page.is_empty() {
            pages.push(page.to_string());
        }

        let rest: String = remaining[split_at..].iter().collect();
        remaining = rest.trim().chars().collect();
    }

    pages
}

/// Picks the split index for a window. Always in `1..=budget`.
fn find_split(chars: &[char], budget: usize) -> usize {
    let half = budget as f64 * 0.5;

    if let Some(idx) = last_index_of(chars, &['\n', '\n'], budget) {
        if idx as f64 > half {
            return idx;
        }
    }
    if let Some(idx) = last_index_of(chars, &['\n'], budget) {
        if idx as f64 > half {
            return idx;
        }
    }

    // The punctuation stays on the page, so it must sit inside the window.
    let sentence_end = SENTENCE_ENDS
        .iter()
        .filter_map(|c| last_index_of(chars, &[*c], budget - 1))
        .max();
    if let Some(idx) = sentence_end {
        if idx as f64 > budget as f64 * 0.3 {
            return idx + 1;
        }
    }

    budget
}

/// Last position `<= from` where `pattern` starts.
fn last_index_of(haystack: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if pattern.is_empty() || pattern.len() > haystack.len() {
        return None;
    }
    let last_start = from.min(haystack.len() - pattern.len());
    (0..=last_start)
        .rev()
        .find(|&i| haystack[i..i + pattern.len()] == *pattern)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
