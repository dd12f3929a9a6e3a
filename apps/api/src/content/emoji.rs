//! Emoji classification and insertion.
//!
//! One category is chosen per content string (first keyword match wins, in a fixed
//! priority order) and every decorated line draws from that category's pool.
//! Glyph choice and paragraph decoration are random; callers inject the RNG so tests
//! can seed it.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::content::rules::{is_separator_line, LIST_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmojiCategory {
    List,
    Positive,
    Food,
    Travel,
    Work,
    Creative,
    Nature,
    Default,
}

impl EmojiCategory {
    /// Candidate glyphs for this category.
    pub fn pool(&self) -> &'static [&'static str] {
        match self {
            EmojiCategory::List => &["✨", "🌟", "💡", "📌", "🎯", "✅", "💫", "⭐", "🔥", "💪"],
            EmojiCategory::Positive => &["😊", "🥰", "💕", "🌸", "🌈", "🍀", "🎉", "💖", "✨", "🌺"],
            EmojiCategory::Food => &["🍜", "🍕", "☕", "🍰", "🍵", "🥗", "🍿", "🧁", "🍪", "🍩"],
            EmojiCategory::Travel => &["✈️", "🌍", "🏝️", "🗺️", "🚀", "🌄", "🏔️", "🌅", "⛱️", "🎒"],
            EmojiCategory::Work => &["💼", "📊", "💻", "📝", "🎯", "📈", "🔍", "📚", "✏️", "🗂️"],
            EmojiCategory::Creative => &["🎨", "🖌️", "📷", "🎬", "🎸", "🎤", "🖼️", "✍️", "🎭", "🎹"],
            EmojiCategory::Nature => &["🌿", "🌻", "🍃", "🌳", "🌊", "☀️", "🌙", "⭐", "🦋", "🌷"],
            EmojiCategory::Default => &["✨", "💡", "📌", "🌟", "💫", "🎯", "💪", "🔥", "⭐", "🌈"],
        }
    }
}

/// Tunable insertion knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmojiConfig {
    /// Chance that a plain paragraph line after the first is decorated.
    pub paragraph_probability: f64,
    /// Paragraph lines must be longer than this (in chars) to be eligible.
    pub min_paragraph_chars: usize,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        EmojiConfig {
            paragraph_probability: 0.3,
            min_paragraph_chars: 10,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// Topical keyword tests in priority order.
static TOPIC_PATTERNS: LazyLock<Vec<(EmojiCategory, Regex)>> = LazyLock::new(|| {
    [
        (
            EmojiCategory::Food,
            r"食|吃|餐|咖啡|奶茶|蛋糕|面|饭|菜|(?i:\b(?:food|eat|coffee|tea|cake|dinner|lunch|breakfast|recipe|noodles?)\b)",
        ),
        (
            EmojiCategory::Travel,
            r"旅|游|飞|机场|酒店|景|海|山|(?i:\b(?:travel|trip|flight|airport|hotel|beach|mountain|journey)\b)",
        ),
        (
            EmojiCategory::Work,
            r"工作|开会|项目|任务|计划|目标|(?i:\b(?:work|meeting|project|task|plan|goal|deadline)s?\b)",
        ),
        (
            EmojiCategory::Creative,
            r"画|设计|创作|摄影|音乐|艺术|(?i:\b(?:draw|design|photo|photography|music|art|paint)\w*\b)",
        ),
        (
            EmojiCategory::Nature,
            r"花|草|树|自然|公园|天气|(?i:\b(?:flowers?|trees?|nature|park|weather|garden|forest)\b)",
        ),
        (
            EmojiCategory::Positive,
            r"开心|快乐|幸福|爱|美好|可爱|(?i:\b(?:happy|joy|love|lovely|cute|grateful)\b)",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| {
        (
            category,
            Regex::new(pattern).expect("emoji topic pattern is valid"),
        )
    })
    .collect()
});

/// Picks the emoji category for a whole content string.
///
/// Topical keywords win in priority order (food, travel, work, creative, nature,
/// positive). Content with no topical keyword gets the default pool.
pub fn classify(content: &str) -> EmojiCategory {
    TOPIC_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(content))
        .map(|(category, _)| *category)
        .unwrap_or(EmojiCategory::Default)
}

/// True if the trimmed line already opens with a glyph from the common emoji blocks.
pub fn starts_with_emoji(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .map(|c| {
            matches!(c as u32,
                0x1F300..=0x1F9FF | 0x2600..=0x26FF | 0x2700..=0x27BF)
        })
        .unwrap_or(false)
}

// ────────────────────────────────────────────────────────────────────────────
// Insertion
// ────────────────────────────────────────────────────────────────────────────

/// Captures leading whitespace + list marker, and the spacing after it.
static LIST_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*(?:[-*]|\d+\.))\s*").expect("list prefix pattern is valid")
});

/// Result of one insertion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiInsertion {
    pub content: String,
    pub category: EmojiCategory,
    pub decorated_lines: usize,
}

/// Decorates list items and a sample of paragraphs with emoji.
pub fn insert_emojis<R: Rng + ?Sized>(content: &str, config: &EmojiConfig, rng: &mut R) -> String {
    insert_emojis_detailed(content, config, rng).content
}

/// Same as [`insert_emojis`], also reporting the chosen category and how many lines
/// were touched.
pub fn insert_emojis_detailed<R: Rng + ?Sized>(
    content: &str,
    config: &EmojiConfig,
    rng: &mut R,
) -> EmojiInsertion {
    let category = classify(content);
    let pool = category.pool();
    let probability = clamp_probability(config.paragraph_probability);
    let mut decorated_lines = 0;

    let lines: Vec<String> = content
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty()
                || starts_with_emoji(trimmed)
                || trimmed.starts_with('#')
                || is_separator_line(trimmed)
            {
                return line.to_string();
            }

            if LIST_MARKER.is_match(line) {
                let emoji = pick(pool, rng);
                decorated_lines += 1;
                return LIST_PREFIX
                    .replace(line, |caps: &regex::Captures| format!("{} {emoji} ", &caps[1]))
                    .into_owned();
            }

            let eligible = index == 0
                || (trimmed.chars().count() > config.min_paragraph_chars
                    && rng.random_bool(probability));
            if eligible {
                let emoji = pick(pool, rng);
                decorated_lines += 1;
                let indent = &line[..line.len() - line.trim_start().len()];
                return format!("{indent}{emoji} {trimmed}");
            }

            line.to_string()
        })
        .collect();

    EmojiInsertion {
        content: lines.join("\n"),
        category,
        decorated_lines,
    }
}

/// `random_bool` panics outside [0, 1]; NaN disables paragraph decoration.
fn clamp_probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn pick<R: Rng + ?Sized>(pool: &'static [&'static str], rng: &mut R) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
