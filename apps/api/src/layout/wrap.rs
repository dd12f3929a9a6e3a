//! Greedy line wrapping over estimated glyph widths.
//!
//! Latin text breaks at spaces; every double-width glyph is its own break
//! opportunity; a word wider than the line is broken per glyph. Trailing spaces
//! hang past the line end, as they do in CSS.

use std::sync::LazyLock;

use regex::Regex;

use crate::layout::typography::{glyph_px, is_wide, FontMetrics};

static HEADING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s*").expect("heading prefix pattern is valid"));

/// `*em*` only: underscores are too common inside identifiers to treat as markup.
static SINGLE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^\s*][^*]*?)\*").expect("emphasis pattern is valid"));

/// Drops markdown markers that the card renderer does not draw.
pub fn strip_markdown(line: &str) -> String {
    let without_heading = HEADING_PREFIX.replace(line, "");
    let without_strong = without_heading.replace("**", "").replace("__", "").replace('`', "");
    SINGLE_EMPHASIS
        .replace_all(&without_strong, "$1")
        .into_owned()
}

/// Text measurement inputs shared by every line of one block.
#[derive(Debug, Clone, Copy)]
pub struct WrapParams<'a> {
    pub metrics: &'a FontMetrics,
    pub font_px: f32,
    pub tracking_em: f32,
    pub max_width_px: f32,
}

enum Token {
    Space(f32),
    /// Unbreakable run (a Latin word or a single wide glyph), with per-glyph widths.
    Run(Vec<f32>),
}

fn tokenize(text: &str, params: &WrapParams<'_>) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<f32> = Vec::new();
    let px = |c| glyph_px(params.metrics, c, params.font_px, params.tracking_em);

    for c in text.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                tokens.push(Token::Run(std::mem::take(&mut word)));
            }
            tokens.push(Token::Space(px(' ')));
        } else if is_wide(c) {
            if !word.is_empty() {
                tokens.push(Token::Run(std::mem::take(&mut word)));
            }
            tokens.push(Token::Run(vec![px(c)]));
        } else {
            let w = px(c);
            if w > 0.0 || !word.is_empty() {
                word.push(w);
            } else if let Some(Token::Run(prev)) = tokens.last_mut() {
                // Zero-width joiners and variation selectors ride on the previous run.
                prev.push(w);
            }
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Run(word));
    }
    tokens
}

/// Number of visual lines `text` occupies. Blank text occupies zero lines.
pub fn wrap_line_count(text: &str, params: &WrapParams<'_>) -> u32 {
    if text.trim().is_empty() {
        return 0;
    }
    let max = params.max_width_px.max(1.0);
    let mut lines = 1u32;
    let mut current = 0.0_f32;

    for token in tokenize(text, params) {
        match token {
            Token::Space(w) => {
                if current > 0.0 && current + w <= max {
                    current += w;
                }
            }
            Token::Run(glyphs) => {
                let run: f32 = glyphs.iter().sum();
                if current > 0.0 && current + run > max {
                    lines += 1;
                    current = 0.0;
                }
                if run <= max {
                    current += run;
                    continue;
                }
                for g in glyphs {
                    if current > 0.0 && current + g > max {
                        lines += 1;
                        current = 0.0;
                    }
                    current += g;
                }
            }
        }
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
