//! Card geometry: how much vertical room the body text gets, and how tall a body
//! renders, per layout template.
//!
//! Box sizes mirror the card templates (mobile breakpoint): outer padding 24px,
//! footer with author + tag, per-layout header block. The content area is whatever
//! remains of the canvas after the fixed chrome.

use serde::{Deserialize, Serialize};

use crate::content::rules::{GRID_HEADER, LIST_MARKER};
use crate::layout::typography::{get_metrics, type_scale, FontMetrics, TypeScale};
use crate::layout::wrap::{strip_markdown, wrap_line_count, WrapParams};
use crate::models::card::{Layout, StyleSnapshot};

const OUTER_PADDING_PX: f32 = 24.0;
/// mt-4 + pt-3 + author line + tag line.
const FOOTER_PX: f32 = 64.0;
/// Bottom margin of a paragraph block; also what an empty line costs.
const BLOCK_GAP_PX: f32 = 12.0;
const MINIMALIST_MAX_WIDTH_PX: f32 = 448.0;

/// Body-text box of a card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentArea {
    pub width_px: f32,
    pub height_px: f32,
}

/// Non-body text that shapes the chrome around the content area.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardFrame<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
}

struct Typeset<'a> {
    metrics: &'a FontMetrics,
    scale: TypeScale,
    tracking_em: f32,
}

impl Typeset<'_> {
    fn for_style(style: &StyleSnapshot) -> Self {
        Typeset {
            metrics: get_metrics(&style.font),
            scale: type_scale(style.font_size),
            tracking_em: style.letter_spacing,
        }
    }

    /// Height of `text` wrapped at `width_px`, at `font_px` with line-height `leading`.
    fn text_px(&self, text: &str, font_px: f32, leading: f32, width_px: f32) -> f32 {
        let params = WrapParams {
            metrics: self.metrics,
            font_px,
            tracking_em: self.tracking_em,
            max_width_px: width_px,
        };
        wrap_line_count(&strip_markdown(text), &params) as f32 * font_px * leading
    }

    /// Single line of chrome text (subtitle, author); present even when empty.
    fn line_px(&self, font_px: f32, leading: f32) -> f32 {
        font_px * leading
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content area
// ────────────────────────────────────────────────────────────────────────────

/// Available body box for a card with the given style and title block.
pub fn content_area(style: &StyleSnapshot, frame: &CardFrame<'_>) -> ContentArea {
    let (canvas_w, canvas_h) = style.aspect_ratio.canvas_px();
    let inner_w = canvas_w - 2.0 * OUTER_PADDING_PX;
    let inner_h = canvas_h - 2.0 * OUTER_PADDING_PX;
    let t = Typeset::for_style(style);
    let s = &t.scale;

    let footer = if style.layout == Layout::Minimalist {
        0.0
    } else {
        FOOTER_PX
    };

    let (chrome, width) = match style.layout {
        Layout::List => {
            let header_w = inner_w - 64.0;
            let header = t.text_px(frame.title, s.title_px, 1.25, header_w)
                + 12.0
                + t.line_px(s.subtitle_px, 1.5)
                + 12.0
                + 6.0
                + 24.0;
            (header, inner_w)
        }
        Layout::Quote => {
            // Icon + gap above, gap + attribution below.
            let chrome = 40.0 + 24.0 + 24.0 + t.line_px(18.0, 1.55);
            (chrome, inner_w - 16.0)
        }
        Layout::Dict => {
            let header = 8.0
                + t.line_px(18.0, 1.5)
                + 8.0
                + t.text_px(frame.title, s.dict_title_px, 1.0, inner_w - 48.0)
                + 16.0
                + 2.0
                + 24.0;
            // Definition box: p-4 all round plus a 4px left rule.
            (header + 32.0, inner_w - 32.0 - 4.0)
        }
        Layout::Grid => {
            let header = t.text_px(frame.title, s.title_px, 1.25, inner_w)
                + 8.0
                + t.line_px(s.subtitle_px, 1.5)
                + 16.0;
            (header, inner_w)
        }
        Layout::Sketch => {
            // Dashed frame: p-2 + 3px border, then the title row and attribution.
            let frame_box = 2.0 * (8.0 + 3.0);
            let title_w = inner_w - frame_box - 16.0 - 32.0 - 12.0;
            let title = t.text_px(frame.title, s.sketch_title_px, 1.25, title_w).max(32.0);
            let chrome = frame_box + 8.0 + title + 16.0 + 16.0 + t.line_px(14.0, 1.43);
            (chrome, inner_w - frame_box - 16.0 - 2.0)
        }
        Layout::Minimalist => {
            let header = 16.0
                + t.line_px(s.minimalist_subtitle_px, 1.5)
                + 16.0
                + t.text_px(frame.title, s.minimalist_title_px, 1.25, inner_w)
                + 16.0
                + 1.0;
            let mut width = (inner_w - 32.0).min(MINIMALIST_MAX_WIDTH_PX);
            let mut chrome = header;
            if style.background_image {
                width -= 48.0;
                chrome += 48.0;
            }
            (chrome, width)
        }
    };

    ContentArea {
        width_px: width.max(1.0),
        height_px: (inner_h - footer - chrome).max(0.0),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Body height
// ────────────────────────────────────────────────────────────────────────────

/// Rendered height of body `content` inside `area`, one block per source line.
pub fn layout_height(content: &str, style: &StyleSnapshot, area: &ContentArea) -> f32 {
    let t = Typeset::for_style(style);
    content
        .split('\n')
        .map(|line| block_height(line, style, area, &t))
        .sum()
}

fn block_height(line: &str, style: &StyleSnapshot, area: &ContentArea, t: &Typeset<'_>) -> f32 {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return BLOCK_GAP_PX;
    }
    let s = &t.scale;
    let leading = style.line_height.max(1.0);
    let spacing = style.paragraph_spacing.max(0.0);

    let body = match style.layout {
        Layout::List if LIST_MARKER.is_match(line) => {
            let (marker, rest) = split_marker(trimmed);
            let marker_w = t.metrics.measure_px(marker, s.content_px, t.tracking_em) + 8.0;
            let text_w = area.width_px - 16.0 - marker_w;
            t.text_px(rest, s.content_px, leading, text_w).max(s.content_px * leading)
                + 16.0
                + BLOCK_GAP_PX
        }
        Layout::Grid if GRID_HEADER.is_match(trimmed) => {
            let (header, rest) = split_marker(trimmed);
            let inner_w = area.width_px - 24.0;
            24.0 + t.text_px(header, s.grid_title_px, 1.25, inner_w)
                + 4.0
                + t.text_px(rest, s.grid_point_px, leading, inner_w)
                + BLOCK_GAP_PX
        }
        Layout::Sketch => t.text_px(trimmed, s.sketch_content_px, 1.5, area.width_px) + 8.0 + 12.0,
        Layout::Minimalist => {
            t.text_px(trimmed, s.minimalist_content_px, 2.0, area.width_px) + BLOCK_GAP_PX
        }
        Layout::Quote => t.text_px(trimmed, s.quote_px, 1.25, area.width_px),
        _ => {
            let plate = if style.background_image { 16.0 } else { 0.0 };
            t.text_px(trimmed, s.content_px, leading, area.width_px - plate)
                + BLOCK_GAP_PX
                + plate
        }
    };

    body + spacing
}

/// Splits `"1. text"` / `"一. text"` / `"- text"` into marker and remainder.
fn split_marker(line: &str) -> (&str, &str) {
    let cut = line
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || *c == '.')
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(line.len());
    (line[..cut].trim(), line[cut..].trim())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::{AspectRatio, FontSize};

    fn style(layout: Layout) -> StyleSnapshot {
        StyleSnapshot {
            layout,
            ..StyleSnapshot::default()
        }
    }

    fn frame() -> CardFrame<'static> {
        CardFrame {
            title: "周末食谱",
            subtitle: "简单快手",
        }
    }

    // ── content_area ────────────────────────────────────────────────────────

    #[test]
    fn test_story_ratio_has_more_room() {
        let mut s = style(Layout::List);
        let portrait = content_area(&s, &frame());
        s.aspect_ratio = AspectRatio::Story;
        let story = content_area(&s, &frame());
        assert!((story.height_px - portrait.height_px - 240.0).abs() < 1e-3);
        assert_eq!(story.width_px, portrait.width_px);
    }

    #[test]
    fn test_long_title_shrinks_budget() {
        let s = style(Layout::Grid);
        let short = content_area(&s, &frame());
        let long_title = "这是一个非常非常长的标题，它一定会在卡片上换行很多次才能放下";
        let long = content_area(
            &s,
            &CardFrame {
                title: long_title,
                subtitle: "",
            },
        );
        assert!(long.height_px < short.height_px);
    }

    #[test]
    fn test_minimalist_width_is_capped() {
        let area = content_area(&style(Layout::Minimalist), &frame());
        assert!(area.width_px <= MINIMALIST_MAX_WIDTH_PX);
    }

    #[test]
    fn test_every_layout_leaves_positive_room() {
        for layout in [
            Layout::List,
            Layout::Quote,
            Layout::Dict,
            Layout::Grid,
            Layout::Sketch,
            Layout::Minimalist,
        ] {
            let area = content_area(&style(layout), &frame());
            assert!(area.height_px > 100.0, "{layout:?}: {area:?}");
            assert!(area.width_px > 100.0, "{layout:?}: {area:?}");
        }
    }

    // ── layout_height ───────────────────────────────────────────────────────

    #[test]
    fn test_height_grows_with_lines() {
        let s = style(Layout::Dict);
        let area = content_area(&s, &frame());
        let one = layout_height("第一行", &s, &area);
        let two = layout_height("第一行\n第二行", &s, &area);
        assert!(two > one);
        assert!((two - 2.0 * one).abs() < 1e-3);
    }

    #[test]
    fn test_list_item_taller_than_plain_line() {
        let s = style(Layout::List);
        let area = content_area(&s, &frame());
        let item = layout_height("1. 买牛奶", &s, &area);
        let plain = layout_height("买牛奶", &s, &area);
        assert!(item > plain);
    }

    #[test]
    fn test_grid_entry_includes_header_box() {
        let s = style(Layout::Grid);
        let area = content_area(&s, &frame());
        let entry = layout_height("一. 早起. 每天六点起床", &s, &area);
        let plain = layout_height("每天六点起床", &s, &area);
        assert!(entry > plain + 24.0);
    }

    #[test]
    fn test_long_line_wraps_to_more_height() {
        let s = style(Layout::Sketch);
        let area = content_area(&s, &frame());
        let short = layout_height("短句", &s, &area);
        let long = layout_height(&"长".repeat(400), &s, &area);
        assert!(long > short * 5.0);
    }

    #[test]
    fn test_larger_font_is_taller() {
        let mut s = style(Layout::Minimalist);
        let area = content_area(&s, &frame());
        let text = "慢慢来，比较快。".repeat(10);
        let normal = layout_height(&text, &s, &area);
        s.font_size = FontSize::Large;
        let large = layout_height(&text, &s, &area);
        assert!(large > normal);
    }

    #[test]
    fn test_paragraph_spacing_and_background_plate() {
        let mut s = style(Layout::Dict);
        let area = content_area(&s, &frame());
        let base = layout_height("定义", &s, &area);
        s.paragraph_spacing = 10.0;
        s.background_image = true;
        let spaced = layout_height("定义", &s, &area);
        assert!((spaced - base - 26.0).abs() < 1e-3);
    }

    #[test]
    fn test_blank_line_costs_block_gap() {
        let s = style(Layout::Quote);
        let area = content_area(&s, &frame());
        assert_eq!(layout_height("", &s, &area), BLOCK_GAP_PX);
    }

    #[test]
    fn test_split_marker() {
        assert_eq!(split_marker("1. buy milk"), ("1.", "buy milk"));
        assert_eq!(split_marker("一. 早起. 六点"), ("一.", "早起. 六点"));
        assert_eq!(split_marker("- item"), ("-", "item"));
    }
}
