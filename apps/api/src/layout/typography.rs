//! Static glyph metrics for the seven card typefaces, plus the type scale per font size.
//!
//! Widths are in em units. Double-width code points (CJK ideographs, kana, hangul,
//! most emoji) take a full em in every face; the faces differ in their Latin advance.
//! This is an approximation: real shaping would need the font files, but the
//! estimate is close enough to pick page breaks, and every surface probe is
//! recomputed with the same tables so results are consistent within a run.

use unicode_width::UnicodeWidthChar;

use crate::models::card::{FontId, FontSize};

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct FontMetrics {
    pub font: FontId,
    /// Average advance of a narrow (Latin, digit, punctuation) glyph.
    pub narrow_advance_em: f32,
    /// Advance of a double-width glyph.
    pub wide_advance_em: f32,
    pub space_em: f32,
    /// Advance of thin glyphs (`i l . , ' ! |`).
    pub thin_advance_em: f32,
}

impl FontMetrics {
    /// Advance of one char in em, excluding tracking.
    pub fn advance_em(&self, c: char) -> f32 {
        match c {
            ' ' => return self.space_em,
            'i' | 'l' | '.' | ',' | '\'' | '!' | '|' | ':' | ';' => return self.thin_advance_em,
            _ => {}
        }
        match c.width() {
            None | Some(0) => 0.0,
            Some(2) => self.wide_advance_em,
            _ => self.narrow_advance_em,
        }
    }

    /// Rendered width of `s` in px at `font_px`, with `tracking_em` added per glyph.
    pub fn measure_px(&self, s: &str, font_px: f32, tracking_em: f32) -> f32 {
        s.chars()
            .map(|c| glyph_px(self, c, font_px, tracking_em))
            .sum()
    }
}

/// Width of a single glyph in px; zero-width glyphs get no tracking either.
pub fn glyph_px(metrics: &FontMetrics, c: char, font_px: f32, tracking_em: f32) -> f32 {
    let advance = metrics.advance_em(c);
    if advance == 0.0 {
        0.0
    } else {
        (advance + tracking_em) * font_px
    }
}

/// True for glyphs that are their own line-break opportunity (CJK-style text).
pub fn is_wide(c: char) -> bool {
    c.width() == Some(2)
}

static SANS_SC: FontMetrics = FontMetrics {
    font: FontId::SansSc,
    narrow_advance_em: 0.56,
    wide_advance_em: 1.0,
    space_em: 0.28,
    thin_advance_em: 0.26,
};

static SERIF_SC: FontMetrics = FontMetrics {
    font: FontId::SerifSc,
    narrow_advance_em: 0.52,
    wide_advance_em: 1.0,
    space_em: 0.25,
    thin_advance_em: 0.25,
};

static HANDWRITING: FontMetrics = FontMetrics {
    font: FontId::Handwriting,
    narrow_advance_em: 0.5,
    wide_advance_em: 1.0,
    space_em: 0.3,
    thin_advance_em: 0.24,
};

static ARTISTIC: FontMetrics = FontMetrics {
    font: FontId::Artistic,
    narrow_advance_em: 0.5,
    wide_advance_em: 1.0,
    space_em: 0.25,
    thin_advance_em: 0.24,
};

/// Display face: wide Latin, tall x-height.
static POSTER: FontMetrics = FontMetrics {
    font: FontId::Poster,
    narrow_advance_em: 0.62,
    wide_advance_em: 1.0,
    space_em: 0.3,
    thin_advance_em: 0.3,
};

static HAPPY: FontMetrics = FontMetrics {
    font: FontId::Happy,
    narrow_advance_em: 0.6,
    wide_advance_em: 1.0,
    space_em: 0.3,
    thin_advance_em: 0.28,
};

/// Brush script: CJK glyphs are drawn slightly wider than the em box.
static CALLIGRAPHY: FontMetrics = FontMetrics {
    font: FontId::Calligraphy,
    narrow_advance_em: 0.58,
    wide_advance_em: 1.05,
    space_em: 0.3,
    thin_advance_em: 0.3,
};

/// Returns the static metric table for a card font.
pub fn get_metrics(font: &FontId) -> &'static FontMetrics {
    match font {
        FontId::SansSc => &SANS_SC,
        FontId::SerifSc => &SERIF_SC,
        FontId::Handwriting => &HANDWRITING,
        FontId::Artistic => &ARTISTIC,
        FontId::Poster => &POSTER,
        FontId::Happy => &HAPPY,
        FontId::Calligraphy => &CALLIGRAPHY,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Type scale
// ────────────────────────────────────────────────────────────────────────────

/// Pixel sizes of every text role on a card, for one font-size setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeScale {
    pub title_px: f32,
    pub subtitle_px: f32,
    pub content_px: f32,
    pub quote_px: f32,
    pub dict_title_px: f32,
    pub grid_title_px: f32,
    pub grid_point_px: f32,
    pub sketch_title_px: f32,
    pub sketch_content_px: f32,
    pub minimalist_title_px: f32,
    pub minimalist_subtitle_px: f32,
    pub minimalist_content_px: f32,
}

pub fn type_scale(size: FontSize) -> TypeScale {
    match size {
        FontSize::Small => TypeScale {
            title_px: 30.0,
            subtitle_px: 14.0,
            content_px: 16.0,
            quote_px: 30.0,
            dict_title_px: 36.0,
            grid_title_px: 24.0,
            grid_point_px: 14.0,
            sketch_title_px: 24.0,
            sketch_content_px: 14.0,
            minimalist_title_px: 36.0,
            minimalist_subtitle_px: 16.0,
            minimalist_content_px: 16.0,
        },
        FontSize::Normal => TypeScale {
            title_px: 36.0,
            subtitle_px: 16.0,
            content_px: 18.0,
            quote_px: 36.0,
            dict_title_px: 48.0,
            grid_title_px: 30.0,
            grid_point_px: 16.0,
            sketch_title_px: 30.0,
            sketch_content_px: 16.0,
            minimalist_title_px: 48.0,
            minimalist_subtitle_px: 18.0,
            minimalist_content_px: 18.0,
        },
        FontSize::Large => TypeScale {
            title_px: 48.0,
            subtitle_px: 18.0,
            content_px: 20.0,
            quote_px: 48.0,
            dict_title_px: 60.0,
            grid_title_px: 36.0,
            grid_point_px: 18.0,
            sketch_title_px: 36.0,
            sketch_content_px: 18.0,
            minimalist_title_px: 60.0,
            minimalist_subtitle_px: 20.0,
            minimalist_content_px: 20.0,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cjk_glyph_is_full_em() {
        let m = get_metrics(&FontId::SansSc);
        assert_eq!(m.advance_em('汉'), 1.0);
        assert_eq!(m.measure_px("你好", 18.0, 0.0), 36.0);
    }

    #[test]
    fn test_latin_narrower_than_cjk() {
        let m = get_metrics(&FontId::SerifSc);
        assert!(m.measure_px("ab", 16.0, 0.0) < m.measure_px("汉", 16.0, 0.0) * 2.0);
        assert!(m.advance_em('i') < m.advance_em('m'));
    }

    #[test]
    fn test_emoji_counts_as_wide() {
        assert!(is_wide('🍜'));
        assert!(!is_wide('a'));
    }

    #[test]
    fn test_zero_width_chars_take_no_space() {
        let m = get_metrics(&FontId::Poster);
        // Variation selector in "✈️".
        assert_eq!(m.measure_px("\u{FE0F}", 18.0, 0.1), 0.0);
    }

    #[test]
    fn test_tracking_adds_per_glyph() {
        let m = get_metrics(&FontId::SansSc);
        let plain = m.measure_px("汉字", 10.0, 0.0);
        let tracked = m.measure_px("汉字", 10.0, 0.1);
        assert!((tracked - plain - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_type_scale_grows_with_size() {
        let small = type_scale(FontSize::Small);
        let large = type_scale(FontSize::Large);
        assert!(small.content_px < large.content_px);
        assert!(small.title_px < large.title_px);
    }

    #[test]
    fn test_every_font_has_metrics() {
        for font in [
            FontId::SansSc,
            FontId::SerifSc,
            FontId::Handwriting,
            FontId::Artistic,
            FontId::Poster,
            FontId::Happy,
            FontId::Calligraphy,
        ] {
            assert_eq!(get_metrics(&font).font, font);
        }
    }
}
