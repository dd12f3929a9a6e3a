use serde::{Deserialize, Serialize};

/// Canvas aspect ratio of an exported card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Cover format. Less vertical room per slide.
    #[default]
    #[serde(rename = "3:4")]
    Portrait,
    /// Wallpaper / story format.
    #[serde(rename = "9:16")]
    Story,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "3:4",
            AspectRatio::Story => "9:16",
        }
    }

    /// Logical canvas size in CSS pixels `(width, height)`.
    ///
    /// Both ratios share a width so the same font size wraps identically;
    /// only the vertical room differs.
    pub fn canvas_px(&self) -> (f32, f32) {
        match self {
            AspectRatio::Portrait => (540.0, 720.0),
            AspectRatio::Story => (540.0, 960.0),
        }
    }
}

/// Presentation template. Decides which lines are atomic and how blocks are boxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    List,
    Quote,
    Dict,
    Grid,
    Sketch,
    Minimalist,
}

/// Card typefaces. Serialized with the ids the editor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontId {
    #[default]
    #[serde(rename = "font-sans-sc")]
    SansSc,
    #[serde(rename = "font-serif-sc")]
    SerifSc,
    #[serde(rename = "font-handwriting")]
    Handwriting,
    #[serde(rename = "font-artistic")]
    Artistic,
    #[serde(rename = "font-poster")]
    Poster,
    #[serde(rename = "font-happy")]
    Happy,
    #[serde(rename = "font-calligraphy")]
    Calligraphy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    Small,
    #[default]
    Normal,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Every style input that changes rendered height, captured once per computation run.
///
/// A run never reads live style state: it receives one snapshot and keeps it until
/// it finishes or is superseded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSnapshot {
    pub aspect_ratio: AspectRatio,
    pub layout: Layout,
    pub font: FontId,
    pub font_size: FontSize,
    /// Line-height multiplier applied to body text.
    pub line_height: f32,
    /// Extra tracking per glyph, in em.
    pub letter_spacing: f32,
    /// Extra space after each paragraph block, in px.
    pub paragraph_spacing: f32,
    pub text_align: TextAlign,
    pub theme: String,
    /// Background images put body blocks on translucent plates with extra padding.
    pub background_image: bool,
}

impl Default for StyleSnapshot {
    fn default() -> Self {
        StyleSnapshot {
            aspect_ratio: AspectRatio::default(),
            layout: Layout::default(),
            font: FontId::default(),
            font_size: FontSize::default(),
            line_height: 1.625,
            letter_spacing: 0.0,
            paragraph_spacing: 0.0,
            text_align: TextAlign::default(),
            theme: "minimal".to_string(),
            background_image: false,
        }
    }
}

/// One editing-session card as submitted by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub style: StyleSnapshot,
    #[serde(default = "default_true")]
    pub auto_emoji: bool,
    #[serde(default = "default_true")]
    pub auto_paginate: bool,
}

fn default_true() -> bool {
    true
}
