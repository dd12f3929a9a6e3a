//! Content processor: emoji insertion followed by pagination, rejoined with the
//! canonical separator.
//!
//! Two paths:
//! - `process_content`: one-shot, fixed-budget estimate. Synchronous, never fails.
//! - `paginate_measured`: the precise path over a `MeasureSurface`. Falls back to
//!   manual-separator splitting when the surface cannot be measured.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::content::emoji::{insert_emojis, EmojiConfig};
use crate::content::fixed_budget::{paginate_content, CharBudgets};
use crate::content::measured::{fit_pages, MeasureSurface};
use crate::content::rules::{apply_pagination_rules, join_slides, split_slides};
use crate::models::card::{AspectRatio, Layout};

/// Tuning constants shared by every processing call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentSettings {
    pub emoji: EmojiConfig,
    pub budgets: CharBudgets,
}

impl ContentSettings {
    pub fn from_config(config: &Config) -> Self {
        ContentSettings {
            emoji: EmojiConfig {
                paragraph_probability: config.emoji_paragraph_probability,
                ..EmojiConfig::default()
            },
            budgets: CharBudgets {
                portrait: config.char_budget_portrait,
                story: config.char_budget_story,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOptions {
    pub aspect_ratio: AspectRatio,
    pub add_emojis: bool,
    pub paginate: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            aspect_ratio: AspectRatio::default(),
            add_emojis: true,
            paginate: true,
        }
    }
}

/// Emoji step alone; returns the content untouched when disabled.
pub fn prepare_content<R: Rng + ?Sized>(
    content: &str,
    add_emojis: bool,
    settings: &ContentSettings,
    rng: &mut R,
) -> String {
    if add_emojis {
        insert_emojis(content, &settings.emoji, rng)
    } else {
        content.to_string()
    }
}

/// One-shot processing with the fixed-budget paginator.
pub fn process_content<R: Rng + ?Sized>(
    content: &str,
    options: &ProcessOptions,
    settings: &ContentSettings,
    rng: &mut R,
) -> String {
    let prepared = prepare_content(content, options.add_emojis, settings, rng);
    if !options.paginate {
        return prepared;
    }

    let pages = paginate_content(&prepared, options.aspect_ratio, &settings.budgets);
    debug!(
        pages = pages.len(),
        budget = settings.budgets.for_ratio(options.aspect_ratio),
        ratio = options.aspect_ratio.as_str(),
        "fixed-budget pagination"
    );
    join_slides(&pages)
}

/// Result of the measured path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredOutcome {
    pub slides: Vec<String>,
    /// Slides rejoined with the canonical separator.
    pub content: String,
    /// False when the run fell back to manual separators.
    pub auto_paginated: bool,
    pub probes: u32,
}

/// Measured pagination of already-prepared content.
///
/// Never fails: an unusable surface degrades to manual-separator splitting.
pub async fn paginate_measured<M>(
    prepared: &str,
    layout: Layout,
    surface: &M,
    budget_px: f32,
) -> MeasuredOutcome
where
    M: MeasureSurface + ?Sized,
{
    let lines: Vec<&str> = prepared.split('\n').collect();
    let units = apply_pagination_rules(&lines, layout);

    match fit_pages(&units, surface, budget_px).await {
        Ok(measured) => MeasuredOutcome {
            content: join_slides(&measured.pages),
            slides: measured.pages,
            auto_paginated: true,
            probes: measured.probes,
        },
        Err(err) => {
            warn!(error = %err, "auto-pagination disabled for this run; using manual separators");
            let slides = split_slides(prepared);
            MeasuredOutcome {
                content: join_slides(&slides),
                slides,
                auto_paginated: false,
                probes: 0,
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
