//! Measured-layout pagination: binary search over line counts against real rendered
//! height.
//!
//! # Architecture
//! - `MeasureSurface` is the only rendering knowledge the paginator has: "how tall is
//!   this content under the style bound to the surface?"
//! - `fit_pages` splits units into manual-separator segments, then for each segment
//!   repeatedly binary-searches the largest prefix that fits the height budget.
//! - Probes are strictly sequential: each one depends on the previous result.
//!
//! A single unit that overflows on its own still becomes a page. Forward progress
//! beats strict budget compliance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::content::rules::split_segments;

#[derive(Debug, Error)]
pub enum MeasureError {
    /// The surface is not mounted or cannot be queried at all.
    #[error("measurement surface unavailable: {0}")]
    Unavailable(String),

    #[error("measurement probe failed: {0}")]
    Probe(String),
}

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("auto-pagination not possible: {0}")]
    MeasurementUnavailable(String),
}

impl From<MeasureError> for PaginationError {
    fn from(err: MeasureError) -> Self {
        PaginationError::MeasurementUnavailable(err.to_string())
    }
}

/// Rendered-height capability supplied by the caller.
///
/// Implementations are already bound to one style snapshot; the paginator only
/// passes candidate content.
#[async_trait]
pub trait MeasureSurface: Send + Sync {
    /// Resolves once fonts are ready. Awaited once per run, before the first probe.
    async fn ready(&self) -> Result<(), MeasureError>;

    /// Rendered height in px of `content`.
    async fn measure(&self, content: &str) -> Result<f32, MeasureError>;
}

/// Output of one measured run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredPages {
    pub pages: Vec<String>,
    /// Number of `measure` calls the run made.
    pub probes: u32,
}

/// Paginates rule-annotated units so each page's rendered height stays within
/// `budget_px`.
pub async fn fit_pages<M>(
    units: &[String],
    surface: &M,
    budget_px: f32,
) -> Result<MeasuredPages, PaginationError>
where
    M: MeasureSurface + ?Sized,
{
    surface.ready().await?;

    let mut pages = Vec::new();
    let mut probes = 0u32;

    for segment in split_segments(units) {
        let mut start = 0usize;
        while start < segment.len() {
            let (fit, used) = largest_fit(&segment[start..], surface, budget_px).await?;
            probes += used;

            let page = segment[start..start + fit].join("\n");
            let page = page.trim();
            if !page.is_empty() {
                pages.push(page.to_string());
            }
            start += fit;
        }
    }

    debug!(pages = pages.len(), probes, budget_px, "measured pagination finished");
    Ok(MeasuredPages { pages, probes })
}

/// Largest `n` in `1..=units.len()` whose first `n` units fit the budget, plus the
/// number of probes spent finding it. Returns 1 when nothing fits.
async fn largest_fit<M>(
    units: &[String],
    surface: &M,
    budget_px: f32,
) -> Result<(usize, u32), MeasureError>
where
    M: MeasureSurface + ?Sized,
{
    let mut lo = 1usize;
    let mut hi = units.len();
    let mut fit = 1usize;
    let mut probes = 0u32;

    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let height = surface.measure(&units[..mid].join("\n")).await?;
        probes += 1;

        if height <= budget_px {
            fit = mid;
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }

    Ok((fit, probes))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
