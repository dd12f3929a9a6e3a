//! MetricSurface: the service's own off-screen measurement target.
//!
//! # Protocol
//! - One shared slot. A probe locks it, commits content + style, waits one frame,
//!   then lays the committed content out on a blocking thread and reads the height.
//!   The lock is held for the whole probe, so concurrent runs never interleave
//!   content mid-probe.
//! - Font readiness resolves once per surface lifetime; runs await it before their
//!   first probe.
//! - An unmounted surface refuses every request with `MeasureError::Unavailable`.
//!
//! Callers never probe `MetricSurface` directly: `bind` captures a style snapshot
//! and title block, and the returned `BoundSurface` implements `MeasureSurface`.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use crate::content::measured::{MeasureError, MeasureSurface};
use crate::layout::canvas::{content_area, layout_height, CardFrame, ContentArea};
use crate::layout::typography::get_metrics;
use crate::models::card::{FontId, StyleSnapshot};

#[derive(Default)]
struct SurfaceSlot {
    content: String,
    style: Option<Arc<StyleSnapshot>>,
    area: Option<ContentArea>,
    commits: u64,
}

pub struct MetricSurface {
    slot: Mutex<SurfaceSlot>,
    fonts: OnceCell<()>,
    mounted: AtomicBool,
    /// Zero means a plain scheduler yield per frame.
    frame_delay: Duration,
    font_loads: AtomicU32,
}

impl MetricSurface {
    /// A mounted surface.
    pub fn new(frame_delay: Duration) -> Self {
        MetricSurface {
            slot: Mutex::new(SurfaceSlot::default()),
            fonts: OnceCell::new(),
            mounted: AtomicBool::new(true),
            frame_delay,
            font_loads: AtomicU32::new(0),
        }
    }

    // Mount state is driven by embedders and tests; the HTTP service keeps it mounted.
    #[allow(dead_code)]
    pub fn mount(&self) {
        self.mounted.store(true, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Total probes committed to the slot since the surface was created.
    #[allow(dead_code)]
    pub async fn commits(&self) -> u64 {
        self.slot.lock().await.commits
    }

    /// Binds a style snapshot and title block for one computation run.
    pub fn bind(self: &Arc<Self>, style: StyleSnapshot, frame: &CardFrame<'_>) -> BoundSurface {
        let area = content_area(&style, frame);
        BoundSurface {
            surface: Arc::clone(self),
            style: Arc::new(style),
            area,
        }
    }

    fn ensure_mounted(&self) -> Result<(), MeasureError> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(MeasureError::Unavailable("surface not mounted".to_string()))
        }
    }

    async fn fonts_ready(&self) {
        self.fonts
            .get_or_init(|| async {
                let faces = [
                    FontId::SansSc,
                    FontId::SerifSc,
                    FontId::Handwriting,
                    FontId::Artistic,
                    FontId::Poster,
                    FontId::Happy,
                    FontId::Calligraphy,
                ];
                for face in &faces {
                    let metrics = get_metrics(face);
                    debug!(font = ?metrics.font, wide_em = metrics.wide_advance_em, "font metrics loaded");
                }
                self.font_loads.fetch_add(1, Ordering::SeqCst);
                info!(faces = faces.len(), "card font metrics ready");
            })
            .await;
    }

    async fn next_frame(&self) {
        if self.frame_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.frame_delay).await;
        }
    }

    async fn probe(
        &self,
        content: &str,
        style: &Arc<StyleSnapshot>,
        area: ContentArea,
    ) -> Result<f32, MeasureError> {
        self.ensure_mounted()?;
        let mut slot = self.slot.lock().await;

        slot.content.clear();
        slot.content.push_str(content);
        slot.style = Some(Arc::clone(style));
        slot.area = Some(area);
        slot.commits += 1;

        self.next_frame().await;
        // Unmounted while the frame was pending.
        self.ensure_mounted()?;

        let committed = slot.content.clone();
        let style = slot
            .style
            .clone()
            .ok_or_else(|| MeasureError::Probe("slot has no committed style".to_string()))?;
        let area = slot
            .area
            .ok_or_else(|| MeasureError::Probe("slot has no committed area".to_string()))?;

        let height = tokio::task::spawn_blocking(move || layout_height(&committed, &style, &area))
            .await
            .map_err(|e| MeasureError::Probe(format!("layout task failed: {e}")))?;

        debug!(height, commit = slot.commits, "surface probe");
        Ok(height)
    }
}

/// `MetricSurface` bound to one style snapshot and title block.
#[derive(Clone)]
pub struct BoundSurface {
    surface: Arc<MetricSurface>,
    style: Arc<StyleSnapshot>,
    area: ContentArea,
}

impl BoundSurface {
    /// Pixel height available for body content on one slide.
    pub fn budget_px(&self) -> f32 {
        self.area.height_px
    }

    pub fn content_area(&self) -> ContentArea {
        self.area
    }
}

#[async_trait]
impl MeasureSurface for BoundSurface {
    async fn ready(&self) -> Result<(), MeasureError> {
        self.surface.ensure_mounted()?;
        self.surface.fonts_ready().await;
        Ok(())
    }

    async fn measure(&self, content: &str) -> Result<f32, MeasureError> {
        self.surface.probe(content, &self.style, self.area).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::Layout;

    fn surface() -> Arc<MetricSurface> {
        Arc::new(MetricSurface::new(Duration::ZERO))
    }

    fn frame() -> CardFrame<'static> {
        CardFrame {
            title: "标题",
            subtitle: "",
        }
    }

    // ── readiness ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_fonts_load_once() {
        let s = surface();
        let bound = s.bind(StyleSnapshot::default(), &frame());
        bound.ready().await.unwrap();
        bound.ready().await.unwrap();
        s.bind(StyleSnapshot::default(), &frame()).ready().await.unwrap();
        assert_eq!(s.font_loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unmounted_surface_is_unavailable() {
        let s = surface();
        s.unmount();
        let bound = s.bind(StyleSnapshot::default(), &frame());
        assert!(matches!(bound.ready().await, Err(MeasureError::Unavailable(_))));
        assert!(matches!(
            bound.measure("x").await,
            Err(MeasureError::Unavailable(_))
        ));
        s.mount();
        assert!(bound.measure("x").await.is_ok());
    }

    // ── probes ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_probe_matches_layout_height() {
        let s = surface();
        let style = StyleSnapshot {
            layout: Layout::Grid,
            ..StyleSnapshot::default()
        };
        let bound = s.bind(style.clone(), &frame());
        let text = "一. 早起\n每天六点起床\n\n二. 运动";
        let measured = bound.measure(text).await.unwrap();
        assert_eq!(measured, layout_height(text, &style, &bound.content_area()));
        assert_eq!(s.commits().await, 1);
    }

    #[tokio::test]
    async fn test_budget_matches_content_area() {
        let s = surface();
        let style = StyleSnapshot::default();
        let bound = s.bind(style.clone(), &frame());
        assert_eq!(bound.budget_px(), content_area(&style, &frame()).height_px);
        assert!(bound.budget_px() > 0.0);
    }

    #[tokio::test]
    async fn test_concurrent_runs_do_not_interleave() {
        let s = Arc::new(MetricSurface::new(Duration::from_millis(2)));
        let portrait = s.bind(StyleSnapshot::default(), &frame());
        let minimalist_style = StyleSnapshot {
            layout: Layout::Minimalist,
            ..StyleSnapshot::default()
        };
        let minimalist = s.bind(minimalist_style.clone(), &frame());

        let short = "短";
        let long = "长长长长长长长长长长长长\n第二行\n第三行";
        let (a, b) = tokio::join!(portrait.measure(short), minimalist.measure(long));

        assert_eq!(
            a.unwrap(),
            layout_height(short, &StyleSnapshot::default(), &portrait.content_area())
        );
        assert_eq!(
            b.unwrap(),
            layout_height(long, &minimalist_style, &minimalist.content_area())
        );
        assert_eq!(s.commits().await, 2);
    }
}
