//! Generation-tagged recomputation of a card's slides.
//!
//! Every draft submission starts a new run with a fresh generation id. Runs are not
//! cancelled; a run that finishes after a newer one has started simply does not
//! commit. The committed `SlideSet` is therefore always the output of the newest
//! run to finish among those still current at completion.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::content::processor::{paginate_measured, prepare_content, ContentSettings};
use crate::content::rules::{join_slides, split_slides};
use crate::layout::canvas::CardFrame;
use crate::layout::surface::MetricSurface;
use crate::models::card::CardDraft;

/// Committed output of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSet {
    pub generation: u64,
    pub slides: Vec<String>,
    /// Processed content: slides joined with the canonical separator.
    pub content: String,
    pub auto_paginated: bool,
    pub probes: u32,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecomputeOutcome {
    Committed { slide_set: SlideSet },
    /// A newer run started before this one finished; its result was dropped.
    Superseded { generation: u64, current: u64 },
}

pub struct PaginationSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    generation: AtomicU64,
    latest: RwLock<Option<SlideSet>>,
    surface: Arc<MetricSurface>,
    settings: ContentSettings,
    /// Registry tick of the last lookup; the lowest is evicted first.
    last_used: AtomicU64,
}

impl PaginationSession {
    pub fn new(surface: Arc<MetricSurface>, settings: ContentSettings) -> Self {
        PaginationSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            generation: AtomicU64::new(0),
            latest: RwLock::new(None),
            surface,
            settings,
            last_used: AtomicU64::new(0),
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Starts a new run, superseding every run in flight.
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Recomputes slides for `draft` under a new generation.
    pub async fn recompute(&self, draft: &CardDraft) -> RecomputeOutcome {
        let generation = self.next_generation();
        let style = draft.style.clone();
        let layout = style.layout;

        let prepared = {
            let mut rng = rand::rng();
            prepare_content(&draft.content, draft.auto_emoji, &self.settings, &mut rng)
        };

        let slide_set = if draft.auto_paginate {
            let frame = CardFrame {
                title: &draft.title,
                subtitle: &draft.subtitle,
            };
            let bound = self.surface.bind(style, &frame);
            let outcome = paginate_measured(&prepared, layout, &bound, bound.budget_px()).await;
            SlideSet {
                generation,
                slides: outcome.slides,
                content: outcome.content,
                auto_paginated: outcome.auto_paginated,
                probes: outcome.probes,
                computed_at: Utc::now(),
            }
        } else {
            let slides = split_slides(&prepared);
            SlideSet {
                generation,
                content: join_slides(&slides),
                slides,
                auto_paginated: false,
                probes: 0,
                computed_at: Utc::now(),
            }
        };

        self.commit(slide_set).await
    }

    /// Stores `slide_set` if its generation is still the newest one started.
    async fn commit(&self, slide_set: SlideSet) -> RecomputeOutcome {
        let mut latest = self.latest.write().await;
        let current = self.current_generation();
        if slide_set.generation != current {
            debug!(
                session = %self.id,
                generation = slide_set.generation,
                current,
                "discarding superseded slide set"
            );
            return RecomputeOutcome::Superseded {
                generation: slide_set.generation,
                current,
            };
        }

        info!(
            session = %self.id,
            generation = slide_set.generation,
            slides = slide_set.slides.len(),
            probes = slide_set.probes,
            auto_paginated = slide_set.auto_paginated,
            "slide set committed"
        );
        *latest = Some(slide_set.clone());
        RecomputeOutcome::Committed { slide_set }
    }

    pub async fn latest(&self) -> Option<SlideSet> {
        self.latest.read().await.clone()
    }
}

/// Live sessions keyed by id. All share one surface and one set of tuning constants.
///
/// At most `capacity` sessions are kept. Creating one more evicts the session
/// that was least recently created or looked up.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<PaginationSession>>>,
    surface: Arc<MetricSurface>,
    settings: ContentSettings,
    capacity: usize,
    clock: AtomicU64,
}

impl SessionRegistry {
    pub fn new(surface: Arc<MetricSurface>, settings: ContentSettings, capacity: usize) -> Self {
        SessionRegistry {
            sessions: RwLock::new(HashMap::new()),
            surface,
            settings,
            capacity: capacity.max(1),
            clock: AtomicU64::new(0),
        }
    }

    fn touch(&self, session: &PaginationSession) {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        session.last_used.store(tick, Ordering::SeqCst);
    }

    pub async fn create(&self) -> Arc<PaginationSession> {
        let session = Arc::new(PaginationSession::new(
            Arc::clone(&self.surface),
            self.settings,
        ));
        self.touch(&session);

        let mut sessions = self.sessions.write().await;
        while sessions.len() >= self.capacity {
            let Some(stale) = sessions
                .values()
                .min_by_key(|s| s.last_used.load(Ordering::SeqCst))
                .map(|s| s.id)
            else {
                break;
            };
            sessions.remove(&stale);
            info!(session = %stale, capacity = self.capacity, "evicted idle pagination session");
        }
        sessions.insert(session.id, Arc::clone(&session));
        debug!(session = %session.id, live = sessions.len(), "pagination session created");
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<PaginationSession>> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        self.touch(&session);
        Some(session)
    }

    /// Returns false when no session had that id.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
