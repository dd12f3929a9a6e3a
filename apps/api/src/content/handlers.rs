use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::emoji::{insert_emojis_detailed, EmojiInsertion};
use crate::content::processor::{
    paginate_measured, prepare_content, process_content, ProcessOptions,
};
use crate::content::rules::split_slides;
use crate::content::session::{PaginationSession, RecomputeOutcome, SlideSet};
use crate::errors::AppError;
use crate::layout::canvas::{CardFrame, ContentArea};
use crate::models::card::{AspectRatio, CardDraft, StyleSnapshot};
use crate::state::AppState;

fn default_true() -> bool {
    true
}

fn require_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// One-shot content endpoints
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub content: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default = "default_true")]
    pub add_emojis: bool,
    #[serde(default = "default_true")]
    pub paginate: bool,
}

#[derive(Serialize)]
pub struct ProcessResponse {
    pub content: String,
    pub slides: Vec<String>,
}

/// POST /api/v1/content/process
pub async fn handle_process(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, AppError> {
    require_content(&req.content)?;
    let options = ProcessOptions {
        aspect_ratio: req.aspect_ratio,
        add_emojis: req.add_emojis,
        paginate: req.paginate,
    };
    let content = process_content(&req.content, &options, &state.settings, &mut rand::rng());
    let slides = split_slides(&content);
    Ok(Json(ProcessResponse { content, slides }))
}

#[derive(Deserialize)]
pub struct EmojiRequest {
    pub content: String,
}

/// POST /api/v1/content/emoji
pub async fn handle_emoji(
    State(state): State<AppState>,
    Json(req): Json<EmojiRequest>,
) -> Result<Json<EmojiInsertion>, AppError> {
    require_content(&req.content)?;
    let insertion = insert_emojis_detailed(&req.content, &state.settings.emoji, &mut rand::rng());
    Ok(Json(insertion))
}

#[derive(Deserialize)]
pub struct PaginateRequest {
    pub content: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub style: StyleSnapshot,
    #[serde(default)]
    pub add_emojis: bool,
}

#[derive(Serialize)]
pub struct PaginateResponse {
    pub content: String,
    pub slides: Vec<String>,
    pub auto_paginated: bool,
    pub probes: u32,
    pub budget_px: f32,
    pub content_area: ContentArea,
}

/// POST /api/v1/content/paginate
pub async fn handle_paginate(
    State(state): State<AppState>,
    Json(req): Json<PaginateRequest>,
) -> Result<Json<PaginateResponse>, AppError> {
    require_content(&req.content)?;
    let prepared = {
        let mut rng = rand::rng();
        prepare_content(&req.content, req.add_emojis, &state.settings, &mut rng)
    };

    let layout = req.style.layout;
    let frame = CardFrame {
        title: &req.title,
        subtitle: &req.subtitle,
    };
    let bound = state.surface.bind(req.style.clone(), &frame);
    let budget_px = bound.budget_px();
    let outcome = paginate_measured(&prepared, layout, &bound, budget_px).await;

    Ok(Json(PaginateResponse {
        content: outcome.content,
        slides: outcome.slides,
        auto_paginated: outcome.auto_paginated,
        probes: outcome.probes,
        budget_px,
        content_area: bound.content_area(),
    }))
}

#[derive(Deserialize)]
pub struct SlidesRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct SlidesResponse {
    pub count: usize,
    pub slides: Vec<String>,
}

/// POST /api/v1/content/slides
pub async fn handle_split_slides(
    Json(req): Json<SlidesRequest>,
) -> Result<Json<SlidesResponse>, AppError> {
    require_content(&req.content)?;
    let slides = split_slides(&req.content);
    Ok(Json(SlidesResponse {
        count: slides.len(),
        slides,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionCreatedResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct SlideResponse {
    pub generation: u64,
    pub index: usize,
    pub total: usize,
    pub content: String,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<PaginationSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))
}

async fn latest_slides(session: &PaginationSession) -> Result<SlideSet, AppError> {
    session
        .latest()
        .await
        .ok_or_else(|| AppError::NotFound(format!("session {} has no slides yet", session.id)))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// PUT /api/v1/sessions/:id/draft
pub async fn handle_submit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CardDraft>,
) -> Result<Json<RecomputeOutcome>, AppError> {
    require_content(&draft.content)?;
    let session = find_session(&state, id).await?;
    Ok(Json(session.recompute(&draft).await))
}

/// GET /api/v1/sessions/:id/slides
pub async fn handle_get_slides(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SlideSet>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(latest_slides(&session).await?))
}

/// GET /api/v1/sessions/:id/slides/:index
pub async fn handle_get_slide(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<SlideResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let slide_set = latest_slides(&session).await?;
    let total = slide_set.slides.len();
    let content = slide_set
        .slides
        .into_iter()
        .nth(index)
        .ok_or_else(|| AppError::NotFound(format!("slide {index} out of range (total {total})")))?;

    Ok(Json(SlideResponse {
        generation: slide_set.generation,
        index,
        total,
        content,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("session {id} not found")))
    }
}
