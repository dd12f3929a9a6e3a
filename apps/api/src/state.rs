use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::content::processor::ContentSettings;
use crate::content::session::SessionRegistry;
use crate::layout::MetricSurface;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Emoji probability and character budgets, derived from `config` once.
    pub settings: ContentSettings,
    /// The single measurement surface; every run and session probes it.
    pub surface: Arc<MetricSurface>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let settings = ContentSettings::from_config(&config);
        let surface = Arc::new(MetricSurface::new(Duration::from_millis(
            config.surface_frame_ms,
        )));
        let sessions = Arc::new(SessionRegistry::new(
            Arc::clone(&surface),
            settings,
            config.session_capacity,
        ));
        AppState {
            config,
            settings,
            surface,
            sessions,
        }
    }
}
