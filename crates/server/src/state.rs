//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use mymedi_core::LatestSlots;
use uuid::Uuid;

use crate::ai::TextGenerator;
use crate::config::Config;
use crate::routes::assessments::SessionSnapshot;

/// Latest accepted assessment per client session
pub type SessionSlots = LatestSlots<Uuid, SessionSnapshot>;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream generator; `None` when no API key is configured
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub sessions: Arc<SessionSlots>,
}

impl AppState {
    pub fn new(config: &Config, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let sessions = SessionSlots::with_limits(
            Duration::from_secs(config.session_ttl_secs),
            config.session_capacity,
        );
        Self {
            generator,
            sessions: Arc::new(sessions),
        }
    }
}
