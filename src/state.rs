use std::sync::Arc;
use tokio::sync::broadcast;

use crate::content_loader::PostStore;
use crate::mailer::Mailer;

pub type RefreshBroadcaster = broadcast::Sender<()>;

/// Per-process dependencies. Nothing in here changes after start-up.
pub struct AppState {
    pub posts: PostStore,
    pub mailer: Mailer,
    pub is_development: bool,
    /// Shown on the contact page with a copy button when set.
    pub contact_email: Option<String>,
}

#[derive(Clone)]
pub struct RouterState {
    pub app_state: Arc<AppState>,
    pub broadcaster: RefreshBroadcaster,
}

impl axum::extract::FromRef<RouterState> for Arc<AppState> {
    fn from_ref(state: &RouterState) -> Self {
        state.app_state.clone()
    }
}

impl axum::extract::FromRef<RouterState> for RefreshBroadcaster {
    fn from_ref(state: &RouterState) -> Self {
        state.broadcaster.clone()
    }
}
