use reelfetch_config::UserTable;
use reelfetch_core::{LookupRecorder, LookupService, RecordOptions};
use std::sync::Arc;

use crate::session::{Authenticator, OpenAccess, SessionStore};

/// Shared application context
#[derive(Clone)]
pub struct AppState {
    pub lookup: LookupService,
    pub recorder: LookupRecorder,
    /// Side effects run after every successful lookup
    pub record_options: RecordOptions,
    pub users: Arc<UserTable>,
    pub sessions: Arc<SessionStore>,
    pub auth: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(
        lookup: LookupService,
        recorder: LookupRecorder,
        record_options: RecordOptions,
        users: UserTable,
        sessions: SessionStore,
        auth_enabled: bool,
    ) -> Self {
        let sessions = Arc::new(sessions);
        let auth: Arc<dyn Authenticator> = if auth_enabled {
            sessions.clone()
        } else {
            Arc::new(OpenAccess)
        };

        Self {
            lookup,
            recorder,
            record_options,
            users: Arc::new(users),
            sessions,
            auth,
        }
    }
}
