use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media_ref::MediaReference;

/// A single watched movie to append to the watch-history service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedItem {
    pub reference: MediaReference,
    pub watched_at: DateTime<Utc>,
}

impl WatchedItem {
    pub fn now(reference: MediaReference) -> Self {
        Self {
            reference,
            watched_at: Utc::now(),
        }
    }
}
