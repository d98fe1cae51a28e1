use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// OAuth token material for the watch-history service.
///
/// Field names and units follow the provider's token response, so the
/// persisted file is the response body as received: `created_at` is a unix
/// timestamp in seconds and `expires_in` is a lifetime in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub created_at: i64,
    pub expires_in: u64,
}

impl Credential {
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.created_at, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// `None` when `created_at + expires_in` is not a representable instant.
    pub fn checked_expires_at(&self) -> Option<DateTime<Utc>> {
        let issued_at = Utc.timestamp_opt(self.created_at, 0).single()?;
        let lifetime = Duration::try_seconds(i64::try_from(self.expires_in).ok()?)?;
        issued_at.checked_add_signed(lifetime)
    }

    /// Saturates at the latest representable instant; loaders reject such
    /// credentials through [`Credential::checked_expires_at`].
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.checked_expires_at().unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Valid means the expiry lies strictly more than `margin` after `now`.
    /// An unrepresentable expiry is never valid.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        match (self.checked_expires_at(), now.checked_add_signed(margin)) {
            (Some(expires_at), Some(deadline)) => expires_at > deadline,
            _ => false,
        }
    }
}
