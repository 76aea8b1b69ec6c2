//! Session middleware configuration.
//!
//! Sessions hold the page controller (cart and theme state) and live in
//! process memory: they are lost on restart, the same as the cart itself.
//! The moka-backed store drops each record once its expiry passes and caps
//! the number of live sessions.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tidepool_session";

/// Session expiry time in seconds (1 day of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Most sessions held at once; least recently used are evicted past this.
pub const MAX_SESSIONS: u64 = 100_000;

/// In-memory session store with per-record expiry.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer over [`create_session_store`].
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{self, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record(ttl: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + ttl,
        }
    }

    #[tokio::test]
    async fn test_store_drops_expired_sessions() {
        let store = create_session_store();
        let short = record(time::Duration::milliseconds(100));
        let long = record(time::Duration::hours(1));
        store.save(&short).await.unwrap();
        store.save(&long).await.unwrap();

        assert!(store.load(&short.id).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(store.load(&short.id).await.unwrap().is_none());
        assert!(store.load(&long.id).await.unwrap().is_some());
    }
}
