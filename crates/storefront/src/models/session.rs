//! Session-related types.
//!
//! Each browser session owns one [`PageController`]. Handlers load it, dispatch
//! a single event, and save it back before responding.

use tidepool_core::PageController;
use tower_sessions::Session;

/// Session keys for page state.
pub mod keys {
    /// Key for the serialized page controller (cart + theme state).
    pub const PAGE: &str = "page";
}

/// A page controller bound to the session it was loaded from.
pub struct PageSession {
    session: Session,
    pub controller: PageController,
}

impl PageSession {
    /// Load the session's controller, or a fresh one if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: Session) -> Result<Self, tower_sessions::session::Error> {
        let controller = session
            .get::<PageController>(keys::PAGE)
            .await?
            .unwrap_or_default();

        Ok(Self {
            session,
            controller,
        })
    }

    /// Start from a fresh controller, discarding any stored state.
    #[must_use]
    pub fn fresh(session: Session) -> Self {
        Self {
            session,
            controller: PageController::new(),
        }
    }

    /// Persist the controller back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn save(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::PAGE, &self.controller).await
    }
}
