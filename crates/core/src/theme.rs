//! Light/dark theme preference.
//!
//! The preference lives in durable key-value storage under [`THEME_KEY`].
//! Storage is best-effort: a failed write is logged and otherwise ignored,
//! and an unreadable value falls back to [`ThemePreference::Light`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Storage key for the persisted theme.
pub const THEME_KEY: &str = "theme";

/// CSS class applied to the root element in dark mode.
pub const DARK_MODE_CLASS: &str = "dark-mode";

/// Error writing to a [`PreferenceStore`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("preference storage unavailable")]
    Unavailable,
    #[error("invalid preference value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Durable key-value storage for user preferences.
pub trait PreferenceStore {
    /// Read a value, `None` when unset or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `PreferenceError` if the value could not be stored.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// `HashMap`-backed store, used for tests and as a request-scoped buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The persisted theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// Stored string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Only `"dark"` selects dark mode.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    #[must_use]
    pub const fn from_is_dark(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub const fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// What the page shows for the current theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ThemeState {
    pub preference: ThemePreference,
    /// Whether [`DARK_MODE_CLASS`] is set on the root element.
    pub dark_class: bool,
    pub light_toggle_active: bool,
    pub dark_toggle_active: bool,
}

impl ThemeState {
    /// Visual state for a preference.
    #[must_use]
    pub const fn for_preference(preference: ThemePreference) -> Self {
        let is_dark = preference.is_dark();
        Self {
            preference,
            dark_class: is_dark,
            light_toggle_active: !is_dark,
            dark_toggle_active: is_dark,
        }
    }
}

/// Applies and persists the theme.
pub struct ThemeSwitcher;

impl ThemeSwitcher {
    /// Switch to dark (`true`) or light (`false`) mode and persist the choice.
    pub fn set_mode(store: &mut dyn PreferenceStore, is_dark: bool) -> ThemeState {
        let preference = ThemePreference::from_is_dark(is_dark);

        if let Err(e) = store.set(THEME_KEY, preference.as_str()) {
            tracing::warn!(error = %e, theme = preference.as_str(), "Failed to persist theme");
        }

        ThemeState::for_preference(preference)
    }

    /// Read the persisted theme (default light) and apply it.
    pub fn load(store: &mut dyn PreferenceStore) -> ThemeState {
        let stored = store.get(THEME_KEY);
        let preference = ThemePreference::from_stored(stored.as_deref());
        Self::set_mode(store, preference.is_dark())
    }
}
