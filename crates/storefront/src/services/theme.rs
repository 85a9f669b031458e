//! Theme preference.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, Timelike};
use tracing::{instrument, warn};

use crate::storage::{KeyValueStore, StorageError, keys};

/// First hour (inclusive) at which `auto` turns dark.
const DARK_FROM_HOUR: u32 = 19;
/// Hour at which `auto` turns light again.
const LIGHT_FROM_HOUR: u32 = 6;

/// The shopper's theme choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the time of day.
    #[default]
    Auto,
}

impl ThemeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    /// Whether this mode renders dark at `hour` (0-23, local time).
    #[must_use]
    pub const fn is_dark_at(self, hour: u32) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::Auto => hour >= DARK_FROM_HOUR || hour < LIGHT_FROM_HOUR,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" => Ok(Self::Auto),
            other => Err(format!("invalid theme mode: {other}")),
        }
    }
}

/// Reads and writes the persisted theme.
pub struct ThemeService<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ThemeService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// The stored mode, `auto` when unset or unreadable.
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        match self.store.get(keys::THEME_MODE) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "Ignoring stored theme");
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                warn!(error = %e, "Error reading theme");
                ThemeMode::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    #[instrument(skip(self))]
    pub fn set_mode(&self, mode: ThemeMode) -> Result<(), StorageError> {
        self.store.set(keys::THEME_MODE, mode.as_str())
    }

    /// Whether the stored mode renders dark right now.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.mode().is_dark_at(Local::now().hour())
    }

    /// Switch to `light` if currently dark, otherwise to `dark`. An `auto`
    /// mode is resolved against the current hour first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn toggle(&self) -> Result<ThemeMode, StorageError> {
        self.toggle_at(Local::now().hour())
    }

    fn toggle_at(&self, hour: u32) -> Result<ThemeMode, StorageError> {
        let next = if self.mode().is_dark_at(hour) {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };
        self.set_mode(next)?;
        Ok(next)
    }
}
