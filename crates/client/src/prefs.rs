//! Persisted view preferences: list filters and the theme flag.

use crate::storage::{KeyValueStore, THEME_KEY};
use folio_core::ListFilters;
use std::sync::Arc;
use tracing::{debug, warn};

/// Filter state of one list view, mirrored to durable storage.
///
/// Restoring always starts at page 1; malformed stored JSON falls back to
/// the defaults.
pub struct FilterStore<F: ListFilters> {
    storage: Arc<dyn KeyValueStore>,
    filters: F,
}

impl<F: ListFilters> FilterStore<F> {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut filters = match storage.get(F::STORAGE_KEY) {
            Some(raw) => serde_json::from_str::<F>(&raw).unwrap_or_else(|e| {
                warn!(key = F::STORAGE_KEY, error = %e, "ignoring malformed stored filters");
                F::default()
            }),
            None => F::default(),
        };
        filters.set_page(1);
        debug!(key = F::STORAGE_KEY, "filters restored");
        Self { storage, filters }
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    fn persist(&self) {
        match serde_json::to_string(&self.filters) {
            Ok(json) => self.storage.set(F::STORAGE_KEY, &json),
            Err(e) => warn!(key = F::STORAGE_KEY, error = %e, "failed to serialize filters"),
        }
    }

    /// Change the filters and persist them.
    pub fn update(&mut self, change: impl FnOnce(&mut F)) -> &F {
        change(&mut self.filters);
        self.persist();
        &self.filters
    }

    pub fn set_page(&mut self, page: u32) -> &F {
        self.update(|f| f.set_page(page))
    }

    /// Back to defaults, persisted.
    pub fn reset(&mut self) -> &F {
        self.update(|f| *f = F::default())
    }

    /// Back to defaults and forget the stored value.
    pub fn clear(&mut self) {
        self.filters = F::default();
        self.storage.remove(F::STORAGE_KEY);
    }
}

/// Dark/light theme flag stored as `"true"`/`"false"`.
pub struct ThemePreference {
    storage: Arc<dyn KeyValueStore>,
}

impl ThemePreference {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Anything other than `"true"` reads as light.
    pub fn is_dark(&self) -> bool {
        self.storage.get(THEME_KEY).as_deref() == Some("true")
    }

    pub fn set_dark(&self, dark: bool) {
        self.storage
            .set(THEME_KEY, if dark { "true" } else { "false" });
    }

    /// Flip the theme and return the new value.
    pub fn toggle(&self) -> bool {
        let dark = !self.is_dark();
        self.set_dark(dark);
        dark
    }
}
