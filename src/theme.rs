// Dark-mode preference, persisted independently of tasks

use crate::storage::Storage;
use tracing::{error, warn};

/// Storage key holding the dark-mode flag
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemePreference {
    dark: bool,
}

impl ThemePreference {
    /// Read the flag; missing or unparsable values fall back to light mode
    pub fn load(storage: &dyn Storage) -> Self {
        let dark = match storage.read(DARK_MODE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!(error = ?e, value = %raw, "Ignoring unparsable dark mode flag");
                false
            }),
            Ok(None) => false,
            Err(e) => {
                warn!(error = ?e, "Failed to read dark mode flag");
                false
            }
        };
        Self { dark }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Flip the flag and persist it, returning the new value
    pub fn toggle(&mut self, storage: &mut dyn Storage) -> bool {
        self.dark = !self.dark;
        if let Err(e) = storage.write(DARK_MODE_KEY, if self.dark { "true" } else { "false" }) {
            error!(error = ?e, dark = self.dark, "Failed to persist dark mode flag");
        }
        self.dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::{TASKS_KEY, TaskStore};

    #[test]
    fn test_default_is_light() {
        let storage = MemoryStorage::new();
        assert!(!ThemePreference::load(&storage).is_dark());
    }

    #[test]
    fn test_unparsable_falls_back_to_light() {
        let mut storage = MemoryStorage::new();
        storage.insert(DARK_MODE_KEY, "maybe");
        assert!(!ThemePreference::load(&storage).is_dark());
    }

    #[test]
    fn test_toggle_persists() {
        let mut storage = MemoryStorage::new();
        let mut theme = ThemePreference::load(&storage);

        assert!(theme.toggle(&mut storage));
        assert_eq!(storage.get(DARK_MODE_KEY), Some("true"));
        assert!(ThemePreference::load(&storage).is_dark());

        assert!(!theme.toggle(&mut storage));
        assert_eq!(storage.get(DARK_MODE_KEY), Some("false"));
    }

    #[test]
    fn test_toggle_survives_write_failure() {
        let mut storage = MemoryStorage::new();
        storage.fail_writes(true);
        let mut theme = ThemePreference::default();

        assert!(theme.toggle(&mut storage));
        assert!(theme.is_dark());
        assert!(storage.get(DARK_MODE_KEY).is_none());
    }

    #[test]
    fn test_independent_of_tasks() {
        let mut store = TaskStore::open(MemoryStorage::new());
        store.add_task("keep me");

        let mut theme = ThemePreference::load(store.storage());
        theme.toggle(store.storage_mut());

        assert!(store.storage().get(TASKS_KEY).unwrap().contains("keep me"));
        assert!(ThemePreference::load(store.storage()).is_dark());

        store.add_task("another");
        assert!(ThemePreference::load(store.storage()).is_dark());
    }
}
