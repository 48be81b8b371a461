use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::PersistError;
use crate::kv::KeyValueStore;
use crate::models::{AppSettings, Task};

pub const TODOS_KEY: &str = "todos";
pub const SETTINGS_KEY: &str = "app-settings";

// Persistence gateway.
//     Loads never fail: absent or malformed values fall back to defaults.
//     Saves never fail either: errors are logged and the caller moves on.
#[derive(Clone)]
pub struct Persistence {
    kv: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn load_tasks(&self) -> Vec<Task> {
        self.load_or_default(TODOS_KEY)
    }

    pub fn save_tasks(&self, tasks: &[Task]) {
        if let Err(e) = self.write(TODOS_KEY, tasks) {
            tracing::error!(error = %e, count = tasks.len(), "failed to save todos");
        }
    }

    pub fn load_settings(&self) -> AppSettings {
        self.load_or_default(SETTINGS_KEY)
    }

    pub fn save_settings(&self, settings: &AppSettings) {
        if let Err(e) = self.write(SETTINGS_KEY, settings) {
            tracing::error!(error = %e, "failed to save app settings");
        }
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.read(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!(key, "no stored value, using defaults");
                T::default()
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value unreadable, using defaults");
                T::default()
            }
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistError> {
        let Some(text) = self.kv.get(key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistError> {
        let text = serde_json::to_string(value)?;
        self.kv.set(key, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use crate::models::ThemeMode;
    use pretty_assertions::assert_eq;

    fn gateway() -> (Arc<MemoryKvStore>, Persistence) {
        let kv = Arc::new(MemoryKvStore::new());
        (kv.clone(), Persistence::new(kv))
    }

    #[test]
    fn missing_keys_load_defaults() {
        let (_, p) = gateway();
        assert!(p.load_tasks().is_empty());
        assert_eq!(p.load_settings(), AppSettings::default());
    }

    #[test]
    fn malformed_values_load_defaults() {
        let (kv, p) = gateway();
        kv.set(TODOS_KEY, "{not json").unwrap();
        kv.set(SETTINGS_KEY, "[1, 2, 3]").unwrap();
        assert!(p.load_tasks().is_empty());
        assert_eq!(p.load_settings(), AppSettings::default());
    }

    #[test]
    fn settings_round_trip() {
        let (_, p) = gateway();
        let mut settings = AppSettings::default();
        settings.theme.mode = ThemeMode::Dark;
        settings.appearance.font_size = 20;
        p.save_settings(&settings);
        assert_eq!(p.load_settings(), settings);
    }

    #[test]
    fn empty_collection_round_trip() {
        let (kv, p) = gateway();
        p.save_tasks(&p.load_tasks());
        assert_eq!(kv.get(TODOS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(p.load_tasks().is_empty());
    }
}
