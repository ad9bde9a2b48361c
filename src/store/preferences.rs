use super::SharedStore;
use crate::error::Result;

/// User preferences persisted in the key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    AudioLanguage,
    SubtitleLanguage,
    SubtitleSize,
    SubtitleStyle,
    PreviewVideo,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 5] = [
        PreferenceKey::AudioLanguage,
        PreferenceKey::SubtitleLanguage,
        PreferenceKey::SubtitleSize,
        PreferenceKey::SubtitleStyle,
        PreferenceKey::PreviewVideo,
    ];

    pub fn storage_key(self) -> &'static str {
        match self {
            PreferenceKey::AudioLanguage => "language",
            PreferenceKey::SubtitleLanguage => "subtitleLanguage",
            PreferenceKey::SubtitleSize => "subtitleSize",
            PreferenceKey::SubtitleStyle => "subtitleStyle",
            PreferenceKey::PreviewVideo => "previewVideo",
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            PreferenceKey::AudioLanguage => "deu",
            PreferenceKey::SubtitleLanguage => "none",
            PreferenceKey::SubtitleSize => "medium",
            PreferenceKey::SubtitleStyle => "green",
            PreferenceKey::PreviewVideo => "on",
        }
    }
}

/// Typed access to preference values; values are stored JSON-encoded
#[derive(Clone)]
pub struct Preferences {
    store: SharedStore,
}

impl Preferences {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Stored value, or the default when unset or unreadable
    pub fn get(&self, key: PreferenceKey) -> String {
        self.store
            .get(key.storage_key())
            .and_then(|raw| match serde_json::from_str::<String>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("ignoring unreadable preference {}: {e}", key.storage_key());
                    None
                }
            })
            .unwrap_or_else(|| key.default_value().to_string())
    }

    pub fn set(&self, key: PreferenceKey, value: &str) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.store.set(key.storage_key(), &encoded)
    }

    pub fn audio_language(&self) -> String {
        self.get(PreferenceKey::AudioLanguage)
    }

    pub fn subtitle_language(&self) -> String {
        self.get(PreferenceKey::SubtitleLanguage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};

    #[test]
    fn test_defaults_when_unset() {
        let prefs = Preferences::new(MemoryStore::shared());
        assert_eq!(prefs.audio_language(), "deu");
        assert_eq!(prefs.subtitle_language(), "none");
        assert_eq!(prefs.get(PreferenceKey::SubtitleSize), "medium");
        assert_eq!(prefs.get(PreferenceKey::SubtitleStyle), "green");
        assert_eq!(prefs.get(PreferenceKey::PreviewVideo), "on");
    }

    #[test]
    fn test_set_stores_json_string() {
        let store = MemoryStore::shared();
        let prefs = Preferences::new(store.clone());
        prefs.set(PreferenceKey::AudioLanguage, "eng").unwrap();
        assert_eq!(store.get("language").as_deref(), Some("\"eng\""));
        assert_eq!(prefs.audio_language(), "eng");
    }

    #[test]
    fn test_unreadable_value_falls_back() {
        let store = MemoryStore::shared();
        store.set("subtitleLanguage", "eng").unwrap();
        let prefs = Preferences::new(store);
        assert_eq!(prefs.subtitle_language(), "none");
    }
}
