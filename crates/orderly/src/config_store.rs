//! Persisted application settings.
//!
//! Settings live in a single YAML document. A missing document means
//! "all defaults"; a partial one is merged over the defaults key by key, so
//! older settings files keep working as new options are added.

use orderly_core::AppSettings;

use crate::platform::{Storage, StorageError, StorageKey, load_document, save_document};

pub struct ConfigStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ConfigStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Result<AppSettings, StorageError> {
        let settings: AppSettings = load_document(&self.storage, StorageKey::Settings)?;
        tracing::debug!(
            currency = settings.currency.code(),
            integrations = settings.integrations.len(),
            "Loaded settings"
        );
        Ok(settings)
    }

    pub fn save(&self, settings: &AppSettings) -> Result<(), StorageError> {
        save_document(&self.storage, StorageKey::Settings, settings)?;
        tracing::info!("Saved settings");
        Ok(())
    }

    /// Forget every customization and return the defaults
    pub fn reset(&self) -> Result<AppSettings, StorageError> {
        self.storage.remove(StorageKey::Settings)?;
        tracing::info!("Settings reset to defaults");
        Ok(AppSettings::default())
    }

    /// Load, change and save the settings in one step.
    /// Returns whatever `change` returns.
    pub fn update<R>(&self, change: impl FnOnce(&mut AppSettings) -> R) -> Result<R, StorageError> {
        let mut settings = self.load()?;
        let result = change(&mut settings);
        self.save(&settings)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use orderly_core::settings::{Currency, MessageCategory, StatusTone};

    #[test]
    fn test_missing_settings_load_as_defaults() {
        let store = ConfigStore::new(MemoryStorage::new());
        assert_eq!(store.load().unwrap(), AppSettings::default());
    }

    #[test]
    fn test_partial_yaml_merges_over_defaults() {
        let storage = MemoryStorage::new();
        storage
            .write(
                StorageKey::Settings,
                "business_name: Atlas Shop\ncolors:\n  warning: \"#ffcc00\"\n",
            )
            .unwrap();
        let settings = ConfigStore::new(&storage).load().unwrap();
        let defaults = AppSettings::default();

        assert_eq!(settings.business_name, "Atlas Shop");
        assert_eq!(settings.colors.get(StatusTone::Warning), "#ffcc00");
        assert_eq!(
            settings.colors.get(StatusTone::Danger),
            defaults.colors.get(StatusTone::Danger)
        );
        assert_eq!(settings.templates, defaults.templates);
        assert_eq!(settings.currency, defaults.currency);
    }

    #[test]
    fn test_update_persists_and_reset_restores_defaults() {
        let storage = MemoryStorage::new();
        let store = ConfigStore::new(&storage);

        let previous = store
            .update(|s| std::mem::replace(&mut s.currency, Currency::Usd))
            .unwrap();
        assert_eq!(previous, Currency::Mad);
        store
            .update(|s| {
                s.templates
                    .set(MessageCategory::Reminder, "Hi {client}, still there?")
            })
            .unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.currency, Currency::Usd);
        assert_eq!(
            reloaded.templates.get(MessageCategory::Reminder),
            "Hi {client}, still there?"
        );

        assert_eq!(store.reset().unwrap(), AppSettings::default());
        assert!(!storage.contains(StorageKey::Settings));
        assert_eq!(store.load().unwrap(), AppSettings::default());
    }

    #[test]
    fn test_corrupt_settings_are_a_parse_error() {
        let storage = MemoryStorage::new();
        storage
            .write(StorageKey::Settings, "currency: [not, a, currency]\n")
            .unwrap();
        assert!(matches!(
            ConfigStore::new(&storage).load(),
            Err(StorageError::Parse(_))
        ));
    }
}
