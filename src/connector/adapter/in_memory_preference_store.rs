use std::sync::RwLock;

use crate::application::PreferenceStore;
use crate::domain::{DomainError, Preferences};

/// Preferences held only for the life of the process.
pub struct InMemoryPreferenceStore {
    preferences: RwLock<Preferences>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::with_preferences(Preferences::default())
    }

    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            preferences: RwLock::new(preferences),
        }
    }
}

impl Default for InMemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self) -> Preferences {
        match self.preferences.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<(), DomainError> {
        let mut guard = self
            .preferences
            .write()
            .map_err(|_| DomainError::preference("preference lock poisoned"))?;
        *guard = preferences.clone();
        Ok(())
    }
}
