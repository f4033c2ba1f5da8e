use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::application::PreferenceStore;
use crate::domain::{DomainError, Preferences};

pub const PREFERENCES_FILE: &str = "preferences.json";

/// Preferences kept in a JSON file, re-read on every access.
///
/// A missing file means defaults. A file that cannot be read or parsed also
/// yields defaults, with a warning, so a damaged file never blocks a chat.
/// Writes go to a sibling temp file that is then renamed over the original.
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/preferences.json`
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Preferences {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No preferences at {}, using defaults", self.path.display());
                return Preferences::default();
            }
            Err(e) => {
                warn!(
                    "Failed to read preferences at {}: {}. Using defaults.",
                    self.path.display(),
                    e
                );
                return Preferences::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(
                "Ignoring malformed preferences at {}: {}",
                self.path.display(),
                e
            );
            Preferences::default()
        })
    }

    fn save(&self, preferences: &Preferences) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| DomainError::preference(format!("failed to serialize: {}", e)))?;

        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}
