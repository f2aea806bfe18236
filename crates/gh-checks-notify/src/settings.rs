//! Persisted boolean settings
//!
//! The pipeline stores a single flag: whether check-failure notifications
//! are enabled at all. Storage goes through the `SettingsStore` trait so
//! hosts can supply their own backend; `TomlSettings` is the file-backed
//! default, a TOML table in the home directory.

use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Mutex;

/// Settings key for the global notifications toggle
pub const NOTIFICATIONS_ENABLED_KEY: &str = "notifications-enabled";

const SETTINGS_FILE: &str = ".gh-checks-notify.toml";

/// Persisted boolean storage
///
/// Absent keys fall back to the provided default. Writes are expected to
/// persist synchronously; a failed write is logged, never surfaced.
pub trait SettingsStore: Send + Sync {
    /// Read a boolean, falling back to `default` when the key is absent
    fn get_boolean(&self, key: &str, default: bool) -> bool;

    /// Persist a boolean under the given key
    fn set_boolean(&self, key: &str, value: bool);
}

/// TOML-file-backed settings store
///
/// The file is loaded once at construction; unknown keys and non-boolean
/// values are preserved as-is and written back untouched. A missing or
/// unparsable file behaves like an empty table.
pub struct TomlSettings {
    path: PathBuf,
    values: Mutex<toml::Table>,
}

impl TomlSettings {
    /// Load settings from the default location (`~/.gh-checks-notify.toml`)
    pub fn load() -> Self {
        let path = dirs::home_dir()
            .map(|home| home.join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
        Self::load_from(path)
    }

    /// Load settings from a specific file
    pub fn load_from(path: PathBuf) -> Self {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match content.parse::<toml::Table>() {
                Ok(table) => {
                    debug!("Loaded settings from {}", path.display());
                    table
                }
                Err(e) => {
                    warn!("Failed to parse settings file {}: {}", path.display(), e);
                    toml::Table::new()
                }
            },
            Err(_) => {
                debug!("No settings file at {}, using defaults", path.display());
                toml::Table::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn persist(&self, values: &toml::Table) {
        let content = toml::to_string_pretty(values).unwrap_or_default();
        if let Err(e) = std::fs::write(&self.path, content) {
            warn!("Failed to write settings file {}: {}", self.path.display(), e);
        }
    }
}

impl SettingsStore for TomlSettings {
    fn get_boolean(&self, key: &str, default: bool) -> bool {
        self.values
            .lock()
            .unwrap()
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    fn set_boolean(&self, key: &str, value: bool) {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), toml::Value::Boolean(value));
        self.persist(&values);
    }
}
