use std::{collections::BTreeMap, fs, path::PathBuf};

/// Key of the persisted history log.
pub const HISTORY_KEY: &str = "history";

/// Key of the persisted theme preference.
pub const THEME_KEY: &str = "theme";

/// Key of the last submitted request, used by manual retry.
pub const LAST_REQUEST_KEY: &str = "last_request";

/// Minimal string key-value persistence, mirroring web local storage.
///
/// Writes never surface as errors to the caller: a failing store is logged
/// and the application stays usable.
pub trait KvStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);

    /// Drop the value under `key`.
    fn remove(&mut self, key: &str);
}

/// Store backed by a single JSON object file, persisted on every mutation.
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading any existing content verbatim.
    /// A missing or unreadable file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        Self { path, values }
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            log::warn!("Failed to create the client state directory: {e}");
            return;
        }

        let content = match serde_json::to_string_pretty(&self.values) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to serialize client state: {e}");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, content) {
            log::warn!("Failed to persist client state to {}: {e}", self.path.display());
        }
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.persist();
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}
