use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

use super::Tab;

const ACTIVE_TAB_KEY: &str = "active_tab";

enum Backend {
    Disk(sled::Db),
    Memory(Mutex<HashMap<String, String>>),
}

/// Small key-value store for UI preferences, so the dashboard reopens on
/// the tab it was left on. Falls back to a process-local map when the
/// sled tree cannot be opened (read-only filesystem, locked path), in
/// which case preferences simply do not survive a restart.
pub struct PreferenceStore {
    backend: Backend,
}

impl PreferenceStore {
    pub fn open(path: &str) -> Self {
        match sled::open(path) {
            Ok(db) => Self {
                backend: Backend::Disk(db),
            },
            Err(e) => {
                warn!(%path, error = %e, "preference store unavailable, using in-memory fallback");
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(HashMap::new())),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match &self.backend {
            Backend::Disk(db) => db
                .get(key)
                .ok()
                .flatten()
                .and_then(|v| String::from_utf8(v.to_vec()).ok()),
            Backend::Memory(map) => map.lock().ok()?.get(key).cloned(),
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        match &self.backend {
            Backend::Disk(db) => {
                if let Err(e) = db.insert(key, value.as_bytes()) {
                    warn!(%key, error = %e, "failed to persist preference");
                }
            }
            Backend::Memory(map) => {
                if let Ok(mut map) = map.lock() {
                    map.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.get(ACTIVE_TAB_KEY).and_then(|s| Tab::from_str(&s))
    }

    pub fn set_active_tab(&self, tab: Tab) {
        self.set(ACTIVE_TAB_KEY, tab.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let store = PreferenceStore::in_memory();
        assert_eq!(store.active_tab(), None);

        store.set_active_tab(Tab::Market);
        assert_eq!(store.active_tab(), Some(Tab::Market));

        store.set_active_tab(Tab::Backtest);
        assert_eq!(store.active_tab(), Some(Tab::Backtest));
    }

    #[test]
    fn garbage_value_ignored() {
        let store = PreferenceStore::in_memory();
        store.set("active_tab", "not-a-tab");
        assert_eq!(store.active_tab(), None);
    }
}
