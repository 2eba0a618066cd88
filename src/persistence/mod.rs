//! Key-value persistence with silent fallback
//!
//! Features:
//! - `Storage` trait so the session never touches browser globals directly
//! - In-memory backend for native builds and tests
//! - LocalStorage backend on the web
//! - Unreadable or unavailable storage degrades to defaults, never errors

use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

/// Best score key (shared with earlier builds of the game)
pub const BEST_SCORE_KEY: &str = "septicSurferBest";

/// String key-value store
pub trait Storage {
    /// Read a value; `None` if missing or the store is unavailable
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value; returns false if it could not be stored
    fn set(&mut self, key: &str, value: &str) -> bool;
}

/// Process-local storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.values.insert(key.to_string(), value.to_string());
        true
    }
}

/// Storage that is never available (private mode, blocked cookies)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) -> bool {
        false
    }
}

/// Read the best score, 0 if missing or corrupt
pub fn load_best_score(storage: &dyn Storage) -> u64 {
    match storage.get(BEST_SCORE_KEY) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring corrupt best score {raw:?}");
            0
        }),
        None => 0,
    }
}

/// Persist the best score; failures are logged and otherwise ignored
pub fn save_best_score(storage: &mut dyn Storage, score: u64) {
    if storage.set(BEST_SCORE_KEY, &score.to_string()) {
        log::info!("Best score saved ({score})");
    } else {
        log::warn!("Storage unavailable, best score kept in memory only");
    }
}
