//! Key-value persistence for calculator inputs and chart view settings.
//!
//! Engines only see the [`KeyValueStore`] trait. In the browser the store is
//! `window.localStorage`; tests and storage-less environments (private mode,
//! blocked storage) use [`MemoryStore`].
//!
//! Reads never fail from the caller's point of view: a missing key, broken
//! JSON or a blob of the wrong shape all fall back to the supplied default.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// No storage backend could be obtained from the window.
    Unavailable,
    Read(String),
    Write(String),
    Encode(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "Local storage is not available"),
            StorageError::Read(msg) => write!(f, "Failed to read from storage: {}", msg),
            StorageError::Write(msg) => write!(f, "Failed to write to storage: {}", msg),
            StorageError::Encode(msg) => write!(f, "Failed to encode value: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Minimal string key-value store.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to a store, as held by the engines.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// Browser `localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn new() -> Result<Self, StorageError> {
        let storage = gloo_utils::window()
            .local_storage()
            .map_err(|_| StorageError::Unavailable)?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn js_error_text(err: wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Read(js_error_text(e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(js_error_text(e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Write(js_error_text(e)))
    }
}

/// In-memory store used in tests and when `localStorage` is blocked.
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Open `localStorage`, falling back to memory when the browser refuses.
pub fn browser_store() -> SharedStore {
    match LocalStore::new() {
        Ok(store) => Rc::new(store),
        Err(e) => {
            warn!("{}; settings will not survive a reload", e);
            Rc::new(MemoryStore::new())
        }
    }
}

/// Load and decode the JSON blob under `key`, or return `default`.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return default,
        Err(e) => {
            warn!("{} (key '{}')", e, key);
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Discarding stored value for '{}': {}", key, e);
            default
        }
    }
}

/// Encode `value` as JSON and write it under `key`.
pub fn try_save<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.set_item(key, &json)?;
    debug!("Saved '{}' ({} bytes)", key, json.len());
    Ok(())
}

/// [`try_save`], logging instead of returning failures (quota, private mode).
pub fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = try_save(store, key, value) {
        warn!("{} (key '{}')", e, key);
    }
}

/// Remove `key`, logging failures.
pub fn clear(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove_item(key) {
        warn!("{} (key '{}')", e, key);
    }
}
