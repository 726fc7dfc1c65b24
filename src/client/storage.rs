use std::{collections::HashMap, sync::RwLock};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use super::profile::MarketRole;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const PROFILE_DATA_KEY: &str = "userProfileData";
pub const LEGACY_PROFILE_KEY: &str = "mindmarketProfile";
pub const PROFILE_IMAGE_KEY: &str = "profileImage";
pub const CONSULTATIONS_KEY: &str = "consultationRequests";

pub fn draft_key(role: MarketRole) -> String {
    format!("mindmarket-draft-{}", role.as_str())
}

/// String key/value storage that outlives a page, the way browser local
/// storage does. Values are plain JSON or data-URI strings.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable stored value");
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T)
    where
        Self: Sized,
    {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, raw),
            Err(e) => warn!(key, error = %e, "failed to serialize value for storage"),
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}
