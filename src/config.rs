use std::env as stdenv;

use dotenvy::dotenv;
use log::{debug, info};

use crate::flash::{FlashStore, DEFAULT_STORAGE_KEY};
use crate::session::SessionStore;

pub const STORAGE_KEY_VAR: &str = "FLASH_STORAGE_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashConfig {
    pub storage_key: String,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl FlashConfig {
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
        }
    }

    /// Reads `FLASH_STORAGE_KEY`, loading `.env` first when there is one.
    pub fn from_env() -> Self {
        if dotenv().is_ok() {
            info!(".env loaded for flash configuration");
        }
        Self::from_lookup(|key| stdenv::var(key).ok())
    }

    /// Builds the config from any variable source. Unset or blank values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_key = lookup(STORAGE_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        debug!("flash storage key: {}", storage_key);
        Self { storage_key }
    }

    /// Opens a [`FlashStore`] over `session` under the configured key.
    pub fn open<'a, S: SessionStore + ?Sized>(&self, session: &'a mut S) -> FlashStore<'a, S> {
        FlashStore::with_key(session, self.storage_key.as_str())
    }
}
