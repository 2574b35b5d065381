//! Browser LocalStorage, one key per bucket (`leader_<secs>`)

use super::{LeaderboardBackend, bucket_key};
use crate::error::StorageError;
use crate::highscores::ScoreEntry;

/// The page's LocalStorage, if the browser grants it
pub(crate) fn storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StorageError::Unavailable)
}

/// Read one key; a missing key is `Ok(None)`
pub(crate) fn get_item(key: &str) -> Result<Option<String>, StorageError> {
    storage()?
        .get_item(key)
        .map_err(|_| StorageError::Unavailable)
}

pub(crate) fn set_item(key: &str, value: &str) -> Result<(), StorageError> {
    storage()?
        .set_item(key, value)
        .map_err(|_| StorageError::Unavailable)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageBackend;

impl LeaderboardBackend for LocalStorageBackend {
    fn load(&self, duration_secs: u32) -> Result<Vec<ScoreEntry>, StorageError> {
        match get_item(&bucket_key(duration_secs))? {
            Some(json) => {
                let entries: Vec<ScoreEntry> = serde_json::from_str(&json)?;
                log::info!("Loaded {} high scores", entries.len());
                Ok(entries)
            }
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, duration_secs: u32, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string(entries)?;
        set_item(&bucket_key(duration_secs), &json)
    }
}
