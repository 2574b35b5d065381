//! One JSON file per bucket in a directory (native)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{LeaderboardBackend, bucket_key};
use crate::error::StorageError;
use crate::highscores::ScoreEntry;

/// Stores `<dir>/leader_<secs>.json`, written via a temp file and rename
#[derive(Debug, Clone)]
pub struct JsonDirBackend {
    dir: PathBuf,
}

impl JsonDirBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, duration_secs: u32) -> PathBuf {
        self.dir.join(format!("{}.json", bucket_key(duration_secs)))
    }
}

impl LeaderboardBackend for JsonDirBackend {
    fn load(&self, duration_secs: u32) -> Result<Vec<ScoreEntry>, StorageError> {
        let path = self.path_for(duration_secs);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let entries: Vec<ScoreEntry> = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores from {}", entries.len(), path.display());
        Ok(entries)
    }

    fn save(&mut self, duration_secs: u32, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(duration_secs);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
