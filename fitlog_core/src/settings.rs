//! Persisted user settings.
//!
//! The daily calorie goal survives restarts by living in `settings.json`
//! beside the workout history. The history file itself keeps its
//! four-field layout.

use crate::store::parent_dir;
use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// File name of the settings inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub daily_goal: u32,
}

impl UserSettings {
    /// Load settings from a file with shared locking
    ///
    /// Returns `None` if the file doesn't exist or cannot be parsed; the
    /// caller falls back to its configured defaults.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No settings file at {:?}", path);
            return Ok(None);
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;

        if let Err(e) = read {
            tracing::warn!("Failed to read settings {:?}: {}. Using defaults.", path, e);
            return Ok(None);
        }

        match serde_json::from_str::<UserSettings>(&contents) {
            Ok(settings) => {
                tracing::debug!("Loaded settings from {:?}", path);
                Ok(Some(settings))
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings {:?}: {}. Using defaults.", path, e);
                Ok(None)
            }
        }
    }

    /// Save settings atomically (temp file, sync, rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = parent_dir(path);
        std::fs::create_dir_all(dir)?;

        let temp = NamedTempFile::new_in(dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved settings to {:?}", path);
        Ok(())
    }
}
