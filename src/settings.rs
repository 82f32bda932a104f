//! Persisted player settings in ~/.flappy/.
//!
//! One JSON document holds the best score and the audio/difficulty choices.
//! Every change rewrites the whole file; there is a single writer, so the
//! last write wins.

use crate::constants::{DEFAULT_VOLUME, MAX_DIFFICULTY, SETTINGS_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Get the ~/.flappy/ directory path, creating it if needed.
pub fn flappy_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(".flappy");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.flappy/.
pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    Ok(flappy_dir()?.join(filename))
}

/// Load a JSON file, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub best: u32,
    pub audio_enabled: bool,
    /// Master gain, 0..=1.
    pub volume: f32,
    /// 1..=MAX_DIFFICULTY.
    pub difficulty: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            best: 0,
            audio_enabled: true,
            volume: DEFAULT_VOLUME,
            difficulty: 1,
        }
    }
}

impl Settings {
    /// Pull hand-edited or stale values back into range.
    pub fn sanitized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        self.difficulty = self.difficulty.clamp(1, MAX_DIFFICULTY);
        self
    }
}

/// Settings plus where they live. A store without a path never touches disk.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: Settings,
}

impl SettingsStore {
    /// Load from ~/.flappy/settings.json. Falls back to an in-memory store
    /// when the home directory is unavailable.
    pub fn open_default() -> Self {
        match data_path(SETTINGS_FILE) {
            Ok(path) => Self::at(path),
            Err(_) => Self::in_memory(Settings::default()),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = load_json_or_default::<Settings>(&path).sanitized();
        Self {
            path: Some(path),
            settings,
        }
    }

    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            settings: settings.sanitized(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Apply a change and write it through. The in-memory value is updated
    /// even if the write fails.
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) -> io::Result<()> {
        change(&mut self.settings);
        self.settings = self.settings.clone().sanitized();
        self.save()
    }

    pub fn save(&self) -> io::Result<()> {
        match &self.path {
            Some(path) => save_json(path, &self.settings),
            None => Ok(()),
        }
    }
}
