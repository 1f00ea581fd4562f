use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One saved tone configuration. `effects` is the signal-path order and is
/// significant; unknown fields ride along in `extra` so a rewrite preserves
/// them byte-for-byte in meaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TonePreset {
    #[serde(default)]
    pub band: String,
    #[serde(default)]
    pub preset_name: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub amp_model: String,
    #[serde(default)]
    pub cab_ir: String,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Genre-keyed preset collection loaded from `tones/*.json`. The file stem is
/// the genre key; per-file record order is preserved and the first record is
/// the genre's featured preset.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    genres: BTreeMap<String, Vec<TonePreset>>,
}

impl PresetLibrary {
    pub fn load(tones_dir: &Path) -> Result<Self, PresetLoadError> {
        let mut genres = BTreeMap::new();
        for path in genre_files(tones_dir)? {
            let genre = genre_key(&path);
            let presets = load_genre_file(&path)?;
            genres.insert(genre, presets);
        }
        Ok(Self { genres })
    }

    /// Genre keys in sorted order.
    pub fn genres(&self) -> Vec<&str> {
        self.genres.keys().map(String::as_str).collect()
    }

    pub fn presets_for(&self, genre: &str) -> Option<&[TonePreset]> {
        self.genres.get(genre).map(Vec::as_slice)
    }

    pub fn featured(&self, genre: &str) -> Option<&TonePreset> {
        self.presets_for(genre).and_then(|presets| presets.first())
    }
}

/// Every `*.json` under the tones dir, sorted for a stable processing order.
pub fn genre_files(tones_dir: &Path) -> Result<Vec<PathBuf>, PresetLoadError> {
    let entries = std::fs::read_dir(tones_dir).map_err(|err| PresetLoadError::Io {
        path: tones_dir.to_path_buf(),
        source: err,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| PresetLoadError::Io {
            path: tones_dir.to_path_buf(),
            source: err,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn genre_key(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn load_genre_file(path: &Path) -> Result<Vec<TonePreset>, PresetLoadError> {
    let raw = std::fs::read(path).map_err(|err| PresetLoadError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    serde_json::from_slice(&raw).map_err(|err| PresetLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Rewrite one genre file in place. Only the sync pass calls this.
pub fn save_genre_file(path: &Path, presets: &[TonePreset]) -> Result<(), PresetLoadError> {
    let body = serde_json::to_vec_pretty(presets).map_err(|err| PresetLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;
    std::fs::write(path, body).map_err(|err| PresetLoadError::Io {
        path: path.to_path_buf(),
        source: err,
    })
}

#[derive(Debug)]
pub enum PresetLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for PresetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetLoadError::Io { path, source } => {
                write!(f, "unable to read presets '{}': {}", path.display(), source)
            }
            PresetLoadError::Parse { path, source } => {
                write!(f, "invalid preset JSON '{}': {}", path.display(), source)
            }
        }
    }
}

impl Error for PresetLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PresetLoadError::Io { source, .. } => Some(source),
            PresetLoadError::Parse { source, .. } => Some(source),
        }
    }
}
