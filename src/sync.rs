use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::presets::{genre_files, genre_key, load_genre_file, save_genre_file, PresetLoadError};

/// Suffix appended to effect names that no longer resolve against the
/// catalog. Permanent until a human edits the file.
pub const REVIEW_MARKER: &str = " [review]";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlaggedEffect {
    pub preset_name: String,
    pub effect: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SyncFileReport {
    pub genre: String,
    pub presets_checked: usize,
    pub flagged: Vec<FlaggedEffect>,
    pub rewritten: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SyncReport {
    pub valid_blocks: usize,
    pub files: Vec<SyncFileReport>,
}

impl SyncReport {
    pub fn flagged_count(&self) -> usize {
        self.files.iter().map(|file| file.flagged.len()).sum()
    }
}

#[derive(Debug)]
pub enum SyncError {
    Preset(PresetLoadError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Preset(err) => write!(f, "{}", err),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SyncError::Preset(err) => Some(err),
        }
    }
}

impl From<PresetLoadError> for SyncError {
    fn from(value: PresetLoadError) -> Self {
        SyncError::Preset(value)
    }
}

/// Maintenance pass over every genre file: effect names are checked with
/// strict exact membership (no fuzzy step), misses get the review marker
/// appended, and a file is rewritten only when something was flagged.
///
/// Files are independent units; a crash mid-pass can leave earlier files
/// updated and later ones untouched.
pub fn run_sync(tones_dir: &Path, catalog: &Catalog) -> Result<SyncReport, SyncError> {
    let mut files = Vec::new();
    for path in genre_files(tones_dir)? {
        let genre = genre_key(&path);
        let mut presets = load_genre_file(&path)?;

        let mut flagged = Vec::new();
        for preset in &mut presets {
            for effect in &mut preset.effects {
                if catalog.find_exact(effect).is_some() {
                    continue;
                }
                // Already-marked entries stay as they are so repeated passes
                // are idempotent.
                if effect.ends_with(REVIEW_MARKER) {
                    continue;
                }
                flagged.push(FlaggedEffect {
                    preset_name: preset.preset_name.clone(),
                    effect: effect.clone(),
                });
                effect.push_str(REVIEW_MARKER);
            }
        }

        let rewritten = !flagged.is_empty();
        if rewritten {
            save_genre_file(&path, &presets)?;
        }

        files.push(SyncFileReport {
            genre,
            presets_checked: presets.len(),
            flagged,
            rewritten,
        });
    }

    Ok(SyncReport {
        valid_blocks: catalog.len(),
        files,
    })
}
