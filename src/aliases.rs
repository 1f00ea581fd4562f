use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Band/genre synonym tables plus the flat tag list, from `aliases.json`.
/// Keys are lower-cased at load so every lookup is lower-case to lower-case.
/// A string may legally appear both as a tag and inside an alias key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AliasTable {
    #[serde(default)]
    pub bands: BTreeMap<String, String>,
    #[serde(default)]
    pub genres: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AliasTable {
    pub fn load(path: &Path) -> Result<Self, AliasLoadError> {
        let raw = std::fs::read(path).map_err(|err| AliasLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        let table: AliasTable =
            serde_json::from_slice(&raw).map_err(|err| AliasLoadError::Parse {
                path: path.to_path_buf(),
                source: err,
            })?;
        Ok(table.normalized())
    }

    fn normalized(self) -> Self {
        Self {
            bands: lowercase_keys(self.bands),
            genres: lowercase_keys(self.genres),
            tags: self
                .tags
                .into_iter()
                .map(|tag| tag.trim().to_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }

    /// Distinct canonical band names, first-seen order.
    pub fn canonical_bands(&self) -> Vec<&str> {
        distinct_values(&self.bands)
    }

    /// Distinct canonical genre names, first-seen order.
    pub fn canonical_genres(&self) -> Vec<&str> {
        distinct_values(&self.genres)
    }
}

fn lowercase_keys(map: BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.into_iter()
        .map(|(alias, canonical)| (alias.trim().to_lowercase(), canonical))
        .collect()
}

fn distinct_values(map: &BTreeMap<String, String>) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for value in map.values() {
        if !out.contains(&value.as_str()) {
            out.push(value);
        }
    }
    out
}

#[derive(Debug)]
pub enum AliasLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for AliasLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasLoadError::Io { path, source } => {
                write!(f, "unable to read aliases '{}': {}", path.display(), source)
            }
            AliasLoadError::Parse { path, source } => {
                write!(f, "invalid aliases JSON '{}': {}", path.display(), source)
            }
        }
    }
}

impl Error for AliasLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AliasLoadError::Io { source, .. } => Some(source),
            AliasLoadError::Parse { source, .. } => Some(source),
        }
    }
}
