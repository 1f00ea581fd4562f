use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One block record from `blocks.json`: an amp, cab, or effect with the
/// metadata the insight views render. Fields we do not model (dual-mode
/// naming, legal metadata, scrape provenance) are captured in `extra` so a
/// rewrite passes them through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub key_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The immutable block catalog. Loaded once per process and only read
/// afterwards; every resolver and formatter call borrows it.
#[derive(Debug, Clone)]
pub struct Catalog {
    blocks: Vec<BlockDefinition>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let raw = std::fs::read(path).map_err(|err| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        let blocks: Vec<BlockDefinition> =
            serde_json::from_slice(&raw).map_err(|err| CatalogLoadError::Parse {
                path: path.to_path_buf(),
                source: err,
            })?;
        Self::from_blocks(blocks).map_err(|message| CatalogLoadError::Invalid {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Build a catalog from in-memory records, enforcing the name invariant:
    /// non-empty and case-insensitively unique.
    pub fn from_blocks(blocks: Vec<BlockDefinition>) -> Result<Self, String> {
        let mut seen: Vec<String> = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let key = block.name.trim().to_lowercase();
            if key.is_empty() {
                return Err("block with empty name".to_string());
            }
            if seen.contains(&key) {
                return Err(format!("duplicate block name '{}'", block.name.trim()));
            }
            seen.push(key);
        }
        Ok(Self { blocks })
    }

    /// Case-insensitive exact lookup on the block name.
    pub fn find_exact(&self, name: &str) -> Option<&BlockDefinition> {
        let needle = name.trim().to_lowercase();
        self.blocks
            .iter()
            .find(|block| block.name.trim().to_lowercase() == needle)
    }

    /// Blocks in file order. Fuzzy resolution iterates in this order, so the
    /// first entry wins on equal scores.
    pub fn blocks(&self) -> &[BlockDefinition] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug)]
pub enum CatalogLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid {
        path: PathBuf,
        message: String,
    },
}

impl fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLoadError::Io { path, source } => {
                write!(f, "unable to read catalog '{}': {}", path.display(), source)
            }
            CatalogLoadError::Parse { path, source } => {
                write!(f, "invalid catalog JSON '{}': {}", path.display(), source)
            }
            CatalogLoadError::Invalid { path, message } => {
                write!(f, "invalid catalog '{}': {}", path.display(), message)
            }
        }
    }
}

impl Error for CatalogLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CatalogLoadError::Io { source, .. } => Some(source),
            CatalogLoadError::Parse { source, .. } => Some(source),
            CatalogLoadError::Invalid { .. } => None,
        }
    }
}
