use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::aliases::{AliasLoadError, AliasTable};
use crate::catalog::{Catalog, CatalogLoadError};
use crate::check::{run_check, CheckError, CheckReport};
use crate::insights::{describe, insight_for, BlockInsight};
use crate::presets::{PresetLibrary, PresetLoadError, TonePreset};
use crate::resolver::{resolve_effect, similarity, smart_search, ResolvedBlock, SearchResult};
use crate::sync::{run_sync, SyncError, SyncReport};

/// Minimum similarity for a free-text query to select a genre outright.
pub const GENRE_MATCH_THRESHOLD: f64 = 70.0;

/// Filesystem layout of a tone library: `blocks.json`, `aliases.json`, and
/// one preset file per genre under `tones/`.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn blocks_file(&self) -> PathBuf {
        self.root.join("blocks.json")
    }

    pub fn aliases_file(&self) -> PathBuf {
        self.root.join("aliases.json")
    }

    pub fn tones_dir(&self) -> PathBuf {
        self.root.join("tones")
    }
}

/// Process-wide state: catalog and alias table are loaded once at open and
/// read-only afterwards. Preset data is loaded per operation; the sync pass
/// is the only writer.
pub struct App {
    library: Library,
    catalog: Catalog,
    aliases: AliasTable,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub genre: String,
    pub genre_score: f64,
    pub preset: TonePreset,
    pub insights: Vec<BlockInsight>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Exact,
    Fuzzy { score: f64 },
    Miss,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlockLookup {
    pub query: String,
    pub resolution: Resolution,
    pub insight: BlockInsight,
}

impl App {
    pub fn open(library_root: PathBuf) -> Result<Self, AppError> {
        let library = Library::new(library_root);
        let catalog = Catalog::load(&library.blocks_file())?;
        let aliases = AliasTable::load(&library.aliases_file())?;
        Ok(Self {
            library,
            catalog,
            aliases,
        })
    }

    /// Genre keys available in the tone library, sorted.
    pub fn genres(&self) -> Result<Vec<String>, AppError> {
        let presets = PresetLibrary::load(&self.library.tones_dir())?;
        Ok(presets.genres().into_iter().map(str::to_string).collect())
    }

    /// Match a free-text genre query to the featured preset of the closest
    /// genre and resolve every effect in its chain into an insight.
    pub fn recommend(&self, query: &str) -> Result<Recommendation, AppError> {
        let presets = PresetLibrary::load(&self.library.tones_dir())?;

        let mut best: Option<(String, f64)> = None;
        for genre in presets.genres() {
            let score = similarity(query, genre);
            if best.as_ref().map_or(true, |(_, top)| score > *top) {
                best = Some((genre.to_string(), score));
            }
        }

        let genre_miss = || AppError::GenreNotFound {
            query: query.trim().to_string(),
            available: presets.genres().into_iter().map(str::to_string).collect(),
        };

        let (genre, genre_score) = match best {
            Some((genre, score)) if score >= GENRE_MATCH_THRESHOLD => (genre, score),
            _ => return Err(genre_miss()),
        };

        let preset = presets.featured(&genre).ok_or_else(genre_miss)?.clone();

        let insights = preset
            .effects
            .iter()
            .map(|effect| insight_for(&resolve_effect(effect, &self.catalog)))
            .collect();

        Ok(Recommendation {
            genre,
            genre_score,
            preset,
            insights,
        })
    }

    pub fn search(&self, query: &str) -> SearchResult {
        smart_search(query, &self.aliases)
    }

    /// Resolve one effect name (exact, then fuzzy) into a display record.
    pub fn block(&self, name: &str) -> BlockLookup {
        let resolved = resolve_effect(name, &self.catalog);
        let resolution = match &resolved {
            ResolvedBlock::Exact(_) => Resolution::Exact,
            ResolvedBlock::Fuzzy { score, .. } => Resolution::Fuzzy { score: *score },
            ResolvedBlock::NoMatch { .. } => Resolution::Miss,
        };
        BlockLookup {
            query: name.trim().to_string(),
            resolution,
            insight: insight_for(&resolved),
        }
    }

    /// Strict batch lookup, placeholders inline.
    pub fn insights(&self, names: &[String]) -> Vec<BlockInsight> {
        describe(names, &self.catalog)
    }

    pub fn sync(&self) -> Result<SyncReport, AppError> {
        Ok(run_sync(&self.library.tones_dir(), &self.catalog)?)
    }

    pub fn check(&self) -> Result<CheckReport, AppError> {
        Ok(run_check(
            &self.library.blocks_file(),
            &self.library.aliases_file(),
            &self.library.tones_dir(),
        )?)
    }
}

#[derive(Debug)]
pub enum AppError {
    Catalog(CatalogLoadError),
    Alias(AliasLoadError),
    Preset(PresetLoadError),
    Sync(SyncError),
    Check(CheckError),
    GenreNotFound {
        query: String,
        available: Vec<String>,
    },
    InvalidArgument(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Catalog(err) => write!(f, "{}", err),
            AppError::Alias(err) => write!(f, "{}", err),
            AppError::Preset(err) => write!(f, "{}", err),
            AppError::Sync(err) => write!(f, "sync error: {}", err),
            AppError::Check(err) => write!(f, "check error: {}", err),
            AppError::GenreNotFound { query, .. } => {
                write!(f, "no close match found for genre '{}'", query)
            }
            AppError::InvalidArgument(message) => write!(f, "{}", message),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Catalog(err) => Some(err),
            AppError::Alias(err) => Some(err),
            AppError::Preset(err) => Some(err),
            AppError::Sync(err) => Some(err),
            AppError::Check(err) => Some(err),
            AppError::GenreNotFound { .. } => None,
            AppError::InvalidArgument(_) => None,
        }
    }
}

impl From<CatalogLoadError> for AppError {
    fn from(value: CatalogLoadError) -> Self {
        AppError::Catalog(value)
    }
}

impl From<AliasLoadError> for AppError {
    fn from(value: AliasLoadError) -> Self {
        AppError::Alias(value)
    }
}

impl From<PresetLoadError> for AppError {
    fn from(value: PresetLoadError) -> Self {
        AppError::Preset(value)
    }
}

impl From<SyncError> for AppError {
    fn from(value: SyncError) -> Self {
        AppError::Sync(value)
    }
}

impl From<CheckError> for AppError {
    fn from(value: CheckError) -> Self {
        AppError::Check(value)
    }
}
