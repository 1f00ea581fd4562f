use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::aliases::AliasTable;
use crate::catalog::{Catalog, CatalogLoadError};
use crate::presets::{genre_files, load_genre_file};
use crate::sync::REVIEW_MARKER;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckReport {
    pub files_scanned: u64,
    pub issues: Vec<CheckIssue>,
}

impl CheckReport {
    pub fn ok(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug)]
pub enum CheckError {
    Catalog(CatalogLoadError),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Catalog(err) => write!(f, "{}", err),
        }
    }
}

impl Error for CheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CheckError::Catalog(err) => Some(err),
        }
    }
}

impl From<CatalogLoadError> for CheckError {
    fn from(value: CatalogLoadError) -> Self {
        CheckError::Catalog(value)
    }
}

/// Read-only library diagnostics: the catalog must load (fatal otherwise),
/// then the alias file and every tone file are validated without touching
/// anything on disk. Per-file problems are issues, not errors.
pub fn run_check(
    blocks_file: &Path,
    aliases_file: &Path,
    tones_dir: &Path,
) -> Result<CheckReport, CheckError> {
    let catalog = Catalog::load(blocks_file)?;

    let mut files_scanned = 1u64;
    let mut issues = Vec::new();
    if catalog.is_empty() {
        issues.push(issue(blocks_file, "catalog contains no blocks"));
    }

    files_scanned += 1;
    if let Err(err) = AliasTable::load(aliases_file) {
        issues.push(issue(aliases_file, &err.to_string()));
    }

    let tone_paths = match genre_files(tones_dir) {
        Ok(paths) => paths,
        Err(err) => {
            issues.push(issue(tones_dir, &err.to_string()));
            return Ok(CheckReport {
                files_scanned,
                issues,
            });
        }
    };

    for path in tone_paths {
        files_scanned += 1;
        let presets = match load_genre_file(&path) {
            Ok(presets) => presets,
            Err(err) => {
                issues.push(issue(&path, &err.to_string()));
                continue;
            }
        };

        for preset in &presets {
            for effect in &preset.effects {
                if effect.ends_with(REVIEW_MARKER) {
                    issues.push(issue(
                        &path,
                        &format!(
                            "effect '{}' in preset '{}' is marked for review",
                            effect, preset.preset_name
                        ),
                    ));
                } else if catalog.find_exact(effect).is_none() {
                    issues.push(issue(
                        &path,
                        &format!(
                            "effect '{}' in preset '{}' not found in catalog",
                            effect, preset.preset_name
                        ),
                    ));
                }
            }
        }
    }

    Ok(CheckReport {
        files_scanned,
        issues,
    })
}

fn issue(path: &Path, message: &str) -> CheckIssue {
    CheckIssue {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::run_check;
    use std::path::Path;

    fn write(path: &Path, body: &str) {
        std::fs::write(path, body).expect("fixture should be writable");
    }

    fn setup(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf, std::path::PathBuf) {
        let blocks = dir.join("blocks.json");
        let aliases = dir.join("aliases.json");
        let tones = dir.join("tones");
        std::fs::create_dir_all(&tones).expect("tones dir should be creatable");
        write(
            &blocks,
            r#"[{"name": "Fuzz", "description": "", "required": false, "key_parameters": []}]"#,
        );
        write(&aliases, r#"{"bands": {}, "genres": {}, "tags": []}"#);
        (blocks, aliases, tones)
    }

    #[test]
    fn clean_library_passes() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let (blocks, aliases, tones) = setup(dir.path());
        write(
            &tones.join("grunge.json"),
            r#"[{"band": "B", "preset_name": "P", "genre": "G", "amp_model": "A",
                 "cab_ir": "C", "effects": ["Fuzz"], "summary": "S"}]"#,
        );

        let report = run_check(&blocks, &aliases, &tones).expect("check should run");
        assert!(report.ok());
        assert_eq!(report.files_scanned, 3);
    }

    #[test]
    fn unresolved_and_marked_effects_become_issues() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let (blocks, aliases, tones) = setup(dir.path());
        write(
            &tones.join("doom.json"),
            r#"[{"band": "B", "preset_name": "P", "genre": "G", "amp_model": "A",
                 "cab_ir": "C", "effects": ["Fuzz", "Growl", "Old One [review]"],
                 "summary": "S"}]"#,
        );

        let report = run_check(&blocks, &aliases, &tones).expect("check should run");
        assert!(!report.ok());
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues[0].message.contains("not found in catalog"));
        assert!(report.issues[1].message.contains("marked for review"));
    }

    #[test]
    fn malformed_tone_file_is_an_issue_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let (blocks, aliases, tones) = setup(dir.path());
        write(&tones.join("broken.json"), "{nope");

        let report = run_check(&blocks, &aliases, &tones).expect("check should run");
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].message.contains("invalid preset JSON"));
    }

    #[test]
    fn missing_catalog_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let tones = dir.path().join("tones");
        std::fs::create_dir_all(&tones).expect("tones dir should be creatable");

        let result = run_check(
            &dir.path().join("blocks.json"),
            &dir.path().join("aliases.json"),
            &tones,
        );
        assert!(result.is_err());
    }
}
