use serde::Serialize;
use strsim::normalized_levenshtein;

use crate::aliases::AliasTable;
use crate::catalog::{BlockDefinition, Catalog};

/// Minimum 0-100 score for a fuzzy hit to be accepted automatically.
pub const ACCEPT_THRESHOLD: f64 = 75.0;
/// Minimum score for a near-miss to be worth suggesting to a human.
pub const SUGGEST_THRESHOLD: f64 = 50.0;
/// Suggestion lists are capped at this many entries per kind.
pub const SUGGESTION_LIMIT: usize = 5;

/// 0-100 similarity between a free-text query and a candidate name.
///
/// Normalized Levenshtein over the lower-cased pair, lifted by the best
/// per-token score so "metallica tone" still lands on "Metallica". Any
/// scorer preserving the 75/50 threshold semantics is acceptable here.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let candidate = candidate.trim().to_lowercase();
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let mut best = normalized_levenshtein(&query, &candidate);
    for token in query.split_whitespace() {
        best = best.max(normalized_levenshtein(token, &candidate));
    }
    best * 100.0
}

fn best_candidate<'a, I>(query: &str, candidates: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = similarity(query, candidate);
        // Strict greater-than keeps the first candidate on ties, matching
        // catalog/file iteration order.
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best
}

/// Outcome of resolving one effect name against the block catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedBlock<'a> {
    /// Case-insensitive exact hit; confidence is certain.
    Exact(&'a BlockDefinition),
    /// Best approximate hit with score >= [`ACCEPT_THRESHOLD`].
    Fuzzy { block: &'a BlockDefinition, score: f64 },
    /// Nothing scored high enough; carries the query for display.
    NoMatch { query: String },
}

/// Exact case-insensitive match first, then the single best fuzzy candidate
/// at the accept threshold. Pure over its inputs; calling it twice on the
/// same catalog and query yields the same result.
pub fn resolve_effect<'a>(effect_name: &str, catalog: &'a Catalog) -> ResolvedBlock<'a> {
    let normalized = effect_name.trim().to_lowercase();
    if let Some(block) = catalog.find_exact(&normalized) {
        return ResolvedBlock::Exact(block);
    }

    let mut best: Option<(&BlockDefinition, f64)> = None;
    for block in catalog.blocks() {
        let score = similarity(&normalized, &block.name);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((block, score));
        }
    }

    match best {
        Some((block, score)) if score >= ACCEPT_THRESHOLD => ResolvedBlock::Fuzzy { block, score },
        _ => ResolvedBlock::NoMatch {
            query: effect_name.trim().to_string(),
        },
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Band,
    Genre,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Band => "band",
            MatchKind::Genre => "genre",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// An alias key occurred verbatim inside the query.
    Alias { target: MatchKind, value: String },
    /// Best canonical name scored at or above the accept threshold.
    Fuzzy {
        target: MatchKind,
        value: String,
        score: f64,
    },
    /// Nothing confident; near-misses at the suggest threshold, capped.
    Suggestions {
        bands: Vec<String>,
        genres: Vec<String>,
    },
}

/// Result of a smart search. `matched_tags` is computed for every query and
/// attached to whichever outcome wins, so an alias hit still reports the
/// tags found alongside it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    pub matched_tags: Vec<String>,
    pub outcome: SearchOutcome,
}

/// Tiered band/genre search: alias substring hits win outright, then fuzzy
/// canonical names at the accept threshold, then capped suggestion lists.
pub fn smart_search(query: &str, aliases: &AliasTable) -> SearchResult {
    let normalized = query.trim().to_lowercase();

    let matched_tags: Vec<String> = aliases
        .tags
        .iter()
        .filter(|tag| normalized.contains(tag.as_str()))
        .cloned()
        .collect();

    for (alias, band) in &aliases.bands {
        if normalized.contains(alias.as_str()) {
            return SearchResult {
                matched_tags,
                outcome: SearchOutcome::Alias {
                    target: MatchKind::Band,
                    value: band.clone(),
                },
            };
        }
    }

    for (alias, genre) in &aliases.genres {
        if normalized.contains(alias.as_str()) {
            return SearchResult {
                matched_tags,
                outcome: SearchOutcome::Alias {
                    target: MatchKind::Genre,
                    value: genre.clone(),
                },
            };
        }
    }

    let bands = aliases.canonical_bands();
    if let Some((band, score)) = best_candidate(&normalized, bands.iter().copied()) {
        if score >= ACCEPT_THRESHOLD {
            return SearchResult {
                matched_tags,
                outcome: SearchOutcome::Fuzzy {
                    target: MatchKind::Band,
                    value: band.to_string(),
                    score,
                },
            };
        }
    }

    let genres = aliases.canonical_genres();
    if let Some((genre, score)) = best_candidate(&normalized, genres.iter().copied()) {
        if score >= ACCEPT_THRESHOLD {
            return SearchResult {
                matched_tags,
                outcome: SearchOutcome::Fuzzy {
                    target: MatchKind::Genre,
                    value: genre.to_string(),
                    score,
                },
            };
        }
    }

    SearchResult {
        matched_tags,
        outcome: SearchOutcome::Suggestions {
            bands: suggestions(&normalized, &bands),
            genres: suggestions(&normalized, &genres),
        },
    }
}

fn suggestions(query: &str, candidates: &[&str]) -> Vec<String> {
    let mut scored: Vec<(&str, f64)> = candidates
        .iter()
        .map(|candidate| (*candidate, similarity(query, candidate)))
        .filter(|(_, score)| *score >= SUGGEST_THRESHOLD)
        .collect();
    // Stable sort keeps candidate order on equal scores.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(SUGGESTION_LIMIT)
        .map(|(candidate, _)| candidate.to_string())
        .collect()
}
