use serde::Serialize;

use crate::catalog::{BlockDefinition, Catalog};
use crate::resolver::ResolvedBlock;

/// Sentinel description for effects the catalog knows nothing about.
pub const NO_DATA_DESCRIPTION: &str = "no block data found for this effect";

/// Display record for one block, shared by every output surface.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlockInsight {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub key_parameters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl BlockInsight {
    fn from_block(block: &BlockDefinition) -> Self {
        Self {
            name: block.name.clone(),
            description: block.description.clone(),
            required: block.required,
            key_parameters: block.key_parameters.clone(),
            category: block.category.clone(),
        }
    }

    fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: NO_DATA_DESCRIPTION.to_string(),
            required: false,
            key_parameters: Vec::new(),
            category: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.description == NO_DATA_DESCRIPTION
    }
}

/// Strict batch lookup: exact case-insensitive only, one record per effect,
/// misses embedded as placeholders. A miss never aborts the batch.
pub fn describe(effects: &[String], catalog: &Catalog) -> Vec<BlockInsight> {
    effects
        .iter()
        .map(|effect| match catalog.find_exact(effect) {
            Some(block) => BlockInsight::from_block(block),
            None => BlockInsight::placeholder(effect),
        })
        .collect()
}

/// Render a resolver result for the recommendation path, where a confident
/// fuzzy hit is as good as an exact one.
pub fn insight_for(resolved: &ResolvedBlock<'_>) -> BlockInsight {
    match resolved {
        ResolvedBlock::Exact(block) => BlockInsight::from_block(block),
        ResolvedBlock::Fuzzy { block, .. } => BlockInsight::from_block(block),
        ResolvedBlock::NoMatch { query } => BlockInsight::placeholder(query),
    }
}
