//! Block state to model data resolution.

use super::{BlockModelData, ModelCandidates};
use crate::cache::MeshCache;
use crate::error::{MesherError, Result};
use crate::resource_pack::blockstate::variant_signature;
use crate::resource_pack::{canonical_location, AssetProvider, BlockStateDefinition, ModelSet};
use crate::types::Block;
use std::sync::Arc;

/// Evaluate a blockstate definition for a block.
///
/// Pure: the same block and definition always give the same data. A
/// variant signature missing from the table yields empty data.
pub fn get_block_model_data(block: &Block, definition: &BlockStateDefinition) -> BlockModelData {
    let type_name = canonical_location(&block.name);

    match definition {
        BlockStateDefinition::Variants(table) => {
            let signature = variant_signature(&block.properties, Some(table.property_names()));
            let name = data_name(&type_name, &signature);

            let set = match table.default_entry() {
                Some(set) => Some(set),
                None => table.get(&signature),
            };

            let models = set
                .and_then(|set| candidates(set, &name))
                .into_iter()
                .collect();
            BlockModelData { name, models }
        }
        BlockStateDefinition::Multipart(rules) => {
            let signature = variant_signature(&block.properties, None);
            let name = data_name(&type_name, &signature);

            let models = rules
                .iter()
                .filter(|rule| {
                    rule.when
                        .as_ref()
                        .map_or(true, |filter| filter.matches(&block.properties))
                })
                .filter_map(|rule| candidates(&rule.apply, &name))
                .collect();
            BlockModelData { name, models }
        }
    }
}

fn data_name(type_name: &str, signature: &str) -> String {
    if signature.is_empty() {
        type_name.to_string()
    } else {
        format!("{}[{}]", type_name, signature)
    }
}

fn candidates(set: &ModelSet, name: &str) -> Option<ModelCandidates> {
    let options = set.options();
    if options.is_empty() {
        log::warn!("{}: empty model list in blockstate, entry ignored", name);
        return None;
    }
    Some(ModelCandidates { options })
}

/// Cache key for a block: canonical type plus every property.
pub fn block_cache_key(block: &Block) -> String {
    let mut canonical = block.clone();
    canonical.name = canonical_location(&block.name);
    canonical.signature()
}

/// Loads blockstate definitions through the cache and memoizes model data
/// per block signature.
pub struct StateResolver<'a, P: AssetProvider + ?Sized> {
    provider: &'a P,
    cache: &'a MeshCache,
}

impl<'a, P: AssetProvider + ?Sized> StateResolver<'a, P> {
    pub fn new(provider: &'a P, cache: &'a MeshCache) -> Self {
        Self { provider, cache }
    }

    /// Blockstate definition for a block's type.
    pub fn definition(&self, block: &Block) -> Result<Arc<BlockStateDefinition>> {
        let block_id = canonical_location(&block.name);
        self.cache.blockstate(&block_id, || {
            self.provider.blockstate(&block_id).map_err(|e| {
                MesherError::BlockstateResolution(format!("{}: {}", block_id, e))
            })
        })
    }

    /// Model data for a block. Failures resolve to empty data, which is
    /// cached so each bad signature is reported once.
    pub fn resolve(&self, block: &Block) -> Arc<BlockModelData> {
        let key = block_cache_key(block);
        self.cache.model_data(&key, || match self.definition(block) {
            Ok(definition) => {
                let data = get_block_model_data(block, &definition);
                if data.is_empty() {
                    log::warn!("no model matches {}, block skipped", key);
                }
                data
            }
            Err(e) => {
                log::warn!("skipping {}: {}", key, e);
                BlockModelData::empty(key.clone())
            }
        })
    }
}
