//! Content-addressed caches shared by every pipeline stage.
//!
//! All maps are keyed by content (locations, block signatures, material
//! keys), never by identity. Inserts are single-writer-wins: when two
//! workers race on the same key, the first stored value is kept and the
//! loser's work is dropped.

use crate::error::Result;
use crate::material::{Material, MaterialKey};
use crate::mesher::BlockComponent;
use crate::resolver::BlockModelData;
use crate::resource_pack::{BlockModel, BlockStateDefinition};
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Entry counts and hit/miss totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub blockstates: usize,
    pub models: usize,
    pub model_data: usize,
    pub materials: usize,
    pub components: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Shared cache service for blockstates, models, resolved model data,
/// materials, and per-block geometry components.
#[derive(Default)]
pub struct MeshCache {
    blockstates: RwLock<HashMap<String, Arc<BlockStateDefinition>>>,
    models: RwLock<HashMap<String, Arc<BlockModel>>>,
    model_data: RwLock<HashMap<String, Arc<BlockModelData>>>,
    materials: RwLock<HashMap<MaterialKey, Arc<Material>>>,
    components: RwLock<HashMap<String, Arc<Vec<BlockComponent>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blockstate definition for a canonical block id, loading on miss.
    /// Failed loads are not cached.
    pub fn blockstate<F>(&self, block_id: &str, load: F) -> Result<Arc<BlockStateDefinition>>
    where
        F: FnOnce() -> Result<BlockStateDefinition>,
    {
        self.get_or_try_insert(&self.blockstates, block_id, load)
    }

    /// Parent-merged model for a canonical location, resolving on miss.
    pub fn model<F>(&self, location: &str, load: F) -> Result<Arc<BlockModel>>
    where
        F: FnOnce() -> Result<BlockModel>,
    {
        self.get_or_try_insert(&self.models, location, load)
    }

    /// Resolved model data for a block signature.
    pub fn model_data<F>(&self, signature: &str, compute: F) -> Arc<BlockModelData>
    where
        F: FnOnce() -> BlockModelData,
    {
        self.get_or_insert(&self.model_data, signature, compute)
    }

    /// Material for a key. A hit never re-decodes the texture.
    pub fn material<F>(&self, key: &MaterialKey, build: F) -> Arc<Material>
    where
        F: FnOnce() -> Material,
    {
        self.get_or_insert(&self.materials, key, build)
    }

    /// Unrotated geometry components for a selected model option name.
    pub fn components<F>(&self, option_name: &str, build: F) -> Arc<Vec<BlockComponent>>
    where
        F: FnOnce() -> Vec<BlockComponent>,
    {
        self.get_or_insert(&self.components, option_name, build)
    }

    /// Look up an already-built material without building it.
    pub fn cached_material(&self, key: &MaterialKey) -> Option<Arc<Material>> {
        self.materials.read().get(key).cloned()
    }

    /// Wipe every map. Hit/miss counters keep running.
    pub fn clear(&self) {
        self.blockstates.write().clear();
        self.models.write().clear();
        self.model_data.write().clear();
        self.materials.write().clear();
        self.components.write().clear();
        log::debug!("mesh caches cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            blockstates: self.blockstates.read().len(),
            models: self.models.read().len(),
            model_data: self.model_data.read().len(),
            materials: self.materials.read().len(),
            components: self.components.read().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn lookup<K, Q, V>(&self, map: &RwLock<HashMap<K, Arc<V>>>, key: &Q) -> Option<Arc<V>>
    where
        K: Hash + Eq + Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let found = map.read().get(key).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn store<K, V>(map: &RwLock<HashMap<K, Arc<V>>>, key: K, value: V) -> Arc<V>
    where
        K: Hash + Eq,
    {
        map.write().entry(key).or_insert_with(|| Arc::new(value)).clone()
    }

    fn get_or_insert<K, Q, V, F>(&self, map: &RwLock<HashMap<K, Arc<V>>>, key: &Q, make: F) -> Arc<V>
    where
        K: Hash + Eq + Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce() -> V,
    {
        if let Some(hit) = self.lookup(map, key) {
            return hit;
        }
        // Built outside the lock; a racing writer may win.
        let value = make();
        Self::store(map, key.to_owned(), value)
    }

    fn get_or_try_insert<K, Q, V, F>(
        &self,
        map: &RwLock<HashMap<K, Arc<V>>>,
        key: &Q,
        make: F,
    ) -> Result<Arc<V>>
    where
        K: Hash + Eq + Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce() -> Result<V>,
    {
        if let Some(hit) = self.lookup(map, key) {
            return Ok(hit);
        }
        let value = make()?;
        Ok(Self::store(map, key.to_owned(), value))
    }
}

impl std::fmt::Debug for MeshCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshCache").field("stats", &self.stats()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MesherError;

    #[test]
    fn test_hit_skips_builder() {
        let cache = MeshCache::new();
        let first = cache.model_data("stone", || BlockModelData::empty("stone"));
        let second = cache.model_data("stone", || panic!("builder must not run on a hit"));
        assert!(Arc::ptr_eq(&first, &second));

        let stats = cache.stats();
        assert_eq!(stats.model_data, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_failed_load_not_cached() {
        let cache = MeshCache::new();
        let result = cache.model("minecraft:block/nope", || {
            Err(MesherError::ResourceNotFound("model".into()))
        });
        assert!(result.is_err());
        assert_eq!(cache.stats().models, 0);

        let loaded = cache.model("minecraft:block/nope", || Ok(BlockModel::default()));
        assert!(loaded.is_ok());
        assert_eq!(cache.stats().models, 1);
    }

    #[test]
    fn test_material_keyed_by_content() {
        let cache = MeshCache::new();
        let a = MaterialKey::new("minecraft:block/stone", 0, None);
        let b = MaterialKey::new("block/stone", 360, None);
        let first = cache.material(&a, || Material::fallback(a.clone()));
        let second = cache.material(&b, || panic!("equal keys must share an entry"));
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.cached_material(&a).is_some());
    }

    #[test]
    fn test_clear_wipes_all_maps() {
        let cache = MeshCache::new();
        cache.model_data("stone", || BlockModelData::empty("stone"));
        cache.components("stone", Vec::new);
        cache
            .blockstate("minecraft:stone", || {
                Ok(serde_json::from_str(r#"{ "variants": {} }"#)?)
            })
            .unwrap();

        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.blockstates, 0);
        assert_eq!(stats.model_data, 0);
        assert_eq!(stats.components, 0);
    }
}
