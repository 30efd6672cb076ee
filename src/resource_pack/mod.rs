//! Asset access for blockstates, models, and textures.
//!
//! The pipeline never touches archives or pack ordering. It reads assets
//! through the [`AssetProvider`] trait, which is implemented by the
//! in-memory [`ResourcePack`] and by [`DirectoryAssets`] for an unpacked
//! resource-pack directory.

pub mod blockstate;
pub mod loader;
pub mod model;
pub mod texture;

pub use blockstate::{
    BlockStateDefinition, Filter, ModelHolder, ModelSet, MultipartRule, VariantTable,
    WeightedOption,
};
pub use loader::DirectoryAssets;
pub use model::{BlockModel, ModelElement, ModelFace};
pub use texture::TextureData;

use crate::error::{MesherError, Result};
use std::collections::HashMap;

/// Source of raw assets, looked up by resource location.
///
/// Locations without a namespace default to `minecraft`. Models are
/// returned as written; parent merging happens in the model resolver.
pub trait AssetProvider: Send + Sync {
    /// Load the blockstate definition for a block id (e.g., "minecraft:stone").
    fn blockstate(&self, block_id: &str) -> Result<BlockStateDefinition>;

    /// Load a model by location (e.g., "minecraft:block/stone").
    fn model(&self, location: &str) -> Result<BlockModel>;

    /// Fetch encoded texture bytes. `None` means the texture is unavailable.
    fn texture_bytes(&self, location: &str) -> Option<Vec<u8>>;
}

/// An in-memory resource pack.
#[derive(Debug, Default, Clone)]
pub struct ResourcePack {
    /// Blockstate definitions by namespace and block ID.
    /// Key: namespace (e.g., "minecraft"), Value: map of block_id to definition.
    pub blockstates: HashMap<String, HashMap<String, BlockStateDefinition>>,

    /// Model definitions by namespace and model path.
    pub models: HashMap<String, HashMap<String, BlockModel>>,

    /// Encoded texture bytes by namespace and texture path.
    pub textures: HashMap<String, HashMap<String, Vec<u8>>>,
}

impl ResourcePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a blockstate definition by full resource location (e.g., "minecraft:stone").
    pub fn get_blockstate(&self, resource_location: &str) -> Option<&BlockStateDefinition> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.blockstates.get(namespace).and_then(|ns| ns.get(path))
    }

    /// Get a model by full resource location (e.g., "minecraft:block/stone").
    pub fn get_model(&self, resource_location: &str) -> Option<&BlockModel> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.models.get(namespace).and_then(|ns| ns.get(path))
    }

    /// Get texture bytes by full resource location.
    pub fn get_texture(&self, resource_location: &str) -> Option<&[u8]> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.textures
            .get(namespace)
            .and_then(|ns| ns.get(path))
            .map(|bytes| bytes.as_slice())
    }

    /// Add a blockstate definition. `block_id` may carry a namespace.
    pub fn add_blockstate(&mut self, block_id: &str, definition: BlockStateDefinition) {
        let (namespace, path) = parse_resource_location(block_id);
        self.blockstates
            .entry(namespace.to_string())
            .or_default()
            .insert(path.to_string(), definition);
    }

    /// Parse and add a blockstate definition.
    pub fn add_blockstate_json(&mut self, block_id: &str, json: &str) -> Result<()> {
        let definition = serde_json::from_str(json)?;
        self.add_blockstate(block_id, definition);
        Ok(())
    }

    /// Add a model (e.g., "block/stone").
    pub fn add_model(&mut self, location: &str, model: BlockModel) {
        let (namespace, path) = parse_resource_location(location);
        self.models
            .entry(namespace.to_string())
            .or_default()
            .insert(path.to_string(), model);
    }

    /// Parse and add a model.
    pub fn add_model_json(&mut self, location: &str, json: &str) -> Result<()> {
        let model = serde_json::from_str(json)?;
        self.add_model(location, model);
        Ok(())
    }

    /// Add encoded texture bytes (e.g., "block/stone" with PNG data).
    pub fn add_texture(&mut self, location: &str, bytes: Vec<u8>) {
        let (namespace, path) = parse_resource_location(location);
        self.textures
            .entry(namespace.to_string())
            .or_default()
            .insert(path.to_string(), bytes);
    }

    /// Get the total number of blockstate definitions.
    pub fn blockstate_count(&self) -> usize {
        self.blockstates.values().map(|m| m.len()).sum()
    }

    /// Get the total number of models.
    pub fn model_count(&self) -> usize {
        self.models.values().map(|m| m.len()).sum()
    }

    /// Get the total number of textures.
    pub fn texture_count(&self) -> usize {
        self.textures.values().map(|m| m.len()).sum()
    }
}

impl AssetProvider for ResourcePack {
    fn blockstate(&self, block_id: &str) -> Result<BlockStateDefinition> {
        self.get_blockstate(block_id)
            .cloned()
            .ok_or_else(|| MesherError::ResourceNotFound(format!("blockstate {}", block_id)))
    }

    fn model(&self, location: &str) -> Result<BlockModel> {
        self.get_model(location)
            .cloned()
            .ok_or_else(|| MesherError::ResourceNotFound(format!("model {}", location)))
    }

    fn texture_bytes(&self, location: &str) -> Option<Vec<u8>> {
        self.get_texture(location).map(|bytes| bytes.to_vec())
    }
}

/// Parse a resource location into namespace and path.
/// "minecraft:block/stone" -> ("minecraft", "block/stone")
/// "block/stone" -> ("minecraft", "block/stone")
pub fn parse_resource_location(resource_location: &str) -> (&str, &str) {
    if let Some((namespace, path)) = resource_location.split_once(':') {
        (namespace, path)
    } else {
        ("minecraft", resource_location)
    }
}

/// Canonical `namespace:path` form of a resource location.
pub fn canonical_location(resource_location: &str) -> String {
    let (namespace, path) = parse_resource_location(resource_location);
    format!("{}:{}", namespace, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource_location() {
        assert_eq!(
            parse_resource_location("minecraft:block/stone"),
            ("minecraft", "block/stone")
        );
        assert_eq!(
            parse_resource_location("mymod:block/custom"),
            ("mymod", "block/custom")
        );
        assert_eq!(
            parse_resource_location("block/stone"),
            ("minecraft", "block/stone")
        );
        assert_eq!(canonical_location("block/stone"), "minecraft:block/stone");
    }

    #[test]
    fn test_pack_provider_lookups() {
        let mut pack = ResourcePack::new();
        pack.add_blockstate_json(
            "stone",
            r#"{ "variants": { "": { "model": "block/stone" } } }"#,
        )
        .unwrap();
        pack.add_model_json("block/stone", r#"{ "parent": "block/cube_all" }"#)
            .unwrap();
        pack.add_texture("mymod:block/thing", vec![1, 2, 3]);

        assert!(pack.blockstate("minecraft:stone").is_ok());
        assert!(pack.model("minecraft:block/stone").is_ok());
        assert!(matches!(
            pack.model("block/missing"),
            Err(MesherError::ResourceNotFound(_))
        ));
        assert_eq!(pack.texture_bytes("mymod:block/thing"), Some(vec![1, 2, 3]));
        assert_eq!(pack.texture_bytes("block/thing"), None);

        assert_eq!(pack.blockstate_count(), 1);
        assert_eq!(pack.model_count(), 1);
        assert_eq!(pack.texture_count(), 1);
    }

    #[test]
    fn test_add_json_rejects_malformed() {
        let mut pack = ResourcePack::new();
        assert!(matches!(
            pack.add_model_json("block/bad", "{ not json"),
            Err(MesherError::Json(_))
        ));
    }
}
