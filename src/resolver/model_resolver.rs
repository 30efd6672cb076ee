//! Model inheritance resolution.

use crate::cache::MeshCache;
use crate::error::{MesherError, Result};
use crate::resource_pack::{canonical_location, AssetProvider, BlockModel};
use std::sync::Arc;

/// Maximum depth for model inheritance to prevent infinite loops.
const MAX_INHERITANCE_DEPTH: usize = 10;

/// Resolves model inheritance chains, caching merged models by location.
pub struct ModelResolver<'a, P: AssetProvider + ?Sized> {
    provider: &'a P,
    cache: &'a MeshCache,
}

impl<'a, P: AssetProvider + ?Sized> ModelResolver<'a, P> {
    pub fn new(provider: &'a P, cache: &'a MeshCache) -> Self {
        Self { provider, cache }
    }

    /// Resolve a model with all inherited properties.
    pub fn resolve(&self, model_location: &str) -> Result<Arc<BlockModel>> {
        let location = canonical_location(model_location);
        self.cache
            .model(&location, || self.resolve_internal(&location, 0))
    }

    fn resolve_internal(&self, model_location: &str, depth: usize) -> Result<BlockModel> {
        if depth >= MAX_INHERITANCE_DEPTH {
            return Err(MesherError::ModelInheritanceTooDeep(
                model_location.to_string(),
            ));
        }

        let base_model = self.provider.model(model_location).map_err(|e| {
            MesherError::ModelResolution(format!("{}: {}", model_location, e))
        })?;

        let parent_location = match base_model.parent_location() {
            Some(parent) => parent,
            None => return Ok(base_model),
        };

        // builtin/generated, builtin/entity and friends have no JSON.
        if parent_location.split_once(':').map_or(false, |(_, path)| path.starts_with("builtin/")) {
            return Ok(BlockModel {
                parent: None,
                ..base_model
            });
        }

        let parent_model = self.resolve_internal(&parent_location, depth + 1)?;
        Ok(merge_models(parent_model, base_model))
    }
}

/// Merge a parent model into a child model.
/// Child textures override the parent's; child elements replace the
/// parent's only when the child has any.
fn merge_models(parent: BlockModel, child: BlockModel) -> BlockModel {
    let mut merged = parent;

    merged.textures.extend(child.textures);

    if !child.elements.is_empty() {
        merged.elements = child.elements;
    }

    merged.parent = None;
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::model::{ModelElement, ModelFace};
    use crate::resource_pack::ResourcePack;
    use crate::types::Direction;

    fn create_test_pack() -> ResourcePack {
        let mut pack = ResourcePack::new();

        let cube_all = BlockModel {
            parent: Some("block/cube".to_string()),
            textures: [("particle".to_string(), "#all".to_string())]
                .into_iter()
                .collect(),
            elements: vec![ModelElement {
                from: [0.0, 0.0, 0.0],
                to: [16.0, 16.0, 16.0],
                rotation: None,
                faces: Direction::ALL
                    .iter()
                    .map(|d| (*d, ModelFace::new("#all")))
                    .collect(),
            }],
        };
        pack.add_model("block/cube_all", cube_all);
        pack.add_model("block/cube", BlockModel::default());

        let stone = BlockModel {
            parent: Some("block/cube_all".to_string()),
            textures: [("all".to_string(), "block/stone".to_string())]
                .into_iter()
                .collect(),
            elements: vec![],
        };
        pack.add_model("block/stone", stone);

        pack.add_model(
            "item/generated_thing",
            BlockModel {
                parent: Some("builtin/generated".to_string()),
                ..Default::default()
            },
        );

        pack.add_model(
            "block/loop_a",
            BlockModel {
                parent: Some("block/loop_b".to_string()),
                ..Default::default()
            },
        );
        pack.add_model(
            "block/loop_b",
            BlockModel {
                parent: Some("block/loop_a".to_string()),
                ..Default::default()
            },
        );

        pack
    }

    #[test]
    fn test_resolve_simple_model() {
        let pack = create_test_pack();
        let cache = MeshCache::new();
        let resolver = ModelResolver::new(&pack, &cache);

        let model = resolver.resolve("minecraft:block/cube").unwrap();
        assert!(model.parent.is_none());
    }

    #[test]
    fn test_resolve_with_inheritance() {
        let pack = create_test_pack();
        let cache = MeshCache::new();
        let resolver = ModelResolver::new(&pack, &cache);

        let model = resolver.resolve("block/stone").unwrap();

        assert_eq!(model.elements.len(), 1);
        assert_eq!(model.textures.get("all"), Some(&"block/stone".to_string()));
        assert_eq!(model.resolve_texture("#particle").unwrap(), "block/stone");

        let again = resolver.resolve("minecraft:block/stone").unwrap();
        assert!(Arc::ptr_eq(&model, &again));
        assert_eq!(cache.stats().models, 1);
    }

    #[test]
    fn test_builtin_parent_terminates() {
        let pack = create_test_pack();
        let cache = MeshCache::new();
        let resolver = ModelResolver::new(&pack, &cache);

        let model = resolver.resolve("item/generated_thing").unwrap();
        assert!(model.parent.is_none());
        assert!(!model.has_elements());
    }

    #[test]
    fn test_circular_parents_are_bounded() {
        let pack = create_test_pack();
        let cache = MeshCache::new();
        let resolver = ModelResolver::new(&pack, &cache);

        assert!(matches!(
            resolver.resolve("block/loop_a"),
            Err(MesherError::ModelInheritanceTooDeep(_))
        ));
    }

    #[test]
    fn test_missing_model() {
        let pack = create_test_pack();
        let cache = MeshCache::new();
        let resolver = ModelResolver::new(&pack, &cache);

        assert!(matches!(
            resolver.resolve("minecraft:block/nonexistent"),
            Err(MesherError::ModelResolution(_))
        ));
        assert_eq!(cache.stats().models, 0);
    }
}
