//! Texture and material resolution.
//!
//! A face's texture reference is followed through the model's `#name`
//! chain to a literal path, combined with the face rotation and tint into a
//! [`MaterialKey`], and memoized as a [`Material`] in the shared cache.

pub mod tint;

pub use tint::TintColors;

use crate::cache::MeshCache;
use crate::error::Result;
use crate::resource_pack::texture::load_texture_from_bytes;
use crate::resource_pack::{canonical_location, AssetProvider, BlockModel, ModelFace, TextureData};
use crate::types::Block;
use std::fmt;
use std::sync::Arc;

/// Texture used when a face's reference chain cannot be resolved.
pub const FALLBACK_TEXTURE: &str = "block/missing";

/// Identity of a cacheable material.
///
/// Two faces with the same texture, rotation bucket, and tint share one
/// material and one draw batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialKey {
    /// Resolved texture path with the `minecraft:` namespace stripped.
    pub texture: String,
    /// Texture rotation in degrees. `None` stands for 0.
    pub rotation: Option<i32>,
    /// Tint color, if any.
    pub tint: Option<[u8; 3]>,
}

impl MaterialKey {
    pub fn new(texture: &str, rotation: i32, tint: Option<[u8; 3]>) -> Self {
        let texture = texture.strip_prefix("minecraft:").unwrap_or(texture);
        let rotation = match rotation.rem_euclid(360) {
            0 => None,
            degrees => Some(degrees),
        };
        Self {
            texture: texture.to_string(),
            rotation,
            tint,
        }
    }

    /// Key of the fallback material.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_TEXTURE, 0, None)
    }

    pub fn is_fallback(&self) -> bool {
        self.texture == FALLBACK_TEXTURE
    }

    /// Full resource location for fetching the texture bytes.
    pub fn texture_location(&self) -> String {
        canonical_location(&self.texture)
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.texture)?;
        if let Some(rotation) = self.rotation {
            write!(f, "@{}", rotation)?;
        }
        if let Some([r, g, b]) = self.tint {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)?;
        }
        Ok(())
    }
}

/// A resolved material handle.
#[derive(Debug, Clone)]
pub struct Material {
    pub key: MaterialKey,
    pub texture: TextureData,
    /// Needs alpha blending.
    pub transparent: bool,
    /// Built from the placeholder because the real texture was unavailable.
    pub fallback: bool,
}

impl Material {
    /// Placeholder material for a key whose texture could not be loaded.
    pub fn fallback(key: MaterialKey) -> Self {
        Self {
            transparent: is_overlay(&key.texture),
            key,
            texture: TextureData::placeholder(),
            fallback: true,
        }
    }
}

/// Result of a texture fetch. A missing or undecodable asset is not an error.
#[derive(Debug, Clone)]
pub enum TextureLookup {
    Loaded(TextureData),
    Unavailable,
}

fn is_overlay(texture: &str) -> bool {
    texture.contains("overlay")
}

/// Builds material keys for faces and memoizes materials by key.
pub struct MaterialResolver<'a, P: AssetProvider + ?Sized> {
    provider: &'a P,
    cache: &'a MeshCache,
    tints: &'a TintColors,
}

impl<'a, P: AssetProvider + ?Sized> MaterialResolver<'a, P> {
    pub fn new(provider: &'a P, cache: &'a MeshCache, tints: &'a TintColors) -> Self {
        Self {
            provider,
            cache,
            tints,
        }
    }

    /// Key for one face of a model placed as `block`.
    ///
    /// Fails with a texture-resolution error when the `#name` chain is
    /// broken or cyclic.
    pub fn material_key(&self, model: &BlockModel, face: &ModelFace, block: &Block) -> Result<MaterialKey> {
        let texture = model.resolve_texture(&face.texture)?;
        let texture = texture.strip_prefix("minecraft:").unwrap_or(texture.as_str());
        let tint = self.tints.tint_for(texture, face, block);
        Ok(MaterialKey::new(texture, face.rotation, tint))
    }

    /// Memoized material for a key.
    pub fn material(&self, key: &MaterialKey) -> Arc<Material> {
        self.cache.material(key, || self.build(key))
    }

    /// Fetch and decode the texture behind a key.
    pub fn fetch_texture(&self, key: &MaterialKey) -> TextureLookup {
        let location = key.texture_location();
        let Some(bytes) = self.provider.texture_bytes(&location) else {
            return TextureLookup::Unavailable;
        };
        match load_texture_from_bytes(&bytes) {
            Ok(texture) => TextureLookup::Loaded(texture),
            Err(e) => {
                log::warn!("failed to decode texture {}: {}", location, e);
                TextureLookup::Unavailable
            }
        }
    }

    fn build(&self, key: &MaterialKey) -> Material {
        log::debug!("building material {}", key);
        match self.fetch_texture(key) {
            TextureLookup::Loaded(texture) => Material {
                transparent: is_overlay(&key.texture) || texture.has_transparency(),
                key: key.clone(),
                texture,
                fallback: false,
            },
            TextureLookup::Unavailable => {
                if !key.is_fallback() {
                    log::warn!("texture {} unavailable, using placeholder", key.texture);
                }
                Material::fallback(key.clone())
            }
        }
    }
}
