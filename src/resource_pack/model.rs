//! Block model parsing.
//!
//! Block models define the 3D geometry of blocks using cuboid elements.

use crate::error::{MesherError, Result};
use crate::types::{normalize_coord, Direction, ElementRotation};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Full-face UV rectangle in cube space.
pub const DEFAULT_UV: [f32; 4] = [0.0, 0.0, 16.0, 16.0];

/// A parsed block model from models/*.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockModel {
    /// Parent model to inherit from.
    #[serde(default)]
    pub parent: Option<String>,

    /// Texture variable definitions.
    #[serde(default)]
    pub textures: HashMap<String, String>,

    /// Model elements (cuboids).
    #[serde(default)]
    pub elements: Vec<ModelElement>,
}

impl BlockModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the full parent resource location.
    pub fn parent_location(&self) -> Option<String> {
        self.parent.as_ref().map(|p| {
            if p.contains(':') {
                p.clone()
            } else {
                format!("minecraft:{}", p)
            }
        })
    }

    /// Check if this model has its own elements (not inherited).
    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }

    /// Follow `#name` indirection until a literal texture path is reached.
    ///
    /// Fails on a missing key or on a chain that revisits a key.
    pub fn resolve_texture(&self, reference: &str) -> Result<String> {
        let mut current = reference;
        let mut visited: HashSet<&str> = HashSet::new();

        while let Some(key) = current.strip_prefix('#') {
            if !visited.insert(key) {
                return Err(MesherError::TextureCycle(reference.to_string()));
            }
            current = self.textures.get(key).ok_or_else(|| {
                MesherError::UnresolvedTexture(format!("{} (no texture named #{})", reference, key))
            })?;
        }

        Ok(current.to_string())
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelElement {
    /// Minimum corner (0-16 range).
    pub from: [f32; 3],
    /// Maximum corner (0-16 range).
    pub to: [f32; 3],
    /// Optional rotation.
    #[serde(default)]
    pub rotation: Option<ElementRotation>,
    /// Face definitions.
    #[serde(default)]
    pub faces: HashMap<Direction, ModelFace>,
}

impl ModelElement {
    /// Get the size of this element in cube space (0-16).
    pub fn size(&self) -> [f32; 3] {
        [
            self.to[0] - self.from[0],
            self.to[1] - self.from[1],
            self.to[2] - self.from[2],
        ]
    }

    /// `from` in render space (-0.5 to 0.5).
    pub fn normalized_from(&self) -> [f32; 3] {
        self.from.map(normalize_coord)
    }

    /// Element size in render space.
    pub fn normalized_size(&self) -> [f32; 3] {
        self.size().map(|s| s / 16.0)
    }
}

/// A face of a model element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range.
    #[serde(default)]
    pub uv: Option<[f32; 4]>,
    /// Texture reference (e.g., "#side" or "block/stone").
    pub texture: String,
    /// Texture rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub rotation: i32,
    /// Tint index. Any value marks the face as tinted.
    #[serde(default)]
    pub tintindex: Option<i32>,
}

impl ModelFace {
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            uv: None,
            texture: texture.into(),
            rotation: 0,
            tintindex: None,
        }
    }

    /// Get the UV coordinates, defaulting to the full texture.
    pub fn uv_or_default(&self) -> [f32; 4] {
        self.uv.unwrap_or(DEFAULT_UV)
    }

    /// Get normalized UV coordinates (0-1 range).
    pub fn normalized_uv(&self) -> [f32; 4] {
        self.uv_or_default().map(|u| u / 16.0)
    }

    /// Check if this face carries a tint index.
    pub fn has_tint(&self) -> bool {
        self.tintindex.is_some()
    }
}
