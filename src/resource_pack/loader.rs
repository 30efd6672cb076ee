//! Asset loading from an unpacked resource-pack directory.

use super::{parse_resource_location, AssetProvider, BlockModel, BlockStateDefinition};
use crate::error::{MesherError, Result};
use std::path::{Path, PathBuf};

/// Lazily reads `assets/<namespace>/{blockstates,models,textures}` from disk.
///
/// Nothing is read up front; each lookup touches exactly one file.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Open a resource-pack directory. Fails if it has no `assets` folder.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !root.join("assets").is_dir() {
            return Err(MesherError::ResourceNotFound(format!(
                "no assets directory in {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of an asset file: assets/{namespace}/{kind}/{path}.{extension}
    fn asset_path(&self, kind: &str, location: &str, extension: &str) -> PathBuf {
        let (namespace, path) = parse_resource_location(location);
        self.root
            .join("assets")
            .join(namespace)
            .join(kind)
            .join(format!("{}.{}", path, extension))
    }

    fn read_json(&self, kind: &str, location: &str) -> Result<String> {
        let path = self.asset_path(kind, location, "json");
        if !path.is_file() {
            return Err(MesherError::ResourceNotFound(format!(
                "{} {}",
                kind.trim_end_matches('s'),
                location
            )));
        }
        Ok(std::fs::read_to_string(path)?)
    }
}

impl AssetProvider for DirectoryAssets {
    fn blockstate(&self, block_id: &str) -> Result<BlockStateDefinition> {
        let contents = self.read_json("blockstates", block_id)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn model(&self, location: &str) -> Result<BlockModel> {
        let contents = self.read_json("models", location)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn texture_bytes(&self, location: &str) -> Option<Vec<u8>> {
        let path = self.asset_path("textures", location, "png");
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::debug!("texture {} unavailable at {}: {}", location, path.display(), e);
                None
            }
        }
    }
}
