//! Error types for the schematic geometry pipeline.

use thiserror::Error;

/// Result type alias using MesherError.
pub type Result<T> = std::result::Result<T, MesherError>;

/// Main error type for block resolution and mesh assembly.
///
/// None of these abort a build: the mesher logs them, skips the affected
/// face or block, and keeps going.
#[derive(Error, Debug)]
pub enum MesherError {
    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found in the asset provider.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Failed to resolve a block model.
    #[error("Model resolution error: {0}")]
    ModelResolution(String),

    /// Failed to resolve a blockstate.
    #[error("Blockstate resolution error: {0}")]
    BlockstateResolution(String),

    /// Texture reference points at a key the model does not define.
    #[error("Unresolved texture reference: {0}")]
    UnresolvedTexture(String),

    /// Texture reference chain loops back on itself.
    #[error("Texture reference cycle: {0}")]
    TextureCycle(String),

    /// Model inheritance chain too deep (circular reference protection).
    #[error("Model inheritance too deep (possible circular reference): {0}")]
    ModelInheritanceTooDeep(String),
}

impl MesherError {
    /// Whether this error came from following a `#name` texture chain.
    pub fn is_texture_resolution(&self) -> bool {
        matches!(
            self,
            MesherError::UnresolvedTexture(_) | MesherError::TextureCycle(_)
        )
    }
}
