//! # Schematic Geometry
//!
//! A Rust library for turning Minecraft schematics into renderable,
//! material-grouped geometry.
//!
//! ## Overview
//!
//! This library takes a voxel source (a grid of typed, parameterized blocks)
//! and an asset provider (blockstates, models, and textures) as input, and
//! produces per-chunk vertex batches grouped by material, ready for upload
//! by an external renderer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use schematic_geometry::{DirectoryAssets, Mesher, MesherConfig, VoxelGrid};
//!
//! // Point at an unpacked resource pack
//! let assets = DirectoryAssets::open("path/to/pack")?;
//!
//! // Create a mesher
//! let mesher = Mesher::with_config(assets, MesherConfig::default().with_seed(42));
//!
//! // Generate geometry from any VoxelSource
//! let output = mesher.mesh(&my_grid);
//! for batch in output.batches() {
//!     upload(batch.key(), batch.positions_bytes(), batch.indices_bytes());
//! }
//! ```
//!
//! ## Streaming
//!
//! [`Mesher::mesh_chunks`] hands each finished chunk to a sink as soon as
//! it is built and reports progress per chunk. The sink may return
//! [`std::ops::ControlFlow::Break`] to abandon the build, for example when
//! the resource packs change; call [`Mesher::clear_caches`] afterwards.

pub mod cache;
pub mod error;
pub mod material;
pub mod mesh_output;
pub mod mesher;
pub mod resolver;
pub mod resource_pack;
pub mod types;

// Re-export main types for convenience
pub use cache::{CacheStats, MeshCache};
pub use error::{MesherError, Result};
pub use material::{Material, MaterialKey, TintColors};
pub use mesh_output::{BuildReport, ChunkMesh, MeshBatch, MeshOutput};
pub use mesher::{
    BlockClasses, BlockComponent, ChunkCoord, ChunkDimensions, Mesher, MesherConfig,
    OcclusionMask, RotationMode,
};
pub use resolver::{get_block_model_data, BlockModelData, BlockModelOption, ModelSelector};
pub use resource_pack::{
    AssetProvider, BlockModel, BlockStateDefinition, DirectoryAssets, ModelHolder, ResourcePack,
};
pub use types::{Block, BlockPosition, Dimensions, Direction, VoxelGrid, VoxelSource};
