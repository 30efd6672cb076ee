//! Mesh generation from voxel sources.
//!
//! The [`Mesher`] walks a voxel source chunk by chunk. For every visible
//! block it resolves model data, draws a concrete model option, fetches the
//! cached geometry for that option, rotates it for the placed block, drops
//! occluded faces, and folds the rest into per-material batches.

pub mod chunk;
pub mod element;
pub mod face_culler;
pub mod group;
pub mod rotation;

pub use chunk::{partition, Chunk, ChunkCoord, ChunkDimensions, ChunkLayout, Partition};
pub use element::{BlockComponent, GeometryAssembler};
pub use face_culler::{occlusion_mask, BlockClasses, OcclusionMask};
pub use group::{MaterialGroup, MaterialGroups};
pub use rotation::{rotate_component, Placement, RotationMode};

use crate::cache::MeshCache;
use crate::material::{MaterialResolver, TintColors};
use crate::mesh_output::{BuildReport, ChunkMesh, MeshOutput};
use crate::resolver::{BlockModelData, ModelResolver, ModelSelector, StateResolver};
use crate::resource_pack::AssetProvider;
use crate::types::{Block, VoxelSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Safety cap on blocks processed per chunk.
pub const DEFAULT_MAX_BLOCKS_PER_CHUNK: usize = 1_000_000;

/// Main mesher configuration.
#[derive(Debug, Clone)]
pub struct MesherConfig {
    /// Chunk edge lengths in blocks.
    pub chunk_size: ChunkDimensions,
    /// Blocks past this count in one chunk are dropped and the chunk is
    /// flagged as truncated.
    pub max_blocks_per_chunk: usize,
    /// Added to every vertex position.
    pub offset: [f32; 3],
    /// Drop faces hidden by opaque neighbors.
    pub cull_hidden_faces: bool,
    pub block_classes: BlockClasses,
    pub tint_colors: TintColors,
    pub rotation_mode: RotationMode,
    /// Seed for model option selection. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Build chunks on the rayon thread pool.
    pub parallel: bool,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            chunk_size: ChunkDimensions::default(),
            max_blocks_per_chunk: DEFAULT_MAX_BLOCKS_PER_CHUNK,
            offset: [0.0; 3],
            cull_hidden_faces: true,
            block_classes: BlockClasses::default(),
            tint_colors: TintColors::default(),
            rotation_mode: RotationMode::default(),
            seed: None,
            parallel: false,
        }
    }
}

impl MesherConfig {
    pub fn with_chunk_size(mut self, size: ChunkDimensions) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_max_blocks_per_chunk(mut self, max: usize) -> Self {
        self.max_blocks_per_chunk = max;
        self
    }

    pub fn with_offset(mut self, offset: [f32; 3]) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_face_culling(mut self, enabled: bool) -> Self {
        self.cull_hidden_faces = enabled;
        self
    }

    pub fn with_block_classes(mut self, classes: BlockClasses) -> Self {
        self.block_classes = classes;
        self
    }

    /// Create config with custom tint colors.
    pub fn with_tint_colors(mut self, colors: TintColors) -> Self {
        self.tint_colors = colors;
        self
    }

    pub fn with_rotation_mode(mut self, mode: RotationMode) -> Self {
        self.rotation_mode = mode;
        self
    }

    /// Make option selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

fn component_tag(config: &MesherConfig) -> String {
    let tints = config.tint_colors.fingerprint();
    match config.rotation_mode {
        RotationMode::Facing => format!("#{:016x}", tints),
        RotationMode::Variant => format!("@variant#{:016x}", tints),
    }
}

/// The main mesher struct.
///
/// Owns an asset provider and shares a [`MeshCache`] that outlives single
/// builds. Call [`Mesher::clear_caches`] when the provider's data changes.
pub struct Mesher<P: AssetProvider> {
    assets: P,
    cache: Arc<MeshCache>,
    config: MesherConfig,
    /// Component key suffix for settings baked into cached geometry.
    component_tag: String,
}

impl<P: AssetProvider> Mesher<P> {
    /// Create a new mesher with default configuration.
    pub fn new(assets: P) -> Self {
        Self::with_config(assets, MesherConfig::default())
    }

    /// Create a new mesher with custom configuration.
    pub fn with_config(assets: P, config: MesherConfig) -> Self {
        let component_tag = component_tag(&config);
        Self {
            assets,
            cache: Arc::new(MeshCache::new()),
            config,
            component_tag,
        }
    }

    /// Use a cache shared with other meshers over the same assets.
    ///
    /// Meshers with different tint colors or rotation modes can share one
    /// cache; their components are stored under separate keys.
    pub fn with_cache(mut self, cache: Arc<MeshCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn assets(&self) -> &P {
        &self.assets
    }

    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<MeshCache> {
        &self.cache
    }

    /// Wipe blockstate, model, material, and component caches.
    pub fn clear_caches(&self) {
        self.cache.clear();
    }

    /// Resolved model data for a block, cached by block signature.
    pub fn block_model_data(&self, block: &Block) -> Arc<BlockModelData> {
        StateResolver::new(&self.assets, &self.cache).resolve(block)
    }

    /// Unrotated geometry for one freshly drawn model option of `block`.
    ///
    /// Components are cached by the drawn option's name, so every block
    /// that lands on the same combination shares one geometry list. The key
    /// also carries the tint colors and rotation mode baked into it.
    pub fn block_components<R: Rng>(
        &self,
        block: &Block,
        selector: &mut ModelSelector<R>,
    ) -> Arc<Vec<BlockComponent>> {
        let data = self.block_model_data(block);
        if data.is_empty() {
            return Arc::new(Vec::new());
        }
        let option = selector.select(&data);

        let key = format!("{}{}", option.name, self.component_tag);
        self.cache.components(&key, || {
            let materials = MaterialResolver::new(&self.assets, &self.cache, &self.config.tint_colors);
            let assembler = GeometryAssembler::new(
                ModelResolver::new(&self.assets, &self.cache),
                &materials,
                self.config.rotation_mode,
            );
            assembler.assemble(block, &option)
        })
    }

    /// Resolve model data for every distinct block type in `source`.
    ///
    /// Returns how many visible block types have geometry.
    pub fn preload<S: VoxelSource + ?Sized>(&self, source: &S) -> usize {
        source
            .block_types()
            .into_iter()
            .filter(|block| !self.config.block_classes.is_invisible(block))
            .filter(|block| !self.block_model_data(block).is_empty())
            .count()
    }

    /// Build every chunk and collect the results.
    pub fn mesh<S: VoxelSource + Sync + ?Sized>(&self, source: &S) -> MeshOutput {
        let mut chunks = Vec::new();
        let report = self.mesh_chunks(
            source,
            |_, _| {},
            |chunk| {
                chunks.push(chunk);
                ControlFlow::Continue(())
            },
        );
        MeshOutput { chunks, report }
    }

    /// Build chunks in index order, handing each finished chunk to `sink`.
    ///
    /// `progress` is called once per chunk with the completed fraction and
    /// a message. Returning [`ControlFlow::Break`] from `sink` abandons the
    /// build before the next chunk starts; chunks already delivered stay
    /// valid.
    pub fn mesh_chunks<S, F, G>(&self, source: &S, mut progress: F, mut sink: G) -> BuildReport
    where
        S: VoxelSource + Sync + ?Sized,
        F: FnMut(f32, &str),
        G: FnMut(ChunkMesh) -> ControlFlow<()>,
    {
        let partition = partition(source, self.config.chunk_size);
        let total = partition.chunks.len();

        let mut report = BuildReport {
            out_of_bounds: partition.out_of_bounds.len(),
            ..Default::default()
        };
        if report.out_of_bounds > 0 {
            log::warn!(
                "{} blocks lie outside the source dimensions and were skipped",
                report.out_of_bounds
            );
        }

        // Parallel builds run one wave of chunks per pool thread, so a
        // break from the sink still stops work between waves.
        let wave = if self.config.parallel {
            rayon::current_num_threads().max(1)
        } else {
            1
        };

        let mut done = 0;
        'waves: for batch in partition.chunks.chunks(wave) {
            let built: Vec<(ChunkMesh, BuildReport)> = if batch.len() > 1 {
                batch
                    .par_iter()
                    .map(|chunk| self.process_chunk(source, chunk))
                    .collect()
            } else {
                batch
                    .iter()
                    .map(|chunk| self.process_chunk(source, chunk))
                    .collect()
            };

            for (mesh, chunk_report) in built {
                progress(
                    done as f32 / total as f32,
                    &format!("Processing chunk {} of {}", done + 1, total),
                );
                done += 1;
                report.merge(&chunk_report);

                if sink(mesh).is_break() {
                    report.cancelled = true;
                    log::debug!("mesh build cancelled after {} of {} chunks", done, total);
                    break 'waves;
                }
            }
        }

        if !report.cancelled {
            progress(1.0, "Mesh build complete");
        }
        report
    }

    fn chunk_rng(&self, index: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => StdRng::from_entropy(),
        }
    }

    fn process_chunk<S: VoxelSource + ?Sized>(&self, source: &S, chunk: &Chunk) -> (ChunkMesh, BuildReport) {
        let classes = &self.config.block_classes;
        let mode = self.config.rotation_mode;
        let offset = self.config.offset;
        let mut selector = ModelSelector::new(self.chunk_rng(chunk.index));

        let mut groups = MaterialGroups::new();
        let mut report = BuildReport {
            chunks: 1,
            ..Default::default()
        };

        let truncated = chunk.len() > self.config.max_blocks_per_chunk;
        if truncated {
            report.truncated_chunks = 1;
            log::warn!(
                "chunk {} holds {} blocks, only the first {} are meshed",
                chunk.index,
                chunk.len(),
                self.config.max_blocks_per_chunk
            );
        }

        for &pos in chunk.positions.iter().take(self.config.max_blocks_per_chunk) {
            let Some(block) = source.get_block(pos) else {
                continue;
            };
            if classes.is_invisible(block) {
                continue;
            }

            let components = self.block_components(block, &mut selector);
            if components.is_empty() {
                report.skipped_blocks += 1;
                continue;
            }
            report.meshed_blocks += 1;

            let placement = Placement::for_block(block, mode);
            let mask = if self.config.cull_hidden_faces {
                occlusion_mask(source, pos, block, classes)
            } else {
                OcclusionMask::NONE
            };
            let translation = [
                pos.x as f32 + offset[0],
                pos.y as f32 + offset[1],
                pos.z as f32 + offset[2],
            ];

            for component in components.iter() {
                groups.append(component, &placement, translation, mask);
            }
        }

        report.occluded_faces = groups.occluded_faces();
        log::debug!(
            "chunk {} {:?}: {} blocks, {} materials, {} vertices, {} occluded faces",
            chunk.index,
            chunk.coord,
            report.meshed_blocks,
            groups.len(),
            groups.vertex_count(),
            report.occluded_faces
        );

        let materials = MaterialResolver::new(&self.assets, &self.cache, &self.config.tint_colors);
        let mesh = ChunkMesh {
            coord: chunk.coord,
            index: chunk.index,
            batches: groups.into_batches(|key| materials.material(key)),
            blocks: report.meshed_blocks,
            truncated,
        };
        (mesh, report)
    }
}
