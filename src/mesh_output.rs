//! Canonical mesh output types.
//!
//! A build produces one [`ChunkMesh`] per non-empty chunk. Each chunk holds
//! a [`MeshBatch`] per material, with flat vertex attributes and triangle
//! indices plus zero-copy byte accessors for GPU upload.

use crate::material::{Material, MaterialKey};
use crate::mesher::ChunkCoord;
use std::sync::Arc;

/// Geometry sharing one material within a chunk.
///
/// Buffers are flat: three floats per position and normal, two per UV.
/// Every quad contributes two triangles.
#[derive(Debug, Clone)]
pub struct MeshBatch {
    pub material: Arc<Material>,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshBatch {
    pub fn key(&self) -> &MaterialKey {
        &self.material.key
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw bytes of the positions array. Zero-allocation view.
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the normals array. Zero-allocation view.
    pub fn normals_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw bytes of the UVs array. Zero-allocation view.
    pub fn uvs_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Raw bytes of the indices array. Zero-allocation view.
    pub fn indices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// All batches of one chunk.
#[derive(Debug, Clone)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    /// Row-major chunk index.
    pub index: usize,
    pub batches: Vec<MeshBatch>,
    /// Blocks with resolved geometry.
    pub blocks: usize,
    /// Processing stopped at the per-chunk block cap.
    pub truncated: bool,
}

impl ChunkMesh {
    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(MeshBatch::is_empty)
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(MeshBatch::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.batches.iter().map(MeshBatch::triangle_count).sum()
    }

    pub fn batch(&self, key: &MaterialKey) -> Option<&MeshBatch> {
        self.batches.iter().find(|b| b.key() == key)
    }
}

/// Counters for one build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Chunks handed to the sink.
    pub chunks: usize,
    /// Blocks with resolved geometry, occluded or not.
    pub meshed_blocks: usize,
    /// Blocks with no resolvable geometry.
    pub skipped_blocks: usize,
    /// Positions outside the source's dimensions.
    pub out_of_bounds: usize,
    /// Quads dropped by occlusion.
    pub occluded_faces: usize,
    pub truncated_chunks: usize,
    /// The sink stopped the build early.
    pub cancelled: bool,
}

impl BuildReport {
    pub(crate) fn merge(&mut self, other: &BuildReport) {
        self.chunks += other.chunks;
        self.meshed_blocks += other.meshed_blocks;
        self.skipped_blocks += other.skipped_blocks;
        self.out_of_bounds += other.out_of_bounds;
        self.occluded_faces += other.occluded_faces;
        self.truncated_chunks += other.truncated_chunks;
        self.cancelled |= other.cancelled;
    }
}

/// Output of a full build.
#[derive(Debug, Clone, Default)]
pub struct MeshOutput {
    /// Non-empty chunks in index order.
    pub chunks: Vec<ChunkMesh>,
    pub report: BuildReport,
}

impl MeshOutput {
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(ChunkMesh::is_empty)
    }

    pub fn total_vertices(&self) -> usize {
        self.chunks.iter().map(ChunkMesh::vertex_count).sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.chunks.iter().map(ChunkMesh::triangle_count).sum()
    }

    pub fn batches(&self) -> impl Iterator<Item = &MeshBatch> {
        self.chunks.iter().flat_map(|c| c.batches.iter())
    }

    /// Whether any batch needs alpha blending.
    pub fn has_transparency(&self) -> bool {
        self.batches().any(|b| b.material.transparent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(texture: &str, quads: usize) -> MeshBatch {
        let mut indices = Vec::new();
        for q in 0..quads as u32 {
            let n = q * 4;
            indices.extend_from_slice(&[n, n + 1, n + 2, n + 2, n + 1, n + 3]);
        }
        MeshBatch {
            material: Arc::new(Material::fallback(MaterialKey::new(texture, 0, None))),
            positions: vec![0.0; quads * 12],
            normals: vec![0.0; quads * 12],
            uvs: vec![0.0; quads * 8],
            indices,
        }
    }

    #[test]
    fn test_batch_bytes_zero_alloc() {
        let batch = batch("block/stone", 1);

        assert_eq!(batch.positions_bytes().len(), 48); // 4 vertices * 3 * 4 bytes
        assert_eq!(batch.normals_bytes().len(), 48);
        assert_eq!(batch.uvs_bytes().len(), 32);
        assert_eq!(batch.indices_bytes().len(), 24);
        assert_eq!(batch.vertex_count(), 4);
        assert_eq!(batch.triangle_count(), 2);
    }

    #[test]
    fn test_output_totals() {
        let output = MeshOutput {
            chunks: vec![
                ChunkMesh {
                    coord: ChunkCoord::new(0, 0, 0),
                    index: 0,
                    batches: vec![batch("block/stone", 2), batch("block/glass_overlay", 1)],
                    blocks: 1,
                    truncated: false,
                },
                ChunkMesh {
                    coord: ChunkCoord::new(1, 0, 0),
                    index: 1,
                    batches: vec![batch("block/stone", 3)],
                    blocks: 1,
                    truncated: false,
                },
            ],
            report: BuildReport::default(),
        };

        assert!(!output.is_empty());
        assert_eq!(output.total_vertices(), 24);
        assert_eq!(output.total_triangles(), 12);
        assert!(output.has_transparency());
        assert!(output.chunks[0]
            .batch(&MaterialKey::new("minecraft:block/stone", 0, None))
            .is_some());
    }

    #[test]
    fn test_report_merge() {
        let mut total = BuildReport::default();
        total.merge(&BuildReport {
            chunks: 1,
            meshed_blocks: 10,
            occluded_faces: 4,
            ..Default::default()
        });
        total.merge(&BuildReport {
            chunks: 1,
            truncated_chunks: 1,
            cancelled: true,
            ..Default::default()
        });
        assert_eq!(total.chunks, 2);
        assert_eq!(total.meshed_blocks, 10);
        assert_eq!(total.truncated_chunks, 1);
        assert!(total.cancelled);
    }
}
