//! Spatial partitioning of a voxel source into fixed-size chunks.

use crate::types::{BlockPosition, Dimensions, VoxelSource};
use std::collections::BTreeMap;

/// Edge lengths of a chunk, in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDimensions {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl ChunkDimensions {
    /// Chunk dimensions, clamping every axis to at least one block.
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self {
            x: x.max(1),
            y: y.max(1),
            z: z.max(1),
        }
    }

    pub fn cube(size: u32) -> Self {
        Self::new(size, size, size)
    }
}

impl Default for ChunkDimensions {
    fn default() -> Self {
        Self::cube(64)
    }
}

/// Chunk coordinate: block coordinate divided by chunk size on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Chunk grid over a voxel domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    pub size: ChunkDimensions,
    /// Number of chunks along each axis (rounded up).
    pub counts: [u32; 3],
}

impl ChunkLayout {
    pub fn new(dimensions: Dimensions, size: ChunkDimensions) -> Self {
        Self {
            size,
            counts: [
                dimensions.width.div_ceil(size.x),
                dimensions.height.div_ceil(size.y),
                dimensions.length.div_ceil(size.z),
            ],
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).product()
    }

    pub fn coord_of(&self, pos: BlockPosition) -> ChunkCoord {
        ChunkCoord {
            x: pos.x.div_euclid(self.size.x as i32),
            y: pos.y.div_euclid(self.size.y as i32),
            z: pos.z.div_euclid(self.size.z as i32),
        }
    }

    /// Row-major linear index: x varies fastest, then y, then z.
    pub fn index(&self, coord: ChunkCoord) -> usize {
        let [cx, cy, _] = self.counts;
        coord.x as usize + coord.y as usize * cx as usize + coord.z as usize * (cx * cy) as usize
    }
}

/// Occupied positions of one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub index: usize,
    pub positions: Vec<BlockPosition>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Result of partitioning a voxel source.
#[derive(Debug, Clone)]
pub struct Partition {
    pub layout: ChunkLayout,
    /// Non-empty chunks in index order.
    pub chunks: Vec<Chunk>,
    /// Positions outside the source's declared dimensions.
    pub out_of_bounds: Vec<BlockPosition>,
}

/// Group every occupied position of `source` into chunks.
///
/// Each in-bounds position lands in exactly one chunk. Positions outside
/// the declared dimensions are reported separately rather than chunked.
pub fn partition<S: VoxelSource + ?Sized>(source: &S, size: ChunkDimensions) -> Partition {
    let dimensions = source.dimensions();
    let layout = ChunkLayout::new(dimensions, size);

    let mut by_index: BTreeMap<usize, Chunk> = BTreeMap::new();
    let mut out_of_bounds = Vec::new();

    for (pos, _) in source.iter_blocks() {
        if !dimensions.contains(pos) {
            out_of_bounds.push(pos);
            continue;
        }
        let coord = layout.coord_of(pos);
        let index = layout.index(coord);
        by_index
            .entry(index)
            .or_insert_with(|| Chunk {
                coord,
                index,
                positions: Vec::new(),
            })
            .positions
            .push(pos);
    }

    let mut chunks: Vec<Chunk> = by_index.into_values().collect();
    for chunk in &mut chunks {
        chunk.positions.sort_unstable();
    }

    Partition {
        layout,
        chunks,
        out_of_bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Block, VoxelGrid};
    use std::collections::HashSet;

    #[test]
    fn test_layout_counts_round_up() {
        let layout = ChunkLayout::new(Dimensions::new(130, 10, 10), ChunkDimensions::default());
        assert_eq!(layout.counts, [3, 1, 1]);
        assert_eq!(layout.chunk_count(), 3);

        let layout = ChunkLayout::new(Dimensions::new(64, 64, 64), ChunkDimensions::default());
        assert_eq!(layout.counts, [1, 1, 1]);
    }

    #[test]
    fn test_row_major_index() {
        let layout = ChunkLayout::new(Dimensions::new(32, 32, 32), ChunkDimensions::cube(16));
        assert_eq!(layout.index(ChunkCoord::new(0, 0, 0)), 0);
        assert_eq!(layout.index(ChunkCoord::new(1, 0, 0)), 1);
        assert_eq!(layout.index(ChunkCoord::new(0, 1, 0)), 2);
        assert_eq!(layout.index(ChunkCoord::new(0, 0, 1)), 4);
        assert_eq!(layout.index(ChunkCoord::new(1, 1, 1)), 7);
        assert_eq!(layout.coord_of(BlockPosition::new(17, 3, 31)), ChunkCoord::new(1, 0, 1));
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        assert_eq!(ChunkDimensions::new(0, 4, 0), ChunkDimensions::new(1, 4, 1));
    }

    #[test]
    fn test_partition_coverage() {
        let mut grid = VoxelGrid::new(130, 10, 10);
        let stone = Block::new("stone");
        grid.fill(BlockPosition::new(0, 0, 0), BlockPosition::new(129, 9, 9), &stone);

        let partition = partition(&grid, ChunkDimensions::default());
        assert_eq!(partition.chunks.len(), 3);
        let xs: Vec<i32> = partition.chunks.iter().map(|c| c.coord.x).collect();
        assert_eq!(xs, vec![0, 1, 2]);
        assert!(partition.out_of_bounds.is_empty());

        let mut seen = HashSet::new();
        for chunk in &partition.chunks {
            for pos in &chunk.positions {
                assert!(seen.insert(*pos), "{:?} appears twice", pos);
            }
        }
        assert_eq!(seen.len(), 130 * 10 * 10);
        assert_eq!(partition.chunks[2].len(), 2 * 10 * 10);
    }

    #[test]
    fn test_empty_chunks_are_omitted() {
        let mut grid = VoxelGrid::new(128, 1, 1);
        grid.set_block(BlockPosition::new(100, 0, 0), Block::new("stone"));

        let partition = partition(&grid, ChunkDimensions::default());
        assert_eq!(partition.chunks.len(), 1);
        assert_eq!(partition.chunks[0].index, 1);
    }
}
