//! Shared types used throughout the library.

mod direction;
mod transform;

pub use direction::{Axis, Direction};
pub use transform::{normalize_coord, BlockTransform, ElementRotation, PlacementRotation};

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Block properties. Ordered so signatures come out sorted for free.
pub type Properties = BTreeMap<String, String>;

/// A block position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the neighboring position in the given direction.
    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// Extent of a voxel source along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub length: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            width,
            height,
            length,
        }
    }

    pub fn contains(&self, pos: BlockPosition) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && (pos.x as u32) < self.width
            && (pos.y as u32) < self.height
            && (pos.z as u32) < self.length
    }
}

/// A block as read from a voxel source: type id plus property map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    /// Block type, e.g., "minecraft:stone" or "stone".
    pub name: String,
    /// Block properties, e.g., {"facing": "north"}.
    pub properties: Properties,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|s| s.as_str())
    }

    /// Get the namespace (e.g., "minecraft").
    pub fn namespace(&self) -> &str {
        match self.name.split_once(':') {
            Some((namespace, _)) => namespace,
            None => "minecraft",
        }
    }

    /// Get the block ID without namespace (e.g., "stone").
    pub fn block_id(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, id)) => id,
            None => &self.name,
        }
    }

    /// Check if this is an air block.
    pub fn is_air(&self) -> bool {
        matches!(self.block_id(), "air" | "cave_air" | "void_air")
    }

    /// Content signature: `name` or `name[k=v,...]` with sorted keys.
    ///
    /// Two structurally identical blocks always produce the same signature.
    pub fn signature(&self) -> String {
        if self.properties.is_empty() {
            return self.name.clone();
        }
        let props = self
            .properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}[{}]", self.name, props)
    }
}

/// Read-only access to a populated voxel grid.
///
/// The mesher never mutates a source, so occlusion queries across chunk
/// boundaries always see fully populated neighbors.
pub trait VoxelSource {
    /// Get the block at a position, `None` when empty or out of bounds.
    fn get_block(&self, pos: BlockPosition) -> Option<&Block>;

    /// Iterate over all occupied positions.
    fn iter_blocks(&self) -> Box<dyn Iterator<Item = (BlockPosition, &Block)> + '_>;

    /// Extent of the coordinate domain.
    fn dimensions(&self) -> Dimensions;

    /// Distinct type+property combinations present in the source.
    fn block_types(&self) -> Vec<&Block> {
        let mut seen = BTreeSet::new();
        let mut types = Vec::new();
        for (_, block) in self.iter_blocks() {
            if seen.insert(block.signature()) {
                types.push(block);
            }
        }
        types
    }
}

/// In-memory palette-backed voxel source.
#[derive(Debug, Clone, Default)]
pub struct VoxelGrid {
    dimensions: Dimensions,
    palette: Vec<Block>,
    palette_lookup: HashMap<Block, usize>,
    cells: BTreeMap<BlockPosition, usize>,
}

impl VoxelGrid {
    pub fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            dimensions: Dimensions::new(width, height, length),
            ..Default::default()
        }
    }

    /// Place a block. Returns `false` when the position lies outside the grid.
    pub fn set_block(&mut self, pos: BlockPosition, block: Block) -> bool {
        if !self.dimensions.contains(pos) {
            return false;
        }
        let index = match self.palette_lookup.get(&block) {
            Some(&index) => index,
            None => {
                let index = self.palette.len();
                self.palette_lookup.insert(block.clone(), index);
                self.palette.push(block);
                index
            }
        };
        self.cells.insert(pos, index);
        true
    }

    /// Fill an inclusive box with one block.
    pub fn fill(&mut self, min: BlockPosition, max: BlockPosition, block: &Block) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.set_block(BlockPosition::new(x, y, z), block.clone());
                }
            }
        }
    }

    pub fn block_count(&self) -> usize {
        self.cells.len()
    }

    pub fn palette(&self) -> &[Block] {
        &self.palette
    }
}

impl VoxelSource for VoxelGrid {
    fn get_block(&self, pos: BlockPosition) -> Option<&Block> {
        self.cells.get(&pos).map(|&index| &self.palette[index])
    }

    fn iter_blocks(&self) -> Box<dyn Iterator<Item = (BlockPosition, &Block)> + '_> {
        Box::new(
            self.cells
                .iter()
                .map(move |(pos, &index)| (*pos, &self.palette[index])),
        )
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn block_types(&self) -> Vec<&Block> {
        let mut used: Vec<usize> = self.cells.values().copied().collect();
        used.sort_unstable();
        used.dedup();
        used.into_iter().map(|index| &self.palette[index]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_signature_sorted() {
        let block = Block::new("minecraft:oak_stairs")
            .with_property("shape", "straight")
            .with_property("facing", "north")
            .with_property("half", "top");
        assert_eq!(
            block.signature(),
            "minecraft:oak_stairs[facing=north,half=top,shape=straight]"
        );
        assert_eq!(Block::new("stone").signature(), "stone");
    }

    #[test]
    fn test_block_namespace() {
        let block = Block::new("minecraft:stone");
        assert_eq!(block.namespace(), "minecraft");
        assert_eq!(block.block_id(), "stone");

        let bare = Block::new("stone");
        assert_eq!(bare.namespace(), "minecraft");
        assert_eq!(bare.block_id(), "stone");
        assert!(Block::new("cave_air").is_air());
    }

    #[test]
    fn test_grid_bounds_and_palette() {
        let mut grid = VoxelGrid::new(2, 2, 2);
        let stone = Block::new("stone");
        assert!(grid.set_block(BlockPosition::new(0, 0, 0), stone.clone()));
        assert!(grid.set_block(BlockPosition::new(1, 1, 1), stone.clone()));
        assert!(!grid.set_block(BlockPosition::new(2, 0, 0), stone.clone()));
        assert!(!grid.set_block(BlockPosition::new(-1, 0, 0), stone));

        assert_eq!(grid.block_count(), 2);
        assert_eq!(grid.palette().len(), 1);
        assert_eq!(grid.block_types().len(), 1);
        assert!(grid.get_block(BlockPosition::new(0, 1, 0)).is_none());
    }

    #[test]
    fn test_default_block_types_dedup() {
        struct Pair(Vec<(BlockPosition, Block)>);
        impl VoxelSource for Pair {
            fn get_block(&self, pos: BlockPosition) -> Option<&Block> {
                self.0.iter().find(|(p, _)| *p == pos).map(|(_, b)| b)
            }
            fn iter_blocks(&self) -> Box<dyn Iterator<Item = (BlockPosition, &Block)> + '_> {
                Box::new(self.0.iter().map(|(p, b)| (*p, b)))
            }
            fn dimensions(&self) -> Dimensions {
                Dimensions::new(3, 1, 1)
            }
        }

        let source = Pair(vec![
            (BlockPosition::new(0, 0, 0), Block::new("stone")),
            (BlockPosition::new(1, 0, 0), Block::new("stone")),
            (BlockPosition::new(2, 0, 0), Block::new("dirt")),
        ]);
        assert_eq!(source.block_types().len(), 2);
    }
}
