//! Face occlusion between adjacent blocks.
//!
//! A face is hidden only when the neighbor on that side is a full-opacity
//! solid block. Missing neighbors, non-occluding blocks (slabs, torches,
//! plants...) and transparent blocks (glass, leaves, water...) never hide a
//! face. A block that is itself non-occluding or transparent keeps every
//! face.

use crate::resource_pack::canonical_location;
use crate::types::{Block, BlockPosition, Direction, VoxelSource};
use std::borrow::Cow;
use std::collections::HashSet;

/// Block-type classification used by the mesher.
///
/// Ids are stored in canonical `namespace:id` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockClasses {
    /// Never meshed.
    pub invisible: HashSet<String>,
    /// Meshed, but never hide a neighbor's face.
    pub non_occluding: HashSet<String>,
    /// See-through blocks; they also never hide a neighbor's face.
    pub transparent: HashSet<String>,
    /// Id fragments marking partial blocks, unless the id ends in `_block`.
    pub non_occluding_patterns: Vec<String>,
    /// Full blocks whose ids happen to contain a non-occluding pattern.
    pub occluding: HashSet<String>,
}

const DEFAULT_INVISIBLE: &[&str] = &[
    "air", "cave_air", "void_air", "structure_void", "barrier", "light",
];

const DEFAULT_TRANSPARENT: &[&str] = &[
    "glass", "glass_pane", "tinted_glass", "ice", "frosted_ice", "water", "lava",
    "slime_block", "honey_block", "beacon", "spawner",
];

const DEFAULT_NON_OCCLUDING: &[&str] = &[
    "redstone_wire", "chest", "trapped_chest", "ender_chest", "conduit", "end_rod",
    "lightning_rod", "iron_bars", "flower_pot", "dragon_egg", "turtle_egg", "sniffer_egg",
];

const DEFAULT_OCCLUDING: &[&str] = &[
    "sea_lantern", "jack_o_lantern", "mushroom_stem", "bamboo_planks", "bamboo_mosaic",
];

// Partial-block fragments; "grass_block", "mushroom_block" and friends are
// exempted by the `_block` suffix rule.
const DEFAULT_NON_OCCLUDING_PATTERNS: &[&str] = &[
    "slab", "stairs", "fence", "wall", "door", "trapdoor",
    "sign", "banner", "button", "lever", "torch", "lantern",
    "pressure_plate", "carpet", "rail", "flower", "sapling",
    "chain", "candle", "head", "skull", "campfire", "anvil", "bell",
    "brewing_stand", "cauldron", "hopper", "lectern",
    "grindstone", "stonecutter", "enchanting_table",
    "repeater", "comparator", "daylight_detector",
    "piston", "tripwire", "cobweb", "vine",
    "ladder", "scaffolding", "coral_fan", "pickle",
    "dripleaf", "azalea", "roots", "sprouts", "fungus", "mushroom",
    "grass", "fern", "bush", "berry", "wart", "stem", "wheat",
    "carrots", "potatoes", "beetroots", "cocoa", "cactus",
    "sugar_cane", "bamboo", "kelp", "seagrass", "lichen",
    "fire", "snow", "_bed", "poppy", "dandelion", "orchid", "allium", "tulip",
    "oxeye_daisy", "cornflower", "lily_of_the_valley", "wither_rose",
];

fn canonical_set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| canonical_location(id)).collect()
}

/// Canonical `namespace:id` for a block name. Borrows when the name
/// already carries a namespace.
fn canonical_name(name: &str) -> Cow<'_, str> {
    if name.contains(':') {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(canonical_location(name))
    }
}

impl Default for BlockClasses {
    fn default() -> Self {
        Self {
            invisible: canonical_set(DEFAULT_INVISIBLE),
            non_occluding: canonical_set(DEFAULT_NON_OCCLUDING),
            transparent: canonical_set(DEFAULT_TRANSPARENT),
            non_occluding_patterns: DEFAULT_NON_OCCLUDING_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            occluding: canonical_set(DEFAULT_OCCLUDING),
        }
    }
}

impl BlockClasses {
    /// Classes with empty sets and no patterns.
    pub fn empty() -> Self {
        Self {
            invisible: HashSet::new(),
            non_occluding: HashSet::new(),
            transparent: HashSet::new(),
            non_occluding_patterns: Vec::new(),
            occluding: HashSet::new(),
        }
    }

    pub fn with_invisible(mut self, block_id: &str) -> Self {
        self.invisible.insert(canonical_location(block_id));
        self
    }

    pub fn with_non_occluding(mut self, block_id: &str) -> Self {
        self.non_occluding.insert(canonical_location(block_id));
        self
    }

    pub fn with_occluding(mut self, block_id: &str) -> Self {
        self.occluding.insert(canonical_location(block_id));
        self
    }

    pub fn with_transparent(mut self, block_id: &str) -> Self {
        self.transparent.insert(canonical_location(block_id));
        self
    }

    pub fn is_invisible(&self, block: &Block) -> bool {
        self.invisible.contains(canonical_name(&block.name).as_ref())
    }

    pub fn is_transparent(&self, block: &Block) -> bool {
        self.transparent_id(&canonical_name(&block.name), block.block_id())
    }

    pub fn is_non_occluding(&self, block: &Block) -> bool {
        self.non_occluding_id(&canonical_name(&block.name), block.block_id())
    }

    /// Whether this block hides the faces of its neighbors.
    pub fn occludes(&self, block: &Block) -> bool {
        let canonical = canonical_name(&block.name);
        let id = block.block_id();
        !self.invisible.contains(canonical.as_ref())
            && !self.non_occluding_id(&canonical, id)
            && !self.transparent_id(&canonical, id)
    }

    /// Whether a block keeps every face regardless of its neighbors.
    fn keeps_all_faces(&self, block: &Block) -> bool {
        let canonical = canonical_name(&block.name);
        let id = block.block_id();
        self.non_occluding_id(&canonical, id) || self.transparent_id(&canonical, id)
    }

    fn transparent_id(&self, canonical: &str, id: &str) -> bool {
        self.transparent.contains(canonical)
            || id.ends_with("_glass")
            || id.ends_with("_glass_pane")
            || id.ends_with("_leaves")
    }

    fn non_occluding_id(&self, canonical: &str, id: &str) -> bool {
        if self.non_occluding.contains(canonical) {
            return true;
        }
        if self.occluding.contains(canonical) {
            return false;
        }
        if id.ends_with("_block") && !id.contains("piston") {
            return false;
        }
        self.non_occluding_patterns
            .iter()
            .any(|pattern| id.contains(pattern.as_str()))
    }
}

/// Six occlusion bits, one per face.
///
/// Bits are packed in [`Direction::ALL`] order with the first face in the
/// highest bit, so east is `0b100000` and north is `0b000001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OcclusionMask(pub u8);

impl OcclusionMask {
    pub const NONE: OcclusionMask = OcclusionMask(0);
    pub const ALL: OcclusionMask = OcclusionMask(0b11_1111);

    fn bit(direction: Direction) -> u8 {
        1 << (Direction::ALL.len() - 1 - direction.index())
    }

    /// Pack per-face flags, visited in [`Direction::ALL`] order.
    pub fn from_flags(flags: [bool; 6]) -> Self {
        let bits = flags
            .iter()
            .fold(0u8, |acc, &occluded| (acc << 1) | occluded as u8);
        OcclusionMask(bits)
    }

    pub fn is_occluded(&self, direction: Direction) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    pub fn set(&mut self, direction: Direction) {
        self.0 |= Self::bit(direction);
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// Occlusion mask for the block at `pos`.
pub fn occlusion_mask<S: VoxelSource + ?Sized>(
    source: &S,
    pos: BlockPosition,
    block: &Block,
    classes: &BlockClasses,
) -> OcclusionMask {
    if classes.keeps_all_faces(block) {
        return OcclusionMask::NONE;
    }

    let flags = Direction::ALL.map(|direction| {
        source
            .get_block(pos.neighbor(direction))
            .map_or(false, |neighbor| classes.occludes(neighbor))
    });
    OcclusionMask::from_flags(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VoxelGrid;

    #[test]
    fn test_default_classes() {
        let classes = BlockClasses::default();

        assert!(classes.is_invisible(&Block::new("air")));
        assert!(classes.is_invisible(&Block::new("minecraft:cave_air")));
        assert!(!classes.is_invisible(&Block::new("stone")));

        assert!(classes.is_transparent(&Block::new("minecraft:glass")));
        assert!(classes.is_transparent(&Block::new("red_stained_glass")));
        assert!(classes.is_transparent(&Block::new("oak_leaves")));

        assert!(classes.is_non_occluding(&Block::new("oak_slab")));
        assert!(classes.is_non_occluding(&Block::new("minecraft:redstone_wire")));
        assert!(!classes.is_non_occluding(&Block::new("grass_block")));
        assert!(!classes.is_non_occluding(&Block::new("stone")));
        assert!(!classes.is_non_occluding(&Block::new("bedrock")));
        assert!(!classes.is_non_occluding(&Block::new("sea_lantern")));
        assert!(classes.is_non_occluding(&Block::new("lantern")));
        assert!(classes.is_non_occluding(&Block::new("red_bed")));

        assert!(classes.occludes(&Block::new("stone")));
        assert!(!classes.occludes(&Block::new("glass")));
    }

    #[test]
    fn test_custom_classes() {
        let classes = BlockClasses::empty()
            .with_transparent("mymod:crystal")
            .with_non_occluding("oak_slab");
        assert!(classes.is_transparent(&Block::new("mymod:crystal")));
        assert!(classes.is_non_occluding(&Block::new("minecraft:oak_slab")));
        assert!(!classes.is_non_occluding(&Block::new("oak_stairs")));
    }

    #[test]
    fn test_namespaced_names_are_borrowed() {
        assert!(matches!(canonical_name("minecraft:stone"), Cow::Borrowed("minecraft:stone")));
        assert_eq!(canonical_name("stone"), "minecraft:stone");

        let classes = BlockClasses::default();
        for (bare, namespaced) in [("glass", "minecraft:glass"), ("stone", "minecraft:stone"), ("oak_slab", "minecraft:oak_slab")] {
            assert_eq!(
                classes.occludes(&Block::new(bare)),
                classes.occludes(&Block::new(namespaced))
            );
            assert_eq!(
                classes.keeps_all_faces(&Block::new(bare)),
                classes.keeps_all_faces(&Block::new(namespaced))
            );
        }
        assert!(classes.keeps_all_faces(&Block::new("glass")));
        assert!(!classes.keeps_all_faces(&Block::new("minecraft:stone")));
    }

    #[test]
    fn test_mask_bit_order() {
        let mut mask = OcclusionMask::NONE;
        mask.set(Direction::East);
        assert_eq!(mask.bits(), 0b100000);
        mask.set(Direction::North);
        assert_eq!(mask.bits(), 0b100001);
        assert!(mask.is_occluded(Direction::East));
        assert!(!mask.is_occluded(Direction::Up));
        assert_eq!(mask.count(), 2);

        let packed = OcclusionMask::from_flags([true, false, false, false, false, true]);
        assert_eq!(packed, mask);
        assert_eq!(OcclusionMask::from_flags([true; 6]), OcclusionMask::ALL);
    }

    fn surrounded(center: &str, neighbor: &str) -> (VoxelGrid, BlockPosition) {
        let mut grid = VoxelGrid::new(3, 3, 3);
        let pos = BlockPosition::new(1, 1, 1);
        grid.set_block(pos, Block::new(center));
        for direction in Direction::ALL {
            grid.set_block(pos.neighbor(direction), Block::new(neighbor));
        }
        (grid, pos)
    }

    #[test]
    fn test_fully_enclosed_block() {
        let classes = BlockClasses::default();
        let (grid, pos) = surrounded("stone", "stone");
        let block = Block::new("stone");
        assert_eq!(occlusion_mask(&grid, pos, &block, &classes), OcclusionMask::ALL);
    }

    #[test]
    fn test_boundary_block_has_no_occlusion() {
        let classes = BlockClasses::default();
        let mut grid = VoxelGrid::new(1, 1, 1);
        let pos = BlockPosition::new(0, 0, 0);
        grid.set_block(pos, Block::new("stone"));
        assert_eq!(
            occlusion_mask(&grid, pos, &Block::new("stone"), &classes),
            OcclusionMask::NONE
        );
    }

    #[test]
    fn test_transparent_neighbors_and_self() {
        let classes = BlockClasses::default();

        let (grid, pos) = surrounded("stone", "glass");
        assert_eq!(
            occlusion_mask(&grid, pos, &Block::new("stone"), &classes),
            OcclusionMask::NONE
        );

        let (grid, pos) = surrounded("glass", "stone");
        assert_eq!(
            occlusion_mask(&grid, pos, &Block::new("glass"), &classes),
            OcclusionMask::NONE
        );

        let (grid, pos) = surrounded("stone", "air");
        assert_eq!(
            occlusion_mask(&grid, pos, &Block::new("stone"), &classes),
            OcclusionMask::NONE
        );
    }

    #[test]
    fn test_partial_enclosure() {
        let classes = BlockClasses::default();
        let mut grid = VoxelGrid::new(3, 3, 3);
        let pos = BlockPosition::new(1, 1, 1);
        grid.set_block(pos, Block::new("stone"));
        grid.set_block(pos.neighbor(Direction::Up), Block::new("dirt"));
        grid.set_block(pos.neighbor(Direction::West), Block::new("oak_slab"));

        let mask = occlusion_mask(&grid, pos, &Block::new("stone"), &classes);
        assert!(mask.is_occluded(Direction::Up));
        assert!(!mask.is_occluded(Direction::West));
        assert_eq!(mask.count(), 1);
    }
}
