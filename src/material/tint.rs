//! Face tinting for foliage, water, lava, and redstone dust.
//!
//! Tints are chosen by a fixed rule table evaluated in order; the first rule
//! that applies wins:
//!
//! 1. `block/redstone_dust_*` textures take the palette entry for `power`.
//! 2. Faces carrying a `tintindex` take the foliage color.
//! 3. `block/water_*` textures take the water color.
//! 4. `block/lava_*` textures take the lava color.
//! 5. Anything else is untinted.

use crate::resource_pack::ModelFace;
use crate::types::Block;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Tint colors as 8-bit RGB.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TintColors {
    /// Foliage tint for any face with a tint index.
    pub foliage: [u8; 3],
    /// Water tint.
    pub water: [u8; 3],
    /// Lava tint.
    pub lava: [u8; 3],
    /// Redstone dust colors by power level (0-15).
    pub redstone: [[u8; 3]; 16],
}

impl Default for TintColors {
    fn default() -> Self {
        Self {
            foliage: [145, 189, 89],
            water: [36, 57, 214],
            lava: [232, 89, 23],
            redstone: Self::default_redstone_colors(),
        }
    }
}

impl TintColors {
    /// Redstone dust colors from power 0 to 15.
    pub fn default_redstone_colors() -> [[u8; 3]; 16] {
        [
            [75, 0, 0],
            [110, 0, 0],
            [120, 0, 0],
            [130, 0, 0],
            [140, 0, 0],
            [151, 0, 0],
            [160, 0, 0],
            [170, 0, 0],
            [180, 0, 0],
            [190, 0, 0],
            [201, 0, 0],
            [211, 0, 0],
            [214, 0, 0],
            [224, 6, 0],
            [233, 26, 0],
            [244, 48, 0],
        ]
    }

    /// Stable hash of every color, for cache keys.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Redstone color for a power level. Out-of-range levels clamp to 15.
    pub fn redstone_color(&self, power: u8) -> [u8; 3] {
        self.redstone[power.min(15) as usize]
    }

    /// Pick the tint for a face whose texture already resolved to `texture`
    /// (namespace stripped).
    pub fn tint_for(&self, texture: &str, face: &ModelFace, block: &Block) -> Option<[u8; 3]> {
        if texture.starts_with("block/redstone_dust_") {
            let power = block
                .property("power")
                .and_then(|p| p.parse::<u8>().ok())
                .unwrap_or(0);
            return Some(self.redstone_color(power));
        }
        if face.has_tint() {
            return Some(self.foliage);
        }
        if texture.starts_with("block/water_") {
            return Some(self.water);
        }
        if texture.starts_with("block/lava_") {
            return Some(self.lava);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redstone_uses_power() {
        let colors = TintColors::default();
        let face = ModelFace::new("#line");
        let wire = Block::new("minecraft:redstone_wire").with_property("power", "15");

        assert_eq!(
            colors.tint_for("block/redstone_dust_line0", &face, &wire),
            Some([244, 48, 0])
        );

        let unpowered = Block::new("minecraft:redstone_wire");
        assert_eq!(
            colors.tint_for("block/redstone_dust_dot", &face, &unpowered),
            Some([75, 0, 0])
        );
        assert_eq!(colors.redstone_color(200), [244, 48, 0]);
    }

    #[test]
    fn test_redstone_rule_beats_tintindex() {
        let colors = TintColors::default();
        let mut face = ModelFace::new("#line");
        face.tintindex = Some(0);
        let wire = Block::new("redstone_wire").with_property("power", "3");
        assert_eq!(
            colors.tint_for("block/redstone_dust_line1", &face, &wire),
            Some([130, 0, 0])
        );
    }

    #[test]
    fn test_tintindex_and_fluids() {
        let colors = TintColors::default();
        let block = Block::new("minecraft:grass_block");

        let mut tinted = ModelFace::new("#top");
        tinted.tintindex = Some(0);
        assert_eq!(
            colors.tint_for("block/grass_block_top", &tinted, &block),
            Some(colors.foliage)
        );

        let plain = ModelFace::new("#all");
        assert_eq!(colors.tint_for("block/water_still", &plain, &block), Some(colors.water));
        assert_eq!(colors.tint_for("block/lava_flow", &plain, &block), Some(colors.lava));
        assert_eq!(colors.tint_for("block/stone", &plain, &block), None);
    }

    #[test]
    fn test_fingerprint_tracks_colors() {
        let colors = TintColors::default();
        assert_eq!(colors.fingerprint(), TintColors::default().fingerprint());

        let red_foliage = TintColors {
            foliage: [255, 0, 0],
            ..TintColors::default()
        };
        assert_ne!(colors.fingerprint(), red_foliage.fingerprint());
    }
}
