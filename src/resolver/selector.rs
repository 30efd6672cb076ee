//! Weighted random selection of concrete model options.

use super::{BlockModelData, BlockModelOption};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Index of the first option whose cumulative weight exceeds `draw`.
///
/// Falls back to the last index when rounding pushes `draw` past the total.
/// Returns 0 for an empty list.
pub fn weighted_index<I>(weights: I, draw: f64) -> usize
where
    I: IntoIterator<Item = f64>,
{
    let mut cumulative = 0.0;
    let mut last = 0;
    for (index, weight) in weights.into_iter().enumerate() {
        cumulative += weight;
        if draw < cumulative {
            return index;
        }
        last = index;
    }
    last
}

/// Draws one option per models entry from an injectable RNG.
///
/// Selection is never cached; each call is a fresh draw.
#[derive(Debug, Clone)]
pub struct ModelSelector<R: Rng = StdRng> {
    rng: R,
}

impl ModelSelector<StdRng> {
    /// Reproducible selector.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> ModelSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Pick one holder per models entry.
    pub fn select(&mut self, data: &BlockModelData) -> BlockModelOption {
        let mut name = data.name.clone();
        let mut holders = Vec::with_capacity(data.models.len());

        for candidates in &data.models {
            let total = candidates.total_weight();
            let draw = self.rng.gen::<f64>() * total;
            let index = weighted_index(candidates.options.iter().map(|o| o.weight), draw);

            name.push('-');
            name.push_str(&index.to_string());
            if let Some(option) = candidates.options.get(index) {
                holders.push(option.holder.clone());
            }
        }

        BlockModelOption { name, holders }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ModelCandidates;
    use crate::resource_pack::{ModelHolder, WeightedOption};

    fn data(entries: &[&[f64]]) -> BlockModelData {
        BlockModelData {
            name: "minecraft:test".to_string(),
            models: entries
                .iter()
                .map(|weights| ModelCandidates {
                    options: weights
                        .iter()
                        .enumerate()
                        .map(|(i, w)| WeightedOption {
                            holder: ModelHolder::new(format!("block/m{}", i)).with_weight(*w),
                            weight: *w,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_weighted_index() {
        assert_eq!(weighted_index([1.0, 3.0], 0.0), 0);
        assert_eq!(weighted_index([1.0, 3.0], 0.999), 0);
        assert_eq!(weighted_index([1.0, 3.0], 1.0), 1);
        assert_eq!(weighted_index([1.0, 3.0], 3.999), 1);
        // Overshoot falls back to the last index.
        assert_eq!(weighted_index([1.0, 3.0], 4.0), 1);
        assert_eq!(weighted_index([0.0, 2.0], 0.0), 1);
        assert_eq!(weighted_index(std::iter::empty(), 0.5), 0);
    }

    #[test]
    fn test_weighted_distribution() {
        let data = data(&[&[1.0, 3.0]]);
        let mut selector = ModelSelector::seeded(42);

        let n = 100_000;
        let second = (0..n)
            .filter(|_| selector.select(&data).holders[0].model == "block/m1")
            .count();
        let frequency = second as f64 / n as f64;
        assert!((frequency - 0.75).abs() < 0.01, "frequency was {}", frequency);
    }

    #[test]
    fn test_option_name_encodes_choices() {
        let data = data(&[&[1.0], &[0.0, 1.0], &[1.0]]);
        let mut selector = ModelSelector::seeded(7);
        let option = selector.select(&data);

        assert_eq!(option.name, "minecraft:test-0-1-0");
        assert_eq!(option.holders.len(), 3);
        assert_eq!(option.holders[1].model, "block/m1");
    }

    #[test]
    fn test_seeded_selectors_agree() {
        let data = data(&[&[1.0, 1.0, 1.0, 1.0], &[2.0, 5.0]]);
        let mut a = ModelSelector::seeded(99);
        let mut b = ModelSelector::seeded(99);
        for _ in 0..50 {
            assert_eq!(a.select(&data), b.select(&data));
        }
    }

    #[test]
    fn test_empty_data_keeps_name() {
        let mut selector = ModelSelector::seeded(1);
        let option = selector.select(&BlockModelData::empty("minecraft:air"));
        assert_eq!(option.name, "minecraft:air");
        assert!(option.holders.is_empty());
    }
}
