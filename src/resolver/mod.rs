//! Block state and model resolution.
//!
//! This module turns a block into the model holders that draw it: the
//! blockstate definition is evaluated into [`BlockModelData`] (pure and
//! deterministic), then a [`ModelSelector`] draws one concrete
//! [`BlockModelOption`] from it. Model inheritance is resolved separately by
//! the [`ModelResolver`].

pub mod model_resolver;
pub mod selector;
pub mod state_resolver;

pub use model_resolver::ModelResolver;
pub use selector::{weighted_index, ModelSelector};
pub use state_resolver::{get_block_model_data, StateResolver};

use crate::resource_pack::{ModelHolder, WeightedOption};

/// Weighted candidates for one models entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCandidates {
    pub options: Vec<WeightedOption>,
}

impl ModelCandidates {
    pub fn total_weight(&self) -> f64 {
        self.options.iter().map(|o| o.weight).sum()
    }
}

/// Resolved model candidates for a block type and variant signature.
///
/// One entry for the selected variant, or one per matching multipart rule
/// in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockModelData {
    /// Canonical signature, `type` or `type[k=v,...]`.
    pub name: String,
    pub models: Vec<ModelCandidates>,
}

impl BlockModelData {
    /// Data for a block that contributes no geometry.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Number of distinct combinations a selector can draw.
    pub fn combination_count(&self) -> usize {
        self.models.iter().map(|m| m.options.len()).product()
    }
}

/// One concrete draw from a [`BlockModelData`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlockModelOption {
    /// Signature plus `-index` for each entry's selected option.
    pub name: String,
    /// One holder per models entry.
    pub holders: Vec<ModelHolder>,
}
