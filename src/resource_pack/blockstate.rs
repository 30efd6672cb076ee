//! Blockstate definition parsing.
//!
//! Blockstates define how block properties map to model holders.
//! There are two formats: "variants" and "multipart". A definition never
//! carries both.

use crate::types::{BlockTransform, Properties};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A blockstate definition from blockstates/*.json.
#[derive(Debug, Clone)]
pub enum BlockStateDefinition {
    /// Property combinations map to model sets.
    Variants(VariantTable),
    /// Ordered conditional rules, each contributing geometry independently.
    Multipart(Vec<MultipartRule>),
}

impl<'de> Deserialize<'de> for BlockStateDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // serde_json::Map keeps declaration order, which decides the
        // variant property names.
        #[derive(Deserialize)]
        struct RawBlockstate {
            variants: Option<serde_json::Map<String, serde_json::Value>>,
            multipart: Option<Vec<MultipartRule>>,
        }

        let raw = RawBlockstate::deserialize(deserializer)?;

        match (raw.variants, raw.multipart) {
            (Some(_), Some(_)) => Err(D::Error::custom(
                "blockstate defines both variants and multipart",
            )),
            (Some(variants), None) => {
                let mut entries = Vec::with_capacity(variants.len());
                for (key, value) in variants {
                    let set: ModelSet = serde_json::from_value(value).map_err(D::Error::custom)?;
                    entries.push((key, set));
                }
                Ok(BlockStateDefinition::Variants(VariantTable::new(entries)))
            }
            (None, Some(multipart)) => Ok(BlockStateDefinition::Multipart(multipart)),
            (None, None) => Ok(BlockStateDefinition::Variants(VariantTable::default())),
        }
    }
}

/// Variant entries plus the property names taken from the first declared key.
#[derive(Debug, Clone, Default)]
pub struct VariantTable {
    entries: HashMap<String, ModelSet>,
    property_names: BTreeSet<String>,
}

impl VariantTable {
    /// Build a table from entries in declaration order.
    ///
    /// Keys are normalized to sorted `k=v` order so lookups do not depend on
    /// how the pack author ordered them.
    pub fn new(entries: Vec<(String, ModelSet)>) -> Self {
        let property_names = entries
            .first()
            .map(|(key, _)| {
                key.split(',')
                    .filter(|pair| !pair.is_empty())
                    .map(|pair| property_name(pair).to_string())
                    .collect()
            })
            .unwrap_or_default();

        let entries = entries
            .into_iter()
            .map(|(key, set)| (normalize_variant_key(&key), set))
            .collect();

        Self {
            entries,
            property_names,
        }
    }

    pub fn get(&self, signature: &str) -> Option<&ModelSet> {
        self.entries.get(signature)
    }

    /// The `""` entry used by single-state blocks.
    pub fn default_entry(&self) -> Option<&ModelSet> {
        self.entries.get("")
    }

    /// Property names that take part in variant signatures.
    pub fn property_names(&self) -> &BTreeSet<String> {
        &self.property_names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sort the `k=v` pairs of a variant key by property name, the same order
/// [`variant_signature`] produces.
pub fn normalize_variant_key(key: &str) -> String {
    let mut pairs: Vec<&str> = key.split(',').filter(|p| !p.is_empty()).collect();
    pairs.sort_by(|a, b| property_name(a).cmp(property_name(b)));
    pairs.join(",")
}

fn property_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(name, _)| name)
}

/// Build a variant signature from block properties.
///
/// Only properties named in `names` take part; `None` keeps all of them.
/// Keys come out sorted and joined as `k=v,k=v`.
pub fn variant_signature(properties: &Properties, names: Option<&BTreeSet<String>>) -> String {
    properties
        .iter()
        .filter(|(key, _)| names.map_or(true, |names| names.contains(*key)))
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}

/// A model reference with optional rotation and weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelHolder {
    /// Model resource location (e.g., "block/stone" or "minecraft:block/stone").
    pub model: String,
    /// X rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub y: i32,
    /// If true, UV coordinates don't rotate with the block.
    #[serde(default)]
    pub uvlock: bool,
    /// Weight for random selection (default 1).
    #[serde(default)]
    pub weight: Option<f64>,
}

impl ModelHolder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            x: 0,
            y: 0,
            uvlock: false,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Get the full resource location for the model.
    pub fn model_location(&self) -> String {
        if self.model.contains(':') {
            self.model.clone()
        } else {
            format!("minecraft:{}", self.model)
        }
    }

    pub fn transform(&self) -> BlockTransform {
        BlockTransform::new(self.x, self.y)
    }
}

/// A single holder or a weighted list, normalized once at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSet {
    Single(ModelHolder),
    Weighted(Vec<ModelHolder>),
}

/// One candidate in a weighted draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedOption {
    pub holder: ModelHolder,
    pub weight: f64,
}

impl ModelSet {
    /// Uniform weighted-option view. A lone holder always weighs 1.
    pub fn options(&self) -> Vec<WeightedOption> {
        match self {
            ModelSet::Single(holder) => vec![WeightedOption {
                holder: holder.clone(),
                weight: 1.0,
            }],
            ModelSet::Weighted(holders) => holders
                .iter()
                .map(|holder| WeightedOption {
                    holder: holder.clone(),
                    weight: holder.weight.unwrap_or(1.0),
                })
                .collect(),
        }
    }

    pub fn holders(&self) -> Vec<&ModelHolder> {
        match self {
            ModelSet::Single(holder) => vec![holder],
            ModelSet::Weighted(holders) => holders.iter().collect(),
        }
    }
}

/// A multipart rule with optional condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipartRule {
    /// Condition for when this rule applies. Absent means always.
    #[serde(default)]
    pub when: Option<Filter>,
    /// Model(s) to apply when the condition passes.
    pub apply: ModelSet,
}

/// Multipart condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    /// Passes if any sub-filter passes.
    Or {
        #[serde(rename = "OR")]
        or: Vec<Filter>,
    },
    /// Passes if every sub-filter passes.
    And {
        #[serde(rename = "AND")]
        and: Vec<Filter>,
    },
    /// Every named property must hold one of the `|`-separated values.
    Properties(#[serde(deserialize_with = "deserialize_property_values")] BTreeMap<String, String>),
}

impl Filter {
    /// Check the filter against a block's properties.
    ///
    /// A property the block lacks is never a member of the allowed set.
    pub fn matches(&self, properties: &Properties) -> bool {
        match self {
            Filter::Or { or } => or.iter().any(|f| f.matches(properties)),
            Filter::And { and } => and.iter().all(|f| f.matches(properties)),
            Filter::Properties(conditions) => conditions.iter().all(|(key, allowed)| {
                properties
                    .get(key)
                    .map(|value| allowed.split('|').any(|a| a == value))
                    .unwrap_or(false)
            }),
        }
    }
}

/// Pack authors sometimes write `"powered": true` instead of `"true"`.
fn deserialize_property_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    return Err(D::Error::custom(format!(
                        "unsupported filter value for {}: {}",
                        key, other
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}
