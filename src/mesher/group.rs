//! Per-chunk accumulation of placed block geometry by material.

use super::element::BlockComponent;
use super::face_culler::OcclusionMask;
use super::rotation::Placement;
use crate::material::{Material, MaterialKey};
use crate::mesh_output::MeshBatch;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Concatenated vertex data for one material within a chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialGroup {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MaterialGroup {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append a placed component: rotate, then translate every vertex.
    fn push(&mut self, component: &BlockComponent, placement: &Placement, translation: [f32; 3]) {
        let base = self.vertex_count() as u32;

        for vertex in component.positions.chunks_exact(3) {
            let p = placement.position([vertex[0], vertex[1], vertex[2]]);
            self.positions.extend_from_slice(&[
                p[0] + translation[0],
                p[1] + translation[1],
                p[2] + translation[2],
            ]);
        }
        for normal in component.normals.chunks_exact(3) {
            self.normals
                .extend_from_slice(&placement.normal([normal[0], normal[1], normal[2]]));
        }
        self.uvs.extend_from_slice(&component.uvs);

        for quad in 0..component.quad_count() as u32 {
            let n = base + quad * 4;
            self.indices
                .extend_from_slice(&[n, n + 1, n + 2, n + 2, n + 1, n + 3]);
        }
    }
}

/// Material groups of one chunk, keyed by [`MaterialKey`].
#[derive(Debug, Default)]
pub struct MaterialGroups {
    groups: BTreeMap<MaterialKey, MaterialGroup>,
    occluded_faces: usize,
}

impl MaterialGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one component of a placed block.
    ///
    /// The component is dropped when its world-space face is set in `mask`.
    /// Returns whether any geometry was appended.
    pub fn append(
        &mut self,
        component: &BlockComponent,
        placement: &Placement,
        translation: [f32; 3],
        mask: OcclusionMask,
    ) -> bool {
        if component.is_empty() {
            return false;
        }
        if mask.is_occluded(placement.face(component.face)) {
            self.occluded_faces += component.quad_count();
            return false;
        }

        self.groups
            .entry(component.material.clone())
            .or_default()
            .push(component, placement, translation);
        true
    }

    pub fn get(&self, key: &MaterialKey) -> Option<&MaterialGroup> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Quads skipped because their face was occluded.
    pub fn occluded_faces(&self) -> usize {
        self.occluded_faces
    }

    pub fn vertex_count(&self) -> usize {
        self.groups.values().map(MaterialGroup::vertex_count).sum()
    }

    /// Hand the groups over as renderer batches, in material-key order.
    pub fn into_batches<F>(self, mut material: F) -> Vec<MeshBatch>
    where
        F: FnMut(&MaterialKey) -> Arc<Material>,
    {
        self.groups
            .into_iter()
            .filter(|(_, group)| !group.is_empty())
            .map(|(key, group)| MeshBatch {
                material: material(&key),
                positions: group.positions,
                normals: group.normals,
                uvs: group.uvs,
                indices: group.indices,
            })
            .collect()
    }
}
