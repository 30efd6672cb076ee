//! Per-placement rotation of cached block components.

use super::element::BlockComponent;
use crate::types::{Block, Direction, PlacementRotation};
use glam::{Mat3, Vec3};

/// Which block rotation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Rotate each placed block by its `facing` property.
    #[default]
    Facing,
    /// Bake blockstate holder `x`/`y` rotations into the geometry instead.
    Variant,
}

/// Rotation of one placed block about its center.
///
/// Geometry is in render space, so the block center is the origin and no
/// translation is needed around the rotation.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    rotation: PlacementRotation,
    matrix: Option<Mat3>,
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        rotation: PlacementRotation::IDENTITY,
        matrix: None,
    };

    pub fn new(rotation: PlacementRotation) -> Self {
        let matrix = (!rotation.is_identity()).then(|| rotation.matrix());
        Self { rotation, matrix }
    }

    /// Placement for a block under the given mode.
    pub fn for_block(block: &Block, mode: RotationMode) -> Self {
        match mode {
            RotationMode::Facing => Self::new(PlacementRotation::from_facing(block.property("facing"))),
            RotationMode::Variant => Self::IDENTITY,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix.is_none()
    }

    pub fn rotation(&self) -> PlacementRotation {
        self.rotation
    }

    /// World-space direction of a component face.
    pub fn face(&self, face: Direction) -> Direction {
        if self.is_identity() {
            face
        } else {
            self.rotation.apply_to_direction(face)
        }
    }

    pub fn position(&self, p: [f32; 3]) -> [f32; 3] {
        match self.matrix {
            Some(m) => (m * Vec3::from(p)).into(),
            None => p,
        }
    }

    /// Normals rotate exactly like positions about the center.
    pub fn normal(&self, n: [f32; 3]) -> [f32; 3] {
        self.position(n)
    }
}

/// Rotate a component's positions and normals; UVs are left untouched.
pub fn rotate_component(component: &BlockComponent, placement: &Placement) -> BlockComponent {
    if placement.is_identity() {
        return component.clone();
    }
    BlockComponent {
        material: component.material.clone(),
        face: placement.face(component.face),
        positions: rotate_flat(&component.positions, placement),
        normals: rotate_flat(&component.normals, placement),
        uvs: component.uvs.clone(),
    }
}

fn rotate_flat(values: &[f32], placement: &Placement) -> Vec<f32> {
    values
        .chunks_exact(3)
        .flat_map(|v| placement.position([v[0], v[1], v[2]]))
        .collect()
}
