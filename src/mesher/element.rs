//! Convert model elements to per-block geometry components.
//!
//! Geometry is built once per selected model option in render space
//! (-0.5..0.5 around the block center) and cached. Placement rotation and
//! world translation happen later, per placed block.

use crate::material::{MaterialKey, MaterialResolver};
use crate::mesher::rotation::RotationMode;
use crate::resolver::{BlockModelOption, ModelResolver};
use crate::resource_pack::{AssetProvider, BlockModel, ModelElement, ModelFace, ModelHolder};
use crate::types::{Block, Direction};
use glam::{Mat3, Vec3};
use std::collections::BTreeMap;

/// Geometry for one (material, face) pair of a block.
///
/// Flat buffers: three floats per position and normal, two per UV, four
/// vertices per quad.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockComponent {
    pub material: MaterialKey,
    pub face: Direction,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
}

impl BlockComponent {
    pub fn new(material: MaterialKey, face: Direction) -> Self {
        Self {
            material,
            face,
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn quad_count(&self) -> usize {
        self.vertex_count() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) {
        self.positions.extend_from_slice(&position);
        self.normals.extend_from_slice(&normal);
        self.uvs.extend_from_slice(&uv);
    }
}

/// One quad corner: fraction of the element size along each axis, plus the
/// indices into `[u0, v0, u1, v1]` that give its UV.
type Corner = ([f32; 3], [usize; 2]);

/// Corner layout per face. Triangles are (0, 1, 2) and (2, 1, 3), both
/// wound counter-clockwise seen from outside.
fn face_corners(direction: Direction) -> [Corner; 4] {
    match direction {
        Direction::West => [
            ([0.0, 1.0, 0.0], [0, 3]),
            ([0.0, 0.0, 0.0], [0, 1]),
            ([0.0, 1.0, 1.0], [2, 3]),
            ([0.0, 0.0, 1.0], [2, 1]),
        ],
        Direction::East => [
            ([1.0, 1.0, 1.0], [0, 3]),
            ([1.0, 0.0, 1.0], [0, 1]),
            ([1.0, 1.0, 0.0], [2, 3]),
            ([1.0, 0.0, 0.0], [2, 1]),
        ],
        Direction::Down => [
            ([1.0, 0.0, 1.0], [2, 1]),
            ([0.0, 0.0, 1.0], [0, 1]),
            ([1.0, 0.0, 0.0], [2, 3]),
            ([0.0, 0.0, 0.0], [0, 3]),
        ],
        Direction::Up => [
            ([0.0, 1.0, 1.0], [2, 3]),
            ([1.0, 1.0, 1.0], [0, 3]),
            ([0.0, 1.0, 0.0], [2, 1]),
            ([1.0, 1.0, 0.0], [0, 1]),
        ],
        Direction::North => [
            ([1.0, 0.0, 0.0], [0, 1]),
            ([0.0, 0.0, 0.0], [2, 1]),
            ([1.0, 1.0, 0.0], [0, 3]),
            ([0.0, 1.0, 0.0], [2, 3]),
        ],
        Direction::South => [
            ([0.0, 0.0, 1.0], [0, 1]),
            ([1.0, 0.0, 1.0], [2, 1]),
            ([0.0, 1.0, 1.0], [0, 3]),
            ([1.0, 1.0, 1.0], [2, 3]),
        ],
    }
}

/// Builds [`BlockComponent`]s for a selected model option.
pub struct GeometryAssembler<'a, P: AssetProvider + ?Sized> {
    models: ModelResolver<'a, P>,
    materials: &'a MaterialResolver<'a, P>,
    rotation_mode: RotationMode,
}

impl<'a, P: AssetProvider + ?Sized> GeometryAssembler<'a, P> {
    pub fn new(
        models: ModelResolver<'a, P>,
        materials: &'a MaterialResolver<'a, P>,
        rotation_mode: RotationMode,
    ) -> Self {
        Self {
            models,
            materials,
            rotation_mode,
        }
    }

    /// Assemble all components for `option` as drawn for `block`.
    ///
    /// Holders whose model cannot be resolved contribute nothing. The result
    /// is ordered by material key, then face.
    pub fn assemble(&self, block: &Block, option: &BlockModelOption) -> Vec<BlockComponent> {
        let mut components: BTreeMap<(MaterialKey, Direction), BlockComponent> = BTreeMap::new();

        for holder in &option.holders {
            let model = match self.models.resolve(&holder.model_location()) {
                Ok(model) => model,
                Err(e) => {
                    log::warn!("{}: skipping model {}: {}", option.name, holder.model, e);
                    continue;
                }
            };
            self.add_model(&mut components, block, &model, holder);
        }

        components.into_values().collect()
    }

    fn add_model(
        &self,
        components: &mut BTreeMap<(MaterialKey, Direction), BlockComponent>,
        block: &Block,
        model: &BlockModel,
        holder: &ModelHolder,
    ) {
        // Variant mode bakes the holder's x/y rotation into the cached geometry.
        let transform = match self.rotation_mode {
            RotationMode::Variant if !holder.transform().is_identity() => Some(holder.transform()),
            _ => None,
        };

        for element in &model.elements {
            for direction in Direction::ALL {
                let Some(face) = element.faces.get(&direction) else {
                    continue;
                };

                let material = match self.materials.material_key(model, face, block) {
                    Ok(key) => key,
                    Err(e) => {
                        log::warn!("{}: {} face falls back: {}", block.name, direction, e);
                        MaterialKey::fallback()
                    }
                };

                let (face_dir, matrix) = match transform {
                    Some(t) => (direction.rotate_by_transform(t.x, t.y), Some(t.matrix())),
                    None => (direction, None),
                };

                let component = components
                    .entry((material.clone(), face_dir))
                    .or_insert_with(|| BlockComponent::new(material, face_dir));
                add_face(component, element, direction, face, matrix);
            }
        }
    }
}

/// Append the four corners of one element face.
fn add_face(
    component: &mut BlockComponent,
    element: &ModelElement,
    direction: Direction,
    face: &ModelFace,
    transform: Option<Mat3>,
) {
    let from = element.normalized_from();
    let size = element.normalized_size();
    let uv = face.normalized_uv();
    let mut normal = direction.normal();

    if let Some(rotation) = &element.rotation {
        normal = rotation.apply_to_normal(normal);
    }
    if let Some(matrix) = transform {
        normal = (matrix * Vec3::from(normal)).into();
    }

    for (corner, [u_index, v_index]) in face_corners(direction) {
        let mut position = [
            from[0] + size[0] * corner[0],
            from[1] + size[1] * corner[1],
            from[2] + size[2] * corner[2],
        ];
        if let Some(rotation) = &element.rotation {
            position = rotation.apply_to_point(position);
        }
        if let Some(matrix) = transform {
            position = (matrix * Vec3::from(position)).into();
        }

        // The renderer samples with both axes flipped.
        let uv = [1.0 - uv[u_index], 1.0 - uv[v_index]];
        component.push_vertex(position, normal, uv);
    }
}
