//! Transform types for block placement and element rotations.

use super::{Axis, Direction};
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Convert a cube-space coordinate (0..16) to render space (-0.5..0.5).
pub fn normalize_coord(value: f32) -> f32 {
    value / 16.0 - 0.5
}

/// Block-level transform from a blockstate holder's `x`/`y` fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockTransform {
    /// X rotation in degrees (0, 90, 180, 270).
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    pub y: i32,
}

impl BlockTransform {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this is an identity transform (no rotation).
    pub fn is_identity(&self) -> bool {
        self.x.rem_euclid(360) == 0 && self.y.rem_euclid(360) == 0
    }

    /// Rotation matrix for this transform.
    ///
    /// Blockstate rotations are clockwise (from above for Y, from +X for X)
    /// while glam follows the right-hand rule, hence the negated angles.
    pub fn matrix(&self) -> Mat3 {
        let x_rot = Mat3::from_rotation_x((-self.x as f32).to_radians());
        let y_rot = Mat3::from_rotation_y((-self.y as f32).to_radians());
        y_rot * x_rot
    }
}

/// Element-level rotation from a model element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRotation {
    /// Origin point for rotation (in 0-16 cube space).
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees (-45 to 45, in 22.5 increments).
    pub angle: f32,
    /// Whether to rescale the element after rotation.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}

impl ElementRotation {
    /// Origin converted from cube space to render space.
    pub fn normalized_origin(&self) -> [f32; 3] {
        self.origin.map(normalize_coord)
    }

    /// Get the angle in radians.
    pub fn angle_radians(&self) -> f32 {
        self.angle.to_radians()
    }

    /// Scale applied to the two non-axis components when `rescale` is set.
    pub fn rescale_factor(&self) -> f32 {
        if self.rescale {
            1.0 / self.angle_radians().cos()
        } else {
            1.0
        }
    }

    /// Rotate a render-space point about the normalized origin.
    pub fn apply_to_point(&self, point: [f32; 3]) -> [f32; 3] {
        let origin = Vec3::from(self.normalized_origin());
        let rotated = self.matrix() * (Vec3::from(point) - origin);
        let scaled = self.rescale(rotated);
        (scaled + origin).into()
    }

    /// Rotate a direction vector (no translation, no rescale).
    pub fn apply_to_normal(&self, normal: [f32; 3]) -> [f32; 3] {
        (self.matrix() * Vec3::from(normal)).into()
    }

    fn matrix(&self) -> Mat3 {
        let angle = self.angle_radians();
        match self.axis {
            Axis::X => Mat3::from_rotation_x(angle),
            Axis::Y => Mat3::from_rotation_y(angle),
            Axis::Z => Mat3::from_rotation_z(angle),
        }
    }

    fn rescale(&self, v: Vec3) -> Vec3 {
        let s = self.rescale_factor();
        if s == 1.0 {
            return v;
        }
        match self.axis {
            Axis::X => Vec3::new(v.x, v.y * s, v.z * s),
            Axis::Y => Vec3::new(v.x * s, v.y, v.z * s),
            Axis::Z => Vec3::new(v.x * s, v.y * s, v.z),
        }
    }
}

/// Placement rotation derived from a block's `facing` property.
///
/// Applied per placed block around the block center, never cached by the
/// rotated result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRotation {
    pub axis: Axis,
    /// Angle in degrees, right-hand rule about `axis`.
    pub angle: f32,
}

impl PlacementRotation {
    pub const IDENTITY: PlacementRotation = PlacementRotation {
        axis: Axis::Y,
        angle: 0.0,
    };

    /// Look up the rotation for a `facing` value. Unknown or missing values
    /// map to the identity.
    pub fn from_facing(facing: Option<&str>) -> Self {
        let (axis, angle) = match facing.and_then(Direction::from_str) {
            Some(Direction::North) => (Axis::Y, 180.0),
            Some(Direction::South) => (Axis::Y, 0.0),
            Some(Direction::East) => (Axis::Y, 90.0),
            Some(Direction::West) => (Axis::Y, 270.0),
            Some(Direction::Up) => (Axis::X, 270.0),
            Some(Direction::Down) => (Axis::X, 90.0),
            None => return Self::IDENTITY,
        };
        Self { axis, angle }
    }

    pub fn is_identity(&self) -> bool {
        self.angle.rem_euclid(360.0) == 0.0
    }

    pub fn matrix(&self) -> Mat3 {
        Mat3::from_axis_angle(Vec3::from(self.axis.unit_vector()), self.angle.to_radians())
    }

    /// Face direction after rotation.
    pub fn apply_to_direction(&self, direction: Direction) -> Direction {
        if self.is_identity() {
            return direction;
        }
        Direction::from_normal((self.matrix() * Vec3::from(direction.normal())).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_normalize_coord() {
        assert_eq!(normalize_coord(0.0), -0.5);
        assert_eq!(normalize_coord(8.0), 0.0);
        assert_eq!(normalize_coord(16.0), 0.5);
    }

    #[test]
    fn test_facing_table() {
        assert_eq!(
            PlacementRotation::from_facing(Some("east")),
            PlacementRotation { axis: Axis::Y, angle: 90.0 }
        );
        assert_eq!(
            PlacementRotation::from_facing(Some("up")),
            PlacementRotation { axis: Axis::X, angle: 270.0 }
        );
        assert!(PlacementRotation::from_facing(Some("south")).is_identity());
        assert!(PlacementRotation::from_facing(None).is_identity());
        assert!(PlacementRotation::from_facing(Some("sideways")).is_identity());
    }

    #[test]
    fn test_direction_rotation() {
        let east = PlacementRotation::from_facing(Some("east"));
        assert_eq!(east.apply_to_direction(Direction::East), Direction::North);
        assert_eq!(east.apply_to_direction(Direction::Up), Direction::Up);

        let north = PlacementRotation::from_facing(Some("north"));
        assert_eq!(north.apply_to_direction(Direction::South), Direction::North);
    }

    #[test]
    fn test_element_rotation_about_origin() {
        let rotation = ElementRotation {
            origin: [8.0, 8.0, 8.0],
            axis: Axis::Y,
            angle: 90.0,
            rescale: false,
        };
        let rotated = rotation.apply_to_point([0.5, 0.0, 0.0]);
        assert!(approx(rotated, [0.0, 0.0, -0.5]));
        // The origin itself is a fixed point.
        assert!(approx(rotation.apply_to_point([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_element_rescale() {
        let rotation = ElementRotation {
            origin: [8.0, 8.0, 8.0],
            axis: Axis::Y,
            angle: 45.0,
            rescale: true,
        };
        let rotated = rotation.apply_to_point([0.5, 0.25, 0.0]);
        // Y is untouched; XZ length grows by 1/cos(45).
        assert!((rotated[1] - 0.25).abs() < 1e-5);
        let len = (rotated[0] * rotated[0] + rotated[2] * rotated[2]).sqrt();
        assert!((len - 0.5 * std::f32::consts::SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_block_transform_matches_direction_rotation() {
        let transform = BlockTransform::new(0, 90);
        let n = transform.matrix() * Vec3::from(Direction::North.normal());
        assert_eq!(
            Direction::from_normal(n.into()),
            Direction::North.rotate_by_transform(0, 90)
        );
    }
}
