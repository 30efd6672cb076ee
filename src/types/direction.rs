//! Direction and axis types for face and rotation handling.

use serde::{Deserialize, Serialize};

/// The six cardinal directions / face directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    East,
    West,
    Up,
    #[serde(alias = "bottom")]
    Down,
    South,
    North,
}

impl Direction {
    /// Face iteration order. Also the bit order of occlusion masks:
    /// the first face lands in the highest of the six bits.
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::South,
        Direction::North,
    ];

    /// Get the offset for this direction.
    pub fn offset(&self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    /// Get the normal vector for this direction.
    pub fn normal(&self) -> [f32; 3] {
        let (x, y, z) = self.offset();
        [x as f32, y as f32, z as f32]
    }

    /// Get the opposite direction.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Get the axis this direction is on.
    pub fn axis(&self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// Position of this face in [`Direction::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Direction::East => 0,
            Direction::West => 1,
            Direction::Up => 2,
            Direction::Down => 3,
            Direction::South => 4,
            Direction::North => 5,
        }
    }

    /// Parse from string (case-insensitive). `bottom` is accepted for `down`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "down" | "bottom" => Some(Direction::Down),
            "up" => Some(Direction::Up),
            "north" => Some(Direction::North),
            "south" => Some(Direction::South),
            "west" => Some(Direction::West),
            "east" => Some(Direction::East),
            _ => None,
        }
    }

    /// Snap an arbitrary vector to the closest face direction.
    pub fn from_normal(normal: [f32; 3]) -> Direction {
        let [x, y, z] = normal;
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());
        if ax >= ay && ax >= az {
            if x >= 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if ay >= az {
            if y >= 0.0 {
                Direction::Up
            } else {
                Direction::Down
            }
        } else if z >= 0.0 {
            Direction::South
        } else {
            Direction::North
        }
    }

    /// Rotate this direction by X rotation (around X axis, in 90-degree increments).
    /// Looking from +X towards origin, positive rotation goes Up -> North -> Down -> South.
    pub fn rotate_x(self, degrees: i32) -> Direction {
        let steps = ((degrees / 90) % 4 + 4) % 4;
        let mut dir = self;
        for _ in 0..steps {
            dir = match dir {
                Direction::Up => Direction::North,
                Direction::North => Direction::Down,
                Direction::Down => Direction::South,
                Direction::South => Direction::Up,
                Direction::East => Direction::East,
                Direction::West => Direction::West,
            };
        }
        dir
    }

    /// Rotate this direction by Y rotation (around Y axis, in 90-degree increments).
    /// Looking from +Y (above), positive rotation goes North -> East -> South -> West.
    pub fn rotate_y(self, degrees: i32) -> Direction {
        let steps = ((degrees / 90) % 4 + 4) % 4;
        let mut dir = self;
        for _ in 0..steps {
            dir = match dir {
                Direction::North => Direction::East,
                Direction::East => Direction::South,
                Direction::South => Direction::West,
                Direction::West => Direction::North,
                Direction::Up => Direction::Up,
                Direction::Down => Direction::Down,
            };
        }
        dir
    }

    /// Rotate this direction by a blockstate transform (X then Y rotation).
    pub fn rotate_by_transform(self, x_rot: i32, y_rot: i32) -> Direction {
        self.rotate_x(x_rot).rotate_y(y_rot)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Down => write!(f, "down"),
            Direction::Up => write!(f, "up"),
            Direction::North => write!(f, "north"),
            Direction::South => write!(f, "south"),
            Direction::West => write!(f, "west"),
            Direction::East => write!(f, "east"),
        }
    }
}

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Get the unit vector for this axis.
    pub fn unit_vector(&self) -> [f32; 3] {
        match self {
            Axis::X => [1.0, 0.0, 0.0],
            Axis::Y => [0.0, 1.0, 0.0],
            Axis::Z => [0.0, 0.0, 1.0],
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_order_indices() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn test_bottom_alias() {
        let dir: Direction = serde_json::from_str("\"bottom\"").unwrap();
        assert_eq!(dir, Direction::Down);
        assert_eq!(Direction::from_str("BOTTOM"), Some(Direction::Down));
    }

    #[test]
    fn test_from_normal_round_trips_face_normals() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_normal(dir.normal()), dir);
        }
        assert_eq!(Direction::from_normal([0.1, -0.9, 0.2]), Direction::Down);
    }

    #[test]
    fn test_rotate_y_full_turn() {
        for dir in Direction::ALL {
            assert_eq!(dir.rotate_y(360), dir);
        }
        assert_eq!(Direction::North.rotate_y(90), Direction::East);
        assert_eq!(Direction::Up.rotate_by_transform(90, 0), Direction::North);
    }
}
