use glam::Vec2;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};

/// The four cardinal directions, in page space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// The four cardinal directions.
    /// This is just a convenience constant for iterating over the directions.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the unit vector for this direction.
    pub fn as_vec2(self) -> Vec2 {
        self.into()
    }

    /// The perpendicular direction a quarter turn clockwise (on screen).
    pub const fn clockwise(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Sprite rotation in degrees, for sprites drawn facing right.
    pub const fn rotation_degrees(self) -> f32 {
        match self {
            Direction::Right => 0.0,
            Direction::Down => 90.0,
            Direction::Left => 180.0,
            Direction::Up => 270.0,
        }
    }

    /// Picks the direction of the dominant axis of `vector`.
    ///
    /// Returns `None` for a zero vector. Ties go to the horizontal axis.
    pub fn from_dominant_axis(vector: Vec2) -> Option<Direction> {
        if vector == Vec2::ZERO || !vector.is_finite() {
            return None;
        }

        if vector.x.abs() >= vector.y.abs() {
            Some(if vector.x > 0.0 { Direction::Right } else { Direction::Left })
        } else {
            Some(if vector.y > 0.0 { Direction::Down } else { Direction::Up })
        }
    }
}

impl From<Direction> for Vec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -Vec2::Y,
            Direction::Down => Vec2::Y,
            Direction::Left => -Vec2::X,
            Direction::Right => Vec2::X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn test_direction_as_vec2() {
        assert_eq!(Direction::Up.as_vec2(), -Vec2::Y);
        assert_eq!(Direction::Down.as_vec2(), Vec2::Y);
        assert_eq!(Direction::Left.as_vec2(), -Vec2::X);
        assert_eq!(Direction::Right.as_vec2(), Vec2::X);
    }

    #[test]
    fn test_clockwise_is_perpendicular() {
        for direction in Direction::DIRECTIONS {
            assert_eq!(direction.as_vec2().dot(direction.clockwise().as_vec2()), 0.0);
            assert_eq!(direction.clockwise().clockwise(), direction.opposite());
        }
    }

    #[test]
    fn test_dominant_axis() {
        assert_eq!(Direction::from_dominant_axis(Vec2::new(0.9, 0.2)), Some(Direction::Right));
        assert_eq!(Direction::from_dominant_axis(Vec2::new(-0.9, 0.2)), Some(Direction::Left));
        assert_eq!(Direction::from_dominant_axis(Vec2::new(0.1, -0.5)), Some(Direction::Up));
        assert_eq!(Direction::from_dominant_axis(Vec2::new(0.1, 0.5)), Some(Direction::Down));
        assert_eq!(Direction::from_dominant_axis(Vec2::ZERO), None);
        assert_eq!(Direction::from_dominant_axis(Vec2::new(f32::NAN, 1.0)), None);
    }

    #[test]
    fn test_direction_as_ref() {
        assert_eq!(Direction::Up.as_ref(), "up");
        assert_eq!(Direction::Right.as_ref(), "right");
    }
}
