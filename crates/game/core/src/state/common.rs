use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an actor in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    /// Reserved identifier of the hero.
    pub const HERO: Self = Self(0);

    #[inline]
    pub const fn is_hero(self) -> bool {
        self.0 == Self::HERO.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tile coordinates on the scene grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Self) -> i64 {
        (self.x - other.x).abs() as i64 + (self.y - other.y).abs() as i64
    }

    pub fn chebyshev(self, other: Self) -> i64 {
        (self.x - other.x).abs().max((self.y - other.y).abs()) as i64
    }

    /// True when `other` is this tile or one of its eight neighbours.
    pub fn is_within_reach(self, other: Self) -> bool {
        self.chebyshev(other) <= 1
    }

    /// The four orthogonal neighbours.
    pub fn neighbours(self) -> [Self; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = GridPoint::new(1, 1);
        let b = GridPoint::new(4, -1);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(a.chebyshev(b), 3);
        assert!(a.is_within_reach(GridPoint::new(2, 2)));
        assert!(a.is_within_reach(a));
        assert!(!a.is_within_reach(GridPoint::new(3, 1)));
    }
}
