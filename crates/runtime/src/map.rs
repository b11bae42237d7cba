//! Scene grid and route finding.
//!
//! The grid is parsed from the text rows of a scene: `#` walls, `.` floor,
//! `E` the entrance and `X` the exit. Any other character reads as floor so
//! decorative markers in content files do not break loading.
//!
//! Movement is orthogonal. Occupied tiles may end a route but never lie on
//! its way, which is how a mover steps onto someone else's tile.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crawl_core::GridPoint;

use crate::api::{Result, RuntimeError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Floor,
    Entrance,
    Exit,
}

impl Tile {
    fn from_char(c: char) -> Self {
        match c {
            '#' => Self::Wall,
            'E' => Self::Entrance,
            'X' => Self::Exit,
            _ => Self::Floor,
        }
    }

    pub fn is_walkable(self) -> bool {
        self != Self::Wall
    }
}

/// Steps from a start tile to a destination, excluding the start.
pub type Route = Vec<GridPoint>;

/// Read access to a scene layout.
pub trait TileMap: Send + Sync {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn tile(&self, point: GridPoint) -> Option<Tile>;
    fn entrance(&self) -> GridPoint;
    fn exit(&self) -> GridPoint;

    fn contains(&self, point: GridPoint) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < self.width() && point.y < self.height()
    }

    fn is_walkable(&self, point: GridPoint) -> bool {
        self.tile(point).is_some_and(Tile::is_walkable)
    }

    /// Walkable tiles that are neither door, in row order.
    fn floor_tiles(&self) -> Vec<GridPoint> {
        let mut tiles = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let point = GridPoint::new(x, y);
                if self.tile(point) == Some(Tile::Floor) {
                    tiles.push(point);
                }
            }
        }
        tiles
    }
}

/// Shortest paths across a [`TileMap`].
pub trait RouteFinder {
    /// Shortest route from `from` to `to`, avoiding `blocked` except as the destination.
    fn find_route(&self, from: GridPoint, to: GridPoint, blocked: &HashSet<GridPoint>) -> Option<Route>;

    /// Every destination within `max_steps`, with the route to it.
    fn reachable(
        &self,
        from: GridPoint,
        max_steps: usize,
        blocked: &HashSet<GridPoint>,
    ) -> BTreeMap<GridPoint, Route>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    tiles: Vec<Vec<Tile>>,
    width: i32,
    entrance: GridPoint,
    exit: GridPoint,
}

impl GridMap {
    /// Parses scene rows. Exactly one entrance and one exit are required.
    pub fn parse(scene: &str, rows: &[String]) -> Result<Self> {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if width == 0 {
            return Err(RuntimeError::InvalidMap(format!("scene {scene} has no rows")));
        }

        let mut entrance = None;
        let mut exit = None;
        let mut tiles = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let mut line: Vec<Tile> = row.chars().map(Tile::from_char).collect();
            line.resize(width, Tile::Wall);
            for (x, tile) in line.iter().enumerate() {
                let point = GridPoint::new(x as i32, y as i32);
                match tile {
                    Tile::Entrance => entrance = Some(point),
                    Tile::Exit => exit = Some(point),
                    _ => {}
                }
            }
            tiles.push(line);
        }

        let entrance = entrance.ok_or_else(|| RuntimeError::MissingTile {
            scene: scene.to_string(),
            tile: "entrance",
        })?;
        let exit = exit.ok_or_else(|| RuntimeError::MissingTile {
            scene: scene.to_string(),
            tile: "exit",
        })?;

        Ok(Self {
            tiles,
            width: width as i32,
            entrance,
            exit,
        })
    }

    fn walkable_neighbours(&self, point: GridPoint) -> impl Iterator<Item = GridPoint> + '_ {
        point
            .neighbours()
            .into_iter()
            .filter(move |n| self.is_walkable(*n))
    }

    /// Breadth-first search out to `max_steps`, returning each tile's parent.
    fn explore(
        &self,
        from: GridPoint,
        max_steps: usize,
        blocked: &HashSet<GridPoint>,
        stop_at: Option<GridPoint>,
    ) -> BTreeMap<GridPoint, GridPoint> {
        let mut parents = BTreeMap::new();
        let mut queue = VecDeque::from([(from, 0usize)]);
        let mut seen = HashSet::from([from]);

        while let Some((point, steps)) = queue.pop_front() {
            if steps >= max_steps {
                continue;
            }
            for next in self.walkable_neighbours(point) {
                if !seen.insert(next) {
                    continue;
                }
                parents.insert(next, point);
                if Some(next) == stop_at {
                    return parents;
                }
                // Occupied tiles end a route.
                if !blocked.contains(&next) {
                    queue.push_back((next, steps + 1));
                }
            }
        }
        parents
    }

    fn walk_back(parents: &BTreeMap<GridPoint, GridPoint>, from: GridPoint, to: GridPoint) -> Route {
        let mut route = vec![to];
        let mut cursor = to;
        while let Some(parent) = parents.get(&cursor) {
            if *parent == from {
                break;
            }
            route.push(*parent);
            cursor = *parent;
        }
        route.reverse();
        route
    }

    /// Renders the layout with `marks` drawn over it.
    pub fn render(&self, marks: &BTreeMap<GridPoint, char>) -> String {
        let mut out = String::new();
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let point = GridPoint::new(x as i32, y as i32);
                let glyph = marks.get(&point).copied().unwrap_or(match tile {
                    Tile::Wall => '#',
                    Tile::Floor => '.',
                    Tile::Entrance => 'E',
                    Tile::Exit => 'X',
                });
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

impl TileMap for GridMap {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.tiles.len() as i32
    }

    fn tile(&self, point: GridPoint) -> Option<Tile> {
        if !self.contains(point) {
            return None;
        }
        Some(self.tiles[point.y as usize][point.x as usize])
    }

    fn entrance(&self) -> GridPoint {
        self.entrance
    }

    fn exit(&self) -> GridPoint {
        self.exit
    }
}

impl RouteFinder for GridMap {
    fn find_route(&self, from: GridPoint, to: GridPoint, blocked: &HashSet<GridPoint>) -> Option<Route> {
        if from == to || !self.is_walkable(to) {
            return None;
        }
        let parents = self.explore(from, usize::MAX, blocked, Some(to));
        parents
            .contains_key(&to)
            .then(|| Self::walk_back(&parents, from, to))
    }

    fn reachable(
        &self,
        from: GridPoint,
        max_steps: usize,
        blocked: &HashSet<GridPoint>,
    ) -> BTreeMap<GridPoint, Route> {
        let parents = self.explore(from, max_steps, blocked, None);
        parents
            .keys()
            .map(|to| (*to, Self::walk_back(&parents, from, *to)))
            .collect()
    }
}
