//! Board, cell and terrain types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::PlayerId;

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub const fn distance(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) as u32 + self.y.abs_diff(other.y) as u32
    }

    /// Get adjacent coordinates (up, down, left, right).
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, width: u16, height: u16) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.y > 0 {
            result[count as usize] = Coord::new(self.x, self.y - 1); // up
            count += 1;
        }
        if self.y + 1 < height {
            result[count as usize] = Coord::new(self.x, self.y + 1); // down
            count += 1;
        }
        if self.x > 0 {
            result[count as usize] = Coord::new(self.x - 1, self.y); // left
            count += 1;
        }
        if self.x + 1 < width {
            result[count as usize] = Coord::new(self.x + 1, self.y); // right
            count += 1;
        }

        (result, count)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Terrain class of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Open ground.
    Plain,
    /// Impassable for land units unless they can cross water.
    Water,
    /// Grants a defense bonus to the unit standing on it.
    Forest,
    /// Only flying units may enter.
    Mountain,
    /// Blocks movement and line of fire.
    Wall,
    /// Water made passable for land units.
    Bridge,
}

impl Terrain {
    /// Whether the cell counts as water for water-only units.
    #[must_use]
    pub const fn is_waterway(self) -> bool {
        matches!(self, Terrain::Water | Terrain::Bridge)
    }

    /// Single character used by the text renderer.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Terrain::Plain => '.',
            Terrain::Water => '~',
            Terrain::Forest => 'f',
            Terrain::Mountain => '^',
            Terrain::Wall => '#',
            Terrain::Bridge => '=',
        }
    }
}

/// Reserved marker placed on a cell at match start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "owner")]
pub enum Marker {
    /// Placement anchor owned by a player.
    Spawner(PlayerId),
    /// Attackable objective aliased to the owner's hp.
    Heart(PlayerId),
    /// Capturable objective; ownership lives in the nexus list.
    Nexus,
}

/// A single cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Terrain class.
    pub terrain: Terrain,
    /// Optional reserved marker. Never present on a wall.
    pub marker: Option<Marker>,
}

impl Cell {
    /// Create an unmarked cell of the given terrain.
    #[must_use]
    pub const fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            marker: None,
        }
    }

    /// Create an unmarked plain cell.
    #[must_use]
    pub const fn plain() -> Self {
        Self::new(Terrain::Plain)
    }
}

/// The board: a row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Width of the board in cells.
    width: u16,
    /// Height of the board in cells.
    height: u16,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new board filled with plain cells.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            cells: vec![Cell::plain(); size],
        })
    }

    /// Get the width of the board.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the board.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Check if a coordinate is within the board bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.coord_to_index(coord).map(|idx| &self.cells[idx])
    }

    /// Get a mutable reference to the cell at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.coord_to_index(coord).map(|idx| &mut self.cells[idx])
    }

    /// Terrain at a coordinate, `None` when out of bounds.
    #[must_use]
    pub fn terrain(&self, coord: Coord) -> Option<Terrain> {
        self.get(coord).map(|cell| cell.terrain)
    }

    /// Marker at a coordinate, if any.
    #[must_use]
    pub fn marker(&self, coord: Coord) -> Option<Marker> {
        self.get(coord).and_then(|cell| cell.marker)
    }

    /// Set the terrain at a coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set_terrain(&mut self, coord: Coord, terrain: Terrain) -> bool {
        match self.get_mut(coord) {
            Some(cell) => {
                cell.terrain = terrain;
                true
            }
            None => false,
        }
    }

    /// Set the marker at a coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set_marker(&mut self, coord: Coord, marker: Option<Marker>) -> bool {
        match self.get_mut(coord) {
            Some(cell) => {
                cell.marker = marker;
                true
            }
            None => false,
        }
    }

    /// In-bounds orthogonal neighbours of a coordinate.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        let (adjacent, count) = coord.adjacent(self.width, self.height);
        adjacent.into_iter().take(usize::from(count))
    }

    /// Iterate over all coordinates and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        let width = usize::from(self.width);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx % width) as u16, (idx / width) as u16);
            (coord, cell)
        })
    }

    /// Count cells with the given terrain.
    #[must_use]
    pub fn count_terrain(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|cell| cell.terrain == terrain).count()
    }

    /// Whether any wall lies strictly between two coordinates on a shared
    /// row or column. Coordinates not aligned are never blocked.
    #[must_use]
    pub fn wall_between(&self, from: Coord, to: Coord) -> bool {
        if from.x == to.x {
            let (lo, hi) = (from.y.min(to.y), from.y.max(to.y));
            return (lo + 1..hi).any(|y| self.terrain(Coord::new(from.x, y)) == Some(Terrain::Wall));
        }
        if from.y == to.y {
            let (lo, hi) = (from.x.min(to.x), from.x.max(to.x));
            return (lo + 1..hi).any(|x| self.terrain(Coord::new(x, from.y)) == Some(Terrain::Wall));
        }
        false
    }
}
