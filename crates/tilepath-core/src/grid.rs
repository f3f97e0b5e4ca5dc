//! An in-memory map of floor and wall cells.
//!
//! [`TileGrid`] is the reference [`TileStore`]: a flat row-major buffer of
//! [`Tile`] values, with an ASCII form (`#` wall, `.` floor) used by tests,
//! generators and the demo.

use crate::error::GridError;
use crate::geom::{Point, Range};
use crate::store::TileStore;

/// Classification of a single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    #[default]
    Wall,
    Floor,
}

impl Tile {
    /// ASCII representation.
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
        }
    }

    /// Parse an ASCII glyph.
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Floor),
            _ => None,
        }
    }
}

/// A rectangular map of [`Tile`] values anchored at the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    tiles: Vec<Tile>,
    width: i32,
    height: i32,
}

impl TileGrid {
    /// Create a new grid filled with walls.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            tiles: vec![Tile::Wall; (width * height) as usize],
            width,
            height,
        }
    }

    /// Parse a map drawn with `#` for walls and `.` for floor, one line per
    /// row. Leading and trailing blank lines are ignored.
    pub fn from_ascii(s: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim_end)
            .skip_while(|l| l.is_empty())
            .collect();
        let lines: Vec<&str> = match lines.iter().rposition(|l| !l.is_empty()) {
            Some(last) => lines[..=last].to_vec(),
            None => return Err(GridError::Empty),
        };

        let width = lines[0].chars().count() as i32;
        let height = lines.len() as i32;
        let mut tiles = Vec::with_capacity((width * height) as usize);

        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count() as i32;
            if found != width {
                return Err(GridError::InconsistentWidth {
                    row: y as i32,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let tile = Tile::from_glyph(ch).ok_or(GridError::InvalidChar {
                    ch,
                    pos: Point::new(x as i32, y as i32),
                })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            tiles,
            width,
            height,
        })
    }

    /// Render the grid back into its ASCII form.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.tiles[self.index(Point::new(x, y))].glyph());
            }
            out.push('\n');
        }
        out
    }

    /// The grid's extent.
    pub fn range(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Get the tile at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Tile> {
        if !self.range().contains(p) {
            return None;
        }
        Some(self.tiles[self.index(p)])
    }

    /// Set the tile at a point. Does nothing if out of bounds.
    pub fn set(&mut self, p: Point, tile: Tile) {
        if !self.range().contains(p) {
            return;
        }
        let idx = self.index(p);
        self.tiles[idx] = tile;
    }

    /// Fill the part of `rng` that lies inside the grid.
    pub fn fill(&mut self, rng: Range, tile: Tile) {
        for p in rng.intersect(self.range()) {
            let idx = self.index(p);
            self.tiles[idx] = tile;
        }
    }

    /// Count how many cells hold `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }
}

impl TileStore for TileGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_walkable(&self, p: Point) -> bool {
        self.at(p) == Some(Tile::Floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "
####
#..#
#.##
";

    #[test]
    fn parse_and_query() {
        let g = TileGrid::from_ascii(MAP).unwrap();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert!(g.is_walkable(Point::new(1, 1)));
        assert!(g.is_walkable(Point::new(1, 2)));
        assert!(!g.is_walkable(Point::new(2, 2)));
        assert!(!g.is_walkable(Point::new(-1, 1)));
        assert!(!g.is_walkable(Point::new(4, 1)));
        assert_eq!(g.count(Tile::Floor), 3);
    }

    #[test]
    fn ascii_round_trip() {
        let g = TileGrid::from_ascii(MAP).unwrap();
        assert_eq!(g.to_ascii(), "####\n#..#\n#.##\n");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(TileGrid::from_ascii("\n\n"), Err(GridError::Empty));
        assert_eq!(
            TileGrid::from_ascii("##\n#"),
            Err(GridError::InconsistentWidth {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            TileGrid::from_ascii("#.\n#x"),
            Err(GridError::InvalidChar {
                ch: 'x',
                pos: Point::new(1, 1)
            })
        );
    }

    #[test]
    fn negative_dimensions_give_an_empty_grid() {
        let g = TileGrid::new(-3, 4);
        assert_eq!(g.width(), 0);
        assert_eq!(g.height(), 4);
        assert!(g.range().is_empty());
        assert_eq!(g.count(Tile::Wall), 0);
    }

    #[test]
    fn set_and_fill() {
        let mut g = TileGrid::new(5, 5);
        assert_eq!(g.count(Tile::Wall), 25);
        g.fill(Range::new(1, 1, 10, 3), Tile::Floor);
        assert_eq!(g.count(Tile::Floor), 8);
        g.set(Point::new(9, 9), Tile::Floor);
        g.set(Point::new(0, 0), Tile::Floor);
        assert_eq!(g.at(Point::new(0, 0)), Some(Tile::Floor));
        assert_eq!(g.at(Point::new(9, 9)), None);
    }
}
