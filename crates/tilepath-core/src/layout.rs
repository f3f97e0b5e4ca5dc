//! Tile arithmetic for a grid split into square tiles.

use crate::error::LayoutError;
use crate::geom::{Point, Range};
use crate::store::TileStore;

/// Describes how a `width × height` grid is cut into `tile_split`-sided
/// square tiles.
///
/// Tiles are addressed either by tile coordinates (a [`Point`] in tile
/// units) or by a flat row-major tile index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileLayout {
    width: i32,
    height: i32,
    tile_split: i32,
}

impl TileLayout {
    /// Validate and build a layout. The grid dimensions must be exact
    /// multiples of `tile_split`.
    pub fn new(width: i32, height: i32, tile_split: i32) -> Result<Self, LayoutError> {
        if tile_split <= 0 {
            return Err(LayoutError::NonPositiveTileSplit(tile_split));
        }
        if width < 0 || height < 0 || width % tile_split != 0 || height % tile_split != 0 {
            return Err(LayoutError::NotTileAligned {
                width,
                height,
                tile_split,
            });
        }
        Ok(Self {
            width,
            height,
            tile_split,
        })
    }

    /// Layout covering the whole of `store`.
    pub fn for_store<S: TileStore + ?Sized>(
        store: &S,
        tile_split: i32,
    ) -> Result<Self, LayoutError> {
        Self::new(store.width(), store.height(), tile_split)
    }

    /// Side length of a tile, in cells.
    #[inline]
    pub fn tile_split(self) -> i32 {
        self.tile_split
    }

    /// Grid extent in cells.
    #[inline]
    pub fn grid_range(self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Number of tiles along each axis.
    #[inline]
    pub fn tiles_size(self) -> Point {
        Point::new(self.width / self.tile_split, self.height / self.tile_split)
    }

    /// Total number of tiles.
    #[inline]
    pub fn tile_count(self) -> usize {
        let sz = self.tiles_size();
        (sz.x * sz.y) as usize
    }

    /// Whether `p` is a cell of the grid.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        self.grid_range().contains(p)
    }

    /// Tile coordinates of the tile holding cell `p`.
    #[inline]
    pub fn tile_of(self, p: Point) -> Point {
        Point::new(
            p.x.div_euclid(self.tile_split),
            p.y.div_euclid(self.tile_split),
        )
    }

    /// Flat index of the tile holding cell `p`, or `None` if `p` is outside
    /// the grid.
    #[inline]
    pub fn tile_index(self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(self.index_of_tile(self.tile_of(p)))
    }

    /// Flat index of the tile at tile coordinates `tile`.
    #[inline]
    pub fn index_of_tile(self, tile: Point) -> usize {
        (tile.y * self.tiles_size().x + tile.x) as usize
    }

    /// Tile coordinates of the tile with flat index `idx`.
    #[inline]
    pub fn tile_at(self, idx: usize) -> Point {
        let w = self.tiles_size().x.max(1) as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// Cell range covered by the tile at tile coordinates `tile`.
    #[inline]
    pub fn tile_range(self, tile: Point) -> Range {
        let min = tile * self.tile_split;
        Range {
            min,
            max: min.shift(self.tile_split, self.tile_split),
        }
    }

    /// Flat indices of every tile that shares at least one cell with `rng`,
    /// in row-major order. Parts of `rng` outside the grid are ignored.
    pub fn tiles_overlapping(self, rng: Range) -> impl Iterator<Item = usize> {
        let clipped = rng.intersect(self.grid_range());
        let tiles = if clipped.is_empty() {
            Range::default()
        } else {
            let lo = self.tile_of(clipped.min);
            let hi = self.tile_of(clipped.max.shift(-1, -1));
            Range::spanning(lo, hi)
        };
        tiles.iter().map(move |t| self.index_of_tile(t))
    }
}
