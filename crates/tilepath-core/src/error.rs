//! Errors raised while building grids and tile layouts.
//!
//! Queries never fail with an error; only construction does.

use std::fmt;

use crate::geom::Point;

/// Errors that can occur when validating a tile decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The tile side length must be at least 1.
    NonPositiveTileSplit(i32),
    /// The grid dimensions are not exact multiples of the tile side length.
    NotTileAligned {
        width: i32,
        height: i32,
        tile_split: i32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveTileSplit(n) => {
                write!(f, "layout: tile split must be positive, got {n}")
            }
            Self::NotTileAligned {
                width,
                height,
                tile_split,
            } => write!(
                f,
                "layout: grid {width}x{height} is not a multiple of tile split {tile_split}"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Errors that can occur when parsing an ASCII map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The map has no rows or no columns.
    Empty,
    /// Row `row` has a different width than the first row.
    InconsistentWidth { row: i32, expected: i32, found: i32 },
    /// A character that is neither floor nor wall was found.
    InvalidChar { ch: char, pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("grid: empty map"),
            Self::InconsistentWidth {
                row,
                expected,
                found,
            } => write!(f, "grid: row {row} has width {found}, expected {expected}"),
            Self::InvalidChar { ch, pos } => {
                write!(f, "grid contains invalid character \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}
