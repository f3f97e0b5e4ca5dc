//! **tilepath-core** — shared types for pathfinding on tiled grids.
//!
//! This crate provides the pieces every other *tilepath* crate builds on:
//! integer geometry, the read-only [`TileStore`] view of a map, an in-memory
//! [`TileGrid`] implementation, and [`TileLayout`], which maps cells to the
//! square tiles of a hierarchical decomposition.

pub mod error;
pub mod geom;
pub mod grid;
pub mod layout;
pub mod store;

pub use error::{GridError, LayoutError};
pub use geom::{Point, Range};
pub use grid::{Tile, TileGrid};
pub use layout::TileLayout;
pub use store::TileStore;
