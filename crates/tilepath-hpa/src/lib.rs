//! Hierarchical pathfinding on grids split into square tiles.
//!
//! The map is cut into `tile_split × tile_split` tiles. Openings between
//! neighbouring tiles become *portals*, nodes of a small coarse graph whose
//! edges carry the walking distance between two portals through the tile
//! they share. A query then runs in two stages:
//!
//! - **Coarse search** ([`PortalSearch::astar`]) finds the sequence of
//!   portals leading from the start to the goal.
//! - **Fine reconstruction** ([`FineCache`]) floods every tile the coarse
//!   path touches with a multi-source distance field, from which a
//!   cell-by-cell route is read by gradient descent.
//!
//! [`HierarchicalPathfinder`] ties the two together. It keeps two reserved
//! endpoint portals and only re-wires the one whose cell actually moved, so
//! re-issuing the same query every frame costs nothing.
//!
//! # Building blocks
//!
//! | Type | Role |
//! |---|---|
//! | [`TileSolver`] | multi-source Dijkstra restricted to one tile |
//! | [`PortalGraph`] | portal arena, connections, per-tile index, connect/disconnect |
//! | [`PortalSearch`] | A* over the portal graph |
//! | [`FineCache`] | per-tile distance fields along the coarse path |

mod coarse;
mod config;
mod doorways;
mod fine;
mod maintain;
mod pathfinder;
mod portal;
mod solver;

pub use coarse::{PortalSearch, heuristic};
pub use config::PathfinderConfig;
pub use doorways::discover_portals;
pub use fine::FineCache;
pub use pathfinder::{HierarchicalPathfinder, PathState, PathStats};
pub use portal::{Connection, Portal, PortalGraph, PortalId};
pub use solver::{DistanceField, Seed, TileSolver, UNREACHABLE};
