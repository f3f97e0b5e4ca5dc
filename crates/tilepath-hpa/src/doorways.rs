//! Discovery of the openings between neighbouring tiles.

use tilepath_core::{Point, Range, TileLayout, TileStore};

use crate::portal::PortalGraph;
use crate::solver::TileSolver;

/// Find every opening across the internal tile boundaries of `store`.
///
/// Along each boundary, a cell pair is open when the cells on both sides are
/// walkable. Each open pair becomes a two-cell portal box straddling the
/// boundary, so every box overlaps exactly the two tiles it joins and holds
/// one cell in each. A wide opening is therefore a row of unit doorways:
/// a route entering one end and leaving the other pays for the cells in
/// between.
///
/// Boxes are returned vertical boundaries first, then horizontal ones, each
/// in row-major order.
pub fn discover_portals<S: TileStore + ?Sized>(store: &S, layout: TileLayout) -> Vec<Range> {
    let ts = layout.tile_split();
    let tiles = layout.tiles_size();
    let open = |a: Point, b: Point| store.is_walkable(a) && store.is_walkable(b);
    let mut found = Vec::new();

    // Boundaries between tile columns: left cell at x - 1, right cell at x.
    for y in 0..tiles.y * ts {
        for tx in 1..tiles.x {
            let right = Point::new(tx * ts, y);
            let left = right.shift(-1, 0);
            if open(left, right) {
                found.push(Range::spanning(left, right));
            }
        }
    }

    // Boundaries between tile rows: upper cell at y - 1, lower cell at y.
    for ty in 1..tiles.y {
        for x in 0..tiles.x * ts {
            let lower = Point::new(x, ty * ts);
            let upper = lower.shift(0, -1);
            if open(upper, lower) {
                found.push(Range::spanning(upper, lower));
            }
        }
    }

    found
}

impl PortalGraph {
    /// Build the portal graph of `store`: discover every tile-boundary
    /// opening, register it as a portal, and connect it.
    pub fn from_store<S: TileStore + ?Sized>(
        store: &S,
        layout: TileLayout,
        solver: &mut TileSolver,
    ) -> Self {
        let mut graph = PortalGraph::new(layout);
        for bounds in discover_portals(store, layout) {
            let id = graph.add_portal(bounds);
            graph.connect_portal(id, store, solver);
        }
        log::debug!(
            "built portal graph: {} portals over {} tiles",
            graph.len(),
            layout.tile_count()
        );
        graph
    }
}
