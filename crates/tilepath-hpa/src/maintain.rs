//! Incremental connect/disconnect of portals.

use tilepath_core::{Range, TileStore};

use crate::portal::{PortalGraph, PortalId};
use crate::solver::{DistanceField, Seed, TileSolver, UNREACHABLE};

/// Cost charged for stepping off a portal. Every connection includes it, so
/// a route through a doorway pays for crossing the tile boundary and a path
/// of connections is never shorter than the walk it stands for.
pub(crate) const PORTAL_STEP: i32 = 1;

impl PortalGraph {
    /// Wire portal `id` into the graph at its current bounds.
    ///
    /// For every tile the portal overlaps, the tile is flooded from the
    /// portal's cells and each portal already registered there is linked
    /// when *all* of its cells inside the tile are reachable. The edge cost
    /// is the smallest of those distances plus one for the step off the
    /// portal. The portal is then registered in the tile.
    ///
    /// Tiles the portal is already registered in are skipped, so connecting
    /// twice is harmless. An unknown id is a no-op.
    pub fn connect_portal<S: TileStore + ?Sized>(
        &mut self,
        id: PortalId,
        store: &S,
        solver: &mut TileSolver,
    ) {
        let Some(bounds) = self.portal(id).map(|p| p.bounds()) else {
            return;
        };
        let layout = self.layout;
        let tiles: Vec<usize> = layout.tiles_overlapping(bounds).collect();

        for tile_idx in tiles {
            if self.tile_portals[tile_idx].contains(&id) {
                continue;
            }
            let tile = layout.tile_at(tile_idx);
            let tile_range = layout.tile_range(tile);
            let seeds: Vec<Seed> = bounds
                .intersect(tile_range)
                .iter()
                .map(|pos| Seed::new(pos, PORTAL_STEP))
                .collect();
            let field = solver.solve(store, layout, tile, &seeds);

            let others = self.tile_portals[tile_idx].clone();
            for other in others {
                let Some(other_bounds) = self.portal(other).map(|p| p.bounds()) else {
                    continue;
                };
                let cells = other_bounds.intersect(tile_range);
                if let Some(cost) = min_cost_if_all_reachable(&field, cells) {
                    log::trace!("link {id} <-> {other} cost {cost} in tile {tile}");
                    self.link(id, other, cost);
                }
            }
            self.tile_portals[tile_idx].push(id);
        }
    }

    /// Remove every edge touching portal `id` and unregister it from its
    /// tiles. The portal record itself stays, so the id can be reconnected.
    ///
    /// Disconnecting an unconnected or unknown portal is a no-op.
    pub fn disconnect_portal(&mut self, id: PortalId) {
        let layout = self.layout;
        let Some(portal) = self.portal_mut(id) else {
            return;
        };
        let conns = std::mem::take(&mut portal.conns);
        let bounds = portal.bounds;

        for conn in conns {
            if let Some(other) = self.portal_mut(conn.target) {
                other.conns.retain(|c| c.target != id);
            }
        }
        for tile_idx in layout.tiles_overlapping(bounds) {
            self.tile_portals[tile_idx].retain(|&p| p != id);
        }
    }
}

/// Smallest distance over `cells`, or `None` when `cells` is empty or any of
/// them is unreachable.
fn min_cost_if_all_reachable(field: &DistanceField, cells: Range) -> Option<i32> {
    let mut best = UNREACHABLE;
    for p in cells {
        let d = field.at(p);
        if d == UNREACHABLE {
            return None;
        }
        best = best.min(d);
    }
    (best != UNREACHABLE).then_some(best)
}
