//! Cell-level guidance from cached per-tile distance fields.

use std::collections::{BTreeMap, HashMap};

use tilepath_core::{Point, TileLayout, TileStore};

use crate::portal::{PortalGraph, PortalId};
use crate::solver::{DistanceField, Seed, TileSolver, UNREACHABLE};

/// Distance fields for the tiles a coarse path passes through.
///
/// Every portal cell on the path seeds the field of its tile with the rough
/// remaining cost of the coarse path from that portal to the goal. Descending
/// a field therefore leads towards the portal the coarse route continues
/// through. The rough cost only approximates the true remaining distance, so
/// near tile boundaries the descent can pick a locally worse exit.
#[derive(Debug, Clone, Default)]
pub struct FineCache {
    fields: HashMap<usize, DistanceField>,
}

impl FineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Replace the cache with fields for every tile `path` touches.
    ///
    /// Walks the path from the goal back to the start accumulating
    /// connection costs; the portal at position `i` seeds its cells with the
    /// cost accumulated so far. A path whose consecutive portals are not
    /// connected leaves the cache empty.
    pub fn rebuild<S: TileStore + ?Sized>(
        &mut self,
        graph: &PortalGraph,
        store: &S,
        solver: &mut TileSolver,
        path: &[PortalId],
    ) {
        self.fields.clear();
        let layout = graph.layout();
        let mut buckets: BTreeMap<usize, Vec<Seed>> = BTreeMap::new();
        let mut rough_cost = 0;

        for i in (0..path.len()).rev() {
            let Some(portal) = graph.portal(path[i]) else {
                log::warn!("coarse path refers to missing portal {}", path[i]);
                return;
            };
            for cell in portal.bounds() {
                if let Some(tile) = layout.tile_index(cell) {
                    buckets.entry(tile).or_default().push(Seed::new(cell, rough_cost));
                }
            }
            if i > 0 {
                let Some(step) = portal.cost_to(path[i - 1]) else {
                    log::warn!("coarse path broken between {} and {}", path[i - 1], path[i]);
                    return;
                };
                rough_cost += step;
            }
        }

        for (tile_idx, seeds) in buckets {
            let field = solver.solve(store, layout, layout.tile_at(tile_idx), &seeds);
            self.fields.insert(tile_idx, field);
        }
        log::trace!("fine cache rebuilt over {} tiles", self.fields.len());
    }

    /// Cached field of the tile with flat index `tile`.
    pub fn field(&self, tile: usize) -> Option<&DistanceField> {
        self.fields.get(&tile)
    }

    /// Flat indices of the cached tiles, sorted.
    pub fn tiles(&self) -> Vec<usize> {
        let mut tiles: Vec<usize> = self.fields.keys().copied().collect();
        tiles.sort_unstable();
        tiles
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Greedy descent from `from` inside its own tile.
    ///
    /// The path starts with `from` and steps to a neighbour whose distance is
    /// exactly one lower until none is left, which is normally a portal cell.
    /// Empty if `from` is outside the grid, its tile is not cached, or the
    /// cell is unreachable. The path never leaves the tile; callers query
    /// again once they have crossed into the next one.
    pub fn detailed_path(&self, layout: TileLayout, from: Point) -> Vec<Point> {
        let Some(field) = layout.tile_index(from).and_then(|t| self.fields.get(&t)) else {
            return Vec::new();
        };
        let mut dist = field.at(from);
        if dist == UNREACHABLE {
            return Vec::new();
        }

        let mut path = vec![from];
        let mut cur = from;
        while let Some(next) = cur
            .neighbors_4()
            .into_iter()
            .find(|&n| field.at(n) == dist - 1)
        {
            cur = next;
            dist -= 1;
            path.push(cur);
        }
        path
    }
}
