//! Multi-source distance fields restricted to a single tile.

use std::collections::BinaryHeap;

use tilepath_core::{Point, Range, TileLayout, TileStore};

/// Sentinel distance for cells no seed can reach.
pub const UNREACHABLE: i32 = i32::MAX;

/// A starting cell for a distance computation. The cell begins at `bias`
/// instead of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed {
    pub pos: Point,
    pub bias: i32,
}

impl Seed {
    #[inline]
    pub const fn new(pos: Point, bias: i32) -> Self {
        Self { pos, bias }
    }
}

/// Shortest distances from a set of seeds to every cell of one tile.
///
/// Values are stored row-major over the tile's range; cells that are walls
/// or cut off from every seed hold [`UNREACHABLE`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceField {
    range: Range,
    dists: Vec<i32>,
}

impl DistanceField {
    fn unreached(range: Range) -> Self {
        Self {
            range,
            dists: vec![UNREACHABLE; range.len()],
        }
    }

    /// Cells covered by the field.
    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Distance at `p`, or [`UNREACHABLE`] if `p` is outside the tile.
    #[inline]
    pub fn at(&self, p: Point) -> i32 {
        match self.idx(p) {
            Some(i) => self.dists[i],
            None => UNREACHABLE,
        }
    }

    /// Whether some seed reaches `p`.
    #[inline]
    pub fn is_reachable(&self, p: Point) -> bool {
        self.at(p) != UNREACHABLE
    }

    /// Raw row-major distances.
    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.dists
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.range.contains(p) {
            return None;
        }
        let rel = p - self.range.min;
        Some((rel.y * self.range.width() + rel.x) as usize)
    }
}

/// Queue entry, ordered so that `BinaryHeap` pops the lowest cost first and
/// breaks ties in row-major cell order.
#[derive(Clone, Copy, Eq, PartialEq)]
struct Candidate {
    pos: Point,
    cost: i32,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable intra-tile Dijkstra.
///
/// Each step between 4-connected floor cells costs 1. The search never
/// leaves the tile it was asked about, so two cells of the same tile that are
/// only connected through a neighbouring tile are unreachable from each
/// other here.
#[derive(Default)]
pub struct TileSolver {
    open: BinaryHeap<Candidate>,
}

impl TileSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the distance field of `tile` (in tile coordinates) from
    /// `seeds`.
    ///
    /// Seeds outside the tile or on a wall are ignored. When several seeds
    /// land on the same cell the lowest bias wins.
    pub fn solve<S: TileStore + ?Sized>(
        &mut self,
        store: &S,
        layout: TileLayout,
        tile: Point,
        seeds: &[Seed],
    ) -> DistanceField {
        let mut field = DistanceField::unreached(layout.tile_range(tile));
        self.open.clear();

        for seed in seeds {
            relax(store, &mut field, &mut self.open, seed.pos, seed.bias);
        }

        while let Some(current) = self.open.pop() {
            // Stale entry: a cheaper route was queued after this one.
            if current.cost > field.at(current.pos) {
                continue;
            }
            let next = current.cost.saturating_add(1);
            for np in current.pos.neighbors_4() {
                relax(store, &mut field, &mut self.open, np, next);
            }
        }

        log::trace!(
            "solved tile {} from {} seeds ({} cells reached)",
            tile,
            seeds.len(),
            field.dists.iter().filter(|&&d| d != UNREACHABLE).count()
        );
        field
    }
}

/// Record `cost` at `p` if `p` is a floor cell of the field's tile and
/// `cost` beats what is already there.
fn relax<S: TileStore + ?Sized>(
    store: &S,
    field: &mut DistanceField,
    open: &mut BinaryHeap<Candidate>,
    p: Point,
    cost: i32,
) {
    let Some(i) = field.idx(p) else {
        return;
    };
    if !store.is_walkable(p) {
        return;
    }
    if cost < field.dists[i] {
        field.dists[i] = cost;
        open.push(Candidate { pos: p, cost });
    }
}
