use tilepath_core::{LayoutError, Point, Range, TileLayout, TileStore};

use crate::coarse::PortalSearch;
use crate::config::PathfinderConfig;
use crate::fine::FineCache;
use crate::portal::{PortalGraph, PortalId};
use crate::solver::TileSolver;

/// Where a [`HierarchicalPathfinder`] is in its query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// No query issued yet; endpoint portals not reserved.
    Uninitialized,
    /// Endpoint portals reserved but at least one is not placed on the grid.
    Unset,
    /// Both endpoints placed and a coarse path was found.
    HasPath,
    /// Both endpoints placed but they are not connected.
    NoPath,
}

/// Counters of the expensive work done so far, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathStats {
    /// Times the start portal was disconnected and reconnected.
    pub start_rewires: u64,
    /// Times the end portal was disconnected and reconnected.
    pub end_rewires: u64,
    /// Coarse searches run.
    pub coarse_searches: u64,
    /// Fine cache rebuilds.
    pub fine_rebuilds: u64,
}

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    portal: PortalId,
    /// Last requested cell; `None` until the first query.
    pos: Option<Point>,
}

/// Two-level pathfinder with memoized endpoint portals.
///
/// The pathfinder owns the portal graph. On the first query it reserves two
/// extra single-cell portals for the query's start and end. Later queries
/// compare the requested cells against the previous ones: only an endpoint
/// that moved is disconnected and reconnected, and the coarse path and fine
/// cache are recomputed only when at least one endpoint moved. Repeating a
/// query with the same cells does no work at all.
pub struct HierarchicalPathfinder {
    config: PathfinderConfig,
    graph: PortalGraph,
    solver: TileSolver,
    search: PortalSearch,
    endpoints: Option<(Endpoint, Endpoint)>,
    coarse: Vec<PortalId>,
    fine: FineCache,
    stats: PathStats,
    dirty: bool,
}

impl HierarchicalPathfinder {
    /// Take ownership of an already built portal graph.
    pub fn new(graph: PortalGraph) -> Self {
        let config = PathfinderConfig {
            tile_split: graph.layout().tile_split(),
            ..PathfinderConfig::default()
        };
        Self::with_parts(graph, config)
    }

    /// Discover the portals of `store` and build a pathfinder over them.
    pub fn build<S: TileStore + ?Sized>(
        store: &S,
        config: PathfinderConfig,
    ) -> Result<Self, LayoutError> {
        let layout = TileLayout::for_store(store, config.tile_split)?;
        let mut solver = TileSolver::new();
        let graph = PortalGraph::from_store(store, layout, &mut solver);
        let mut pf = Self::with_parts(graph, config);
        pf.solver = solver;
        Ok(pf)
    }

    fn with_parts(graph: PortalGraph, config: PathfinderConfig) -> Self {
        Self {
            config,
            graph,
            solver: TileSolver::new(),
            search: PortalSearch::new(),
            endpoints: None,
            coarse: Vec::new(),
            fine: FineCache::new(),
            stats: PathStats::default(),
            dirty: false,
        }
    }

    /// Update the cached route for a query from `from` to `to`.
    ///
    /// Cheap when neither cell changed since the last call. Failures show up
    /// as an empty [`coarse_path`](Self::coarse_path), never as an error.
    pub fn find_path<S: TileStore + ?Sized>(&mut self, store: &S, from: Point, to: Point) {
        let (start, end) = self.reserve_endpoints();
        let mut moved = false;

        if start.pos != Some(from) {
            self.place_endpoint(store, start.portal, from);
            self.stats.start_rewires += 1;
            moved = true;
        }
        if end.pos != Some(to) {
            self.place_endpoint(store, end.portal, to);
            self.stats.end_rewires += 1;
            moved = true;
        }
        self.endpoints = Some((
            Endpoint {
                pos: Some(from),
                ..start
            },
            Endpoint {
                pos: Some(to),
                ..end
            },
        ));

        if !moved && !self.dirty {
            return;
        }
        self.dirty = false;
        self.coarse.clear();
        self.fine.clear();
        if !self.is_placed(start.portal) || !self.is_placed(end.portal) {
            return;
        }

        self.coarse = self.search.astar(&self.graph, start.portal, end.portal);
        self.stats.coarse_searches += 1;
        self.fine.rebuild(&self.graph, store, &mut self.solver, &self.coarse);
        self.stats.fine_rebuilds += 1;
        log::debug!(
            "path {from} -> {to}: {} portals, {} tiles cached",
            self.coarse.len(),
            self.fine.len()
        );
    }

    /// Reserve the two endpoint portals on first use.
    fn reserve_endpoints(&mut self) -> (Endpoint, Endpoint) {
        if let Some(eps) = self.endpoints {
            return eps;
        }
        let start = self.graph.add_portal(Range::default());
        let end = self.graph.add_portal(Range::default());
        log::debug!("reserved endpoint portals {start} and {end}");
        let eps = (
            Endpoint {
                portal: start,
                pos: None,
            },
            Endpoint {
                portal: end,
                pos: None,
            },
        );
        self.endpoints = Some(eps);
        eps
    }

    /// Disconnect an endpoint portal and reconnect it at `pos`.
    fn place_endpoint<S: TileStore + ?Sized>(&mut self, store: &S, portal: PortalId, pos: Point) {
        self.graph.disconnect_portal(portal);
        if self.config.validate_endpoints && !self.graph.layout().contains(pos) {
            log::warn!("endpoint {pos} is outside the grid, leaving portal {portal} unplaced");
            self.graph.set_bounds(portal, Range::default());
            return;
        }
        self.graph.set_bounds(portal, Range::cell(pos));
        self.graph.connect_portal(portal, store, &mut self.solver);
        log::trace!("endpoint portal {portal} moved to {pos}");
    }

    fn is_placed(&self, portal: PortalId) -> bool {
        self.graph
            .portal(portal)
            .is_some_and(|p| !p.bounds().is_empty())
    }

    /// The cached coarse path, start portal first. Empty before the first
    /// query or when the endpoints are not connected.
    pub fn coarse_path(&self) -> &[PortalId] {
        &self.coarse
    }

    /// Cell-level path from `from` within its tile, following the cached
    /// fields. See [`FineCache::detailed_path`].
    pub fn detailed_path(&self, from: Point) -> Vec<Point> {
        self.fine.detailed_path(self.graph.layout(), from)
    }

    /// The cells of the last query, `(from, to)`.
    pub fn endpoints(&self) -> (Option<Point>, Option<Point>) {
        match self.endpoints {
            Some((s, e)) => (s.pos, e.pos),
            None => (None, None),
        }
    }

    /// Ids of the reserved endpoint portals, once reserved.
    pub fn endpoint_portals(&self) -> Option<(PortalId, PortalId)> {
        self.endpoints.map(|(s, e)| (s.portal, e.portal))
    }

    pub fn state(&self) -> PathState {
        let Some((start, end)) = self.endpoints else {
            return PathState::Uninitialized;
        };
        if !self.is_placed(start.portal) || !self.is_placed(end.portal) {
            PathState::Unset
        } else if self.coarse.is_empty() {
            PathState::NoPath
        } else {
            PathState::HasPath
        }
    }

    pub fn stats(&self) -> PathStats {
        self.stats
    }

    pub fn layout(&self) -> TileLayout {
        self.graph.layout()
    }

    pub fn graph(&self) -> &PortalGraph {
        &self.graph
    }

    /// Mutable access to the graph, e.g. to add or remove doorways at run
    /// time. The next [`find_path`](Self::find_path) recomputes the route
    /// even if the endpoints did not move.
    pub fn graph_mut(&mut self) -> &mut PortalGraph {
        self.dirty = true;
        &mut self.graph
    }

    /// Cached fine fields.
    pub fn fine_cache(&self) -> &FineCache {
        &self.fine
    }
}
