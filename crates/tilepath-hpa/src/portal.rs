//! The portal arena and its per-tile index.
//!
//! Portals live in a single table and are referred to by [`PortalId`]. Ids
//! stay valid until [`PortalGraph::remove_portal`] frees the slot; freed
//! slots are left empty rather than compacted.

use std::fmt;

use tilepath_core::{Range, TileLayout};

/// Stable handle of a portal inside a [`PortalGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortalId(pub usize);

impl fmt::Display for PortalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One directed half of an undirected portal-to-portal edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub target: PortalId,
    pub cost: i32,
}

/// A rectangular opening between tiles, or a single query endpoint cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Portal {
    pub(crate) bounds: Range,
    pub(crate) conns: Vec<Connection>,
}

impl Portal {
    /// Cells covered by the portal. Empty for an unplaced portal.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Outgoing connections, in the order they were made.
    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.conns
    }

    /// Cost of the connection to `target`, if any.
    pub fn cost_to(&self, target: PortalId) -> Option<i32> {
        self.conns
            .iter()
            .find(|c| c.target == target)
            .map(|c| c.cost)
    }
}

/// The coarse graph: portals, their connections, and which tiles each portal
/// is registered in.
///
/// A portal is registered in every tile its box overlaps. Boundary openings
/// found by [`discover_portals`](crate::discover_portals) straddle two tiles;
/// endpoint portals cover a single cell and sit in exactly one.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortalGraph {
    pub(crate) layout: TileLayout,
    pub(crate) portals: Vec<Option<Portal>>,
    pub(crate) tile_portals: Vec<Vec<PortalId>>,
}

impl PortalGraph {
    /// An empty graph over `layout`.
    pub fn new(layout: TileLayout) -> Self {
        Self {
            layout,
            portals: Vec::new(),
            tile_portals: vec![Vec::new(); layout.tile_count()],
        }
    }

    /// The tile decomposition this graph is built on.
    #[inline]
    pub fn layout(&self) -> TileLayout {
        self.layout
    }

    /// Append an unconnected portal covering `bounds`.
    ///
    /// The portal takes no part in searches until
    /// [`connect_portal`](Self::connect_portal) is called for it.
    pub fn add_portal(&mut self, bounds: Range) -> PortalId {
        let id = PortalId(self.portals.len());
        self.portals.push(Some(Portal {
            bounds,
            conns: Vec::new(),
        }));
        id
    }

    /// Disconnect the portal and free its slot. Returns `false` if the slot
    /// was already empty.
    pub fn remove_portal(&mut self, id: PortalId) -> bool {
        if self.portal(id).is_none() {
            return false;
        }
        self.disconnect_portal(id);
        self.portals[id.0] = None;
        true
    }

    /// Move a portal to `bounds`.
    ///
    /// A portal that is still connected is disconnected first, so the tile
    /// index never refers to a stale position.
    pub fn set_bounds(&mut self, id: PortalId, bounds: Range) {
        self.disconnect_portal(id);
        if let Some(p) = self.portal_mut(id) {
            p.bounds = bounds;
        }
    }

    /// Look up a live portal.
    #[inline]
    pub fn portal(&self, id: PortalId) -> Option<&Portal> {
        self.portals.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn portal_mut(&mut self, id: PortalId) -> Option<&mut Portal> {
        self.portals.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of slots, live or freed. Every id is below this.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.portals.len()
    }

    /// Number of live portals.
    pub fn len(&self) -> usize {
        self.portals.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live portals in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PortalId, &Portal)> {
        self.portals
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (PortalId(i), p)))
    }

    /// Portals registered in the tile with flat index `tile`.
    pub fn tile_portals(&self, tile: usize) -> &[PortalId] {
        self.tile_portals
            .get(tile)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Cost of the edge between `a` and `b`, if they are connected.
    pub fn connection_cost(&self, a: PortalId, b: PortalId) -> Option<i32> {
        self.portal(a).and_then(|p| p.cost_to(b))
    }

    /// Insert or tighten the mirrored edge between `a` and `b`.
    ///
    /// Two portals can share more than one tile; the cheaper crossing wins on
    /// both sides.
    pub(crate) fn link(&mut self, a: PortalId, b: PortalId, cost: i32) {
        for (from, to) in [(a, b), (b, a)] {
            let Some(p) = self.portal_mut(from) else {
                continue;
            };
            match p.conns.iter_mut().find(|c| c.target == to) {
                Some(c) => c.cost = c.cost.min(cost),
                None => p.conns.push(Connection { target: to, cost }),
            }
        }
    }
}
