use std::collections::BinaryHeap;

use crate::portal::{PortalGraph, PortalId};
use crate::solver::UNREACHABLE;

/// Lower bound on the cost of any route between two portals: the Manhattan
/// gap between their boxes. Unknown portals estimate to 0.
///
/// A route through unit doorways pays for every step it walks, including the
/// step across each boundary, so it never costs less than this gap.
pub fn heuristic(graph: &PortalGraph, a: PortalId, b: PortalId) -> i32 {
    match (graph.portal(a), graph.portal(b)) {
        (Some(a), Some(b)) => a.bounds().manhattan_gap(b.bounds()),
        _ => 0,
    }
}

#[derive(Clone)]
struct Node {
    g: i32,
    parent: usize,
    generation: u32,
    open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the node array, ordered by `f` (then by index, lowest
/// first) for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
struct NodeRef {
    idx: usize,
    f: i32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.f.cmp(&self.f).then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over a [`PortalGraph`].
///
/// The node array and open list are kept between queries; a generation
/// counter invalidates old node state lazily, so a search only touches the
/// portals it actually reaches.
#[derive(Default)]
pub struct PortalSearch {
    nodes: Vec<Node>,
    generation: u32,
    open: BinaryHeap<NodeRef>,
}

impl PortalSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheapest sequence of portals from `from` to `to`, both included.
    ///
    /// Returns an empty path when either portal is unknown or `to` cannot be
    /// reached.
    pub fn astar(&mut self, graph: &PortalGraph, from: PortalId, to: PortalId) -> Vec<PortalId> {
        if graph.portal(from).is_none() || graph.portal(to).is_none() {
            return Vec::new();
        }
        if from == to {
            return vec![from];
        }
        self.prepare(graph.slot_count());
        let cur_gen = self.generation;

        {
            let start = &mut self.nodes[from.0];
            start.g = 0;
            start.parent = usize::MAX;
            start.generation = cur_gen;
            start.open = true;
        }
        self.open.push(NodeRef {
            idx: from.0,
            f: heuristic(graph, from, to),
        });

        let found = 'search: loop {
            let Some(current) = self.open.pop() else {
                break 'search false;
            };
            let ci = current.idx;
            if self.nodes[ci].generation != cur_gen || !self.nodes[ci].open {
                continue;
            }
            if ci == to.0 {
                break 'search true;
            }
            self.nodes[ci].open = false;
            let current_g = self.nodes[ci].g;

            let Some(portal) = graph.portal(PortalId(ci)) else {
                continue;
            };
            for conn in portal.connections() {
                let ni = conn.target.0;
                if graph.portal(conn.target).is_none() {
                    continue;
                }
                let tentative = current_g.saturating_add(conn.cost);

                let n = &mut self.nodes[ni];
                if n.generation == cur_gen {
                    if tentative >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                }
                n.g = tentative;
                n.parent = ci;
                n.open = true;
                self.open.push(NodeRef {
                    idx: ni,
                    f: tentative.saturating_add(heuristic(graph, conn.target, to)),
                });
            }
        };

        if !found {
            log::debug!("no portal route from {from} to {to}");
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut ci = to.0;
        while ci != usize::MAX {
            path.push(PortalId(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        log::debug!(
            "portal route {from} -> {to}: {} portals, cost {}",
            path.len(),
            self.nodes[to.0].g
        );
        path
    }

    /// Size the node array for `slots` portals and start a new generation.
    fn prepare(&mut self, slots: usize) {
        if self.nodes.len() < slots {
            self.nodes.resize(slots, Node::default());
        }
        self.open.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped around: old stamps could look current again.
            for n in self.nodes.iter_mut() {
                *n = Node::default();
            }
            self.generation = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use tilepath_core::{Point, Range, TileLayout};

    use super::*;

    // A hand-made graph on a 12x4 map (three tiles in a row):
    //
    //   a --4-- b --4-- d
    //    \             /
    //     `--6-- c --9'
    fn diamond() -> (PortalGraph, [PortalId; 4]) {
        let mut g = PortalGraph::new(TileLayout::new(12, 4, 4).unwrap());
        let a = g.add_portal(Range::cell(Point::new(0, 0)));
        let b = g.add_portal(Range::cell(Point::new(4, 0)));
        let c = g.add_portal(Range::cell(Point::new(3, 3)));
        let d = g.add_portal(Range::cell(Point::new(8, 0)));
        g.link(a, b, 4);
        g.link(b, d, 4);
        g.link(a, c, 6);
        g.link(c, d, 9);
        (g, [a, b, c, d])
    }

    #[test]
    fn finds_the_cheapest_route() {
        let (g, [a, b, _, d]) = diamond();
        let mut s = PortalSearch::new();
        assert_eq!(s.astar(&g, a, d), vec![a, b, d]);
        assert_eq!(s.astar(&g, d, a), vec![d, b, a]);
    }

    #[test]
    fn same_portal_is_a_one_step_route() {
        let (g, [a, ..]) = diamond();
        assert_eq!(PortalSearch::new().astar(&g, a, a), vec![a]);
    }

    #[test]
    fn disconnected_goal_gives_empty_route() {
        let (mut g, [a, b, c, d]) = diamond();
        g.disconnect_portal(b);
        g.disconnect_portal(c);
        let mut s = PortalSearch::new();
        assert!(s.astar(&g, a, d).is_empty());

        // Reused search state does not leak into the next query.
        g.link(a, d, 20);
        assert_eq!(s.astar(&g, a, d), vec![a, d]);
    }

    #[test]
    fn removed_portals_are_skipped() {
        let (mut g, [a, b, c, d]) = diamond();
        g.remove_portal(b);
        assert_eq!(PortalSearch::new().astar(&g, a, d), vec![a, c, d]);
        assert!(PortalSearch::new().astar(&g, a, b).is_empty());
    }

    #[test]
    fn heuristic_is_the_box_gap() {
        let (g, [a, b, c, d]) = diamond();
        assert_eq!(heuristic(&g, a, b), 4);
        assert_eq!(heuristic(&g, a, c), 6);
        assert_eq!(heuristic(&g, c, d), 8);
        assert_eq!(heuristic(&g, a, PortalId(99)), 0);
    }
}
