use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::prelude::*;
use tilepath_core::{Point, Range, Tile, TileGrid, TileLayout, TileStore};
use tilepath_gen::DungeonGen;
use tilepath_hpa::{
    HierarchicalPathfinder, PathState, PathfinderConfig, PortalGraph, PortalId, PortalSearch,
    TileSolver, heuristic,
};

// Two 4x4 tiles joined by a single doorway on row 1.
const DOORWAY: &str = "
...#....
........
...#....
...#....
";

fn config(tile_split: i32) -> PathfinderConfig {
    PathfinderConfig {
        tile_split,
        ..PathfinderConfig::default()
    }
}

fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

fn assert_graph_consistent(g: &PortalGraph) {
    for (id, p) in g.iter() {
        for c in p.connections() {
            assert_eq!(g.connection_cost(c.target, id), Some(c.cost), "asymmetric edge {id}");
            assert!(
                heuristic(g, id, c.target) <= c.cost,
                "heuristic overestimates edge {id} -> {}",
                c.target
            );
        }
    }
}

#[test]
fn single_doorway_route() {
    let grid = TileGrid::from_ascii(DOORWAY).unwrap();
    let mut pf = HierarchicalPathfinder::build(&grid, config(4)).unwrap();
    assert_eq!(pf.graph().len(), 1);

    let (from, to) = (Point::new(0, 3), Point::new(6, 0));
    pf.find_path(&grid, from, to);

    let path = pf.coarse_path().to_vec();
    assert_eq!(path.len(), 3);
    let (start, end) = pf.endpoint_portals().unwrap();
    assert_eq!(path[0], start);
    assert_eq!(path[2], end);

    // Each leg is the walk to the doorway plus the step across it.
    let g = pf.graph();
    let to_door = manhattan(from, Point::new(3, 1)) + 1;
    let from_door = manhattan(to, Point::new(4, 1)) + 1;
    assert_eq!(g.connection_cost(start, path[1]), Some(to_door));
    assert_eq!(g.connection_cost(path[1], end), Some(from_door));
    assert_graph_consistent(g);
}

#[test]
fn moving_the_start_rewires_only_the_start() {
    let grid = TileGrid::from_ascii(DOORWAY).unwrap();
    let mut pf = HierarchicalPathfinder::build(&grid, config(4)).unwrap();
    let to = Point::new(6, 0);
    pf.find_path(&grid, Point::new(0, 3), to);
    let goal_field = pf.fine_cache().field(1).cloned();
    let before = pf.stats();

    pf.find_path(&grid, Point::new(1, 3), to);
    let after = pf.stats();
    assert_eq!(after.start_rewires, before.start_rewires + 1);
    assert_eq!(after.end_rewires, before.end_rewires);
    assert_eq!(after.coarse_searches, before.coarse_searches + 1);
    assert_eq!(after.fine_rebuilds, before.fine_rebuilds + 1);

    // The goal tile was recomputed, with the same values.
    assert_eq!(pf.fine_cache().field(1).cloned(), goal_field);
    assert_eq!(pf.detailed_path(Point::new(1, 3)).len(), 5);
}

#[test]
fn same_query_twice_changes_nothing() {
    let grid = TileGrid::from_ascii(DOORWAY).unwrap();
    let mut pf = HierarchicalPathfinder::build(&grid, config(4)).unwrap();
    pf.find_path(&grid, Point::new(0, 3), Point::new(6, 0));
    let path = pf.coarse_path().to_vec();
    let tiles = pf.fine_cache().tiles();
    let fields: Vec<_> = tiles.iter().map(|&t| pf.fine_cache().field(t).cloned()).collect();
    let stats = pf.stats();

    pf.find_path(&grid, Point::new(0, 3), Point::new(6, 0));
    assert_eq!(pf.stats(), stats);
    assert_eq!(pf.coarse_path(), path.as_slice());
    assert_eq!(pf.fine_cache().tiles(), tiles);
    let again: Vec<_> = tiles.iter().map(|&t| pf.fine_cache().field(t).cloned()).collect();
    assert_eq!(again, fields);
}

#[test]
fn untouched_tile_has_no_guidance() {
    let grid = TileGrid::from_ascii(
        "
...#....
........
...#....
########
........
........
........
........
",
    )
    .unwrap();
    let mut pf = HierarchicalPathfinder::build(&grid, config(4)).unwrap();
    pf.find_path(&grid, Point::new(0, 0), Point::new(6, 0));
    assert_eq!(pf.state(), PathState::HasPath);
    assert_eq!(pf.fine_cache().tiles(), vec![0, 1]);
    assert!(pf.detailed_path(Point::new(1, 5)).is_empty());
    assert!(pf.detailed_path(Point::new(6, 6)).is_empty());
    assert!(!pf.detailed_path(Point::new(0, 0)).is_empty());
}

#[test]
fn walled_off_goal_has_no_path() {
    let grid = TileGrid::from_ascii(
        "
...#....
...#....
...#....
...#....
",
    )
    .unwrap();
    let mut pf = HierarchicalPathfinder::build(&grid, config(4)).unwrap();
    pf.find_path(&grid, Point::new(0, 0), Point::new(6, 0));
    assert_eq!(pf.state(), PathState::NoPath);
    assert!(pf.coarse_path().is_empty());
    assert!(pf.fine_cache().is_empty());
    assert!(pf.detailed_path(Point::new(0, 0)).is_empty());
}

#[test]
fn generated_dungeons_route_and_stay_consistent() {
    for seed in 0..8 {
        let layout = TileLayout::new(32, 24, 8).unwrap();
        let grid = DungeonGen::new(StdRng::seed_from_u64(seed)).rooms(layout, 0.4);
        let mut pf = HierarchicalPathfinder::build(&grid, config(8)).unwrap();
        assert_graph_consistent(pf.graph());

        let (from, to) = (Point::new(1, 1), Point::new(30, 22));
        pf.find_path(&grid, from, to);
        assert_eq!(pf.state(), PathState::HasPath, "seed {seed}");
        assert_graph_consistent(pf.graph());

        // Rooms are joined through doors only, so the route visits at
        // least one doorway per tile column and row it has to cross.
        let path = pf.coarse_path();
        assert!(path.len() >= 2 + 3 + 2, "seed {seed}: {path:?}");
        for w in path.windows(2) {
            assert!(pf.graph().connection_cost(w[0], w[1]).is_some());
        }
        assert_eq!(pf.fine_cache().tiles().first(), Some(&0));

        let steps = pf.detailed_path(from);
        assert_eq!(steps.first(), Some(&from));
        for w in steps.windows(2) {
            assert_eq!(manhattan(w[0], w[1]), 1);
            assert!(grid.is_walkable(w[1]));
            assert_eq!(layout.tile_index(w[1]), layout.tile_index(from));
        }
    }
}

#[test]
fn disconnect_leaves_no_references() {
    let layout = TileLayout::new(32, 32, 8).unwrap();
    let grid = DungeonGen::new(StdRng::seed_from_u64(5)).rooms(layout, 1.0);
    let mut graph = PortalGraph::from_store(&grid, layout, &mut TileSolver::new());
    let victims: Vec<_> = graph.iter().map(|(id, _)| id).step_by(3).collect();
    assert!(!victims.is_empty());

    for &v in &victims {
        graph.disconnect_portal(v);
    }
    for (id, p) in graph.iter() {
        for &v in &victims {
            assert!(p.cost_to(v).is_none(), "{id} still points at {v}");
        }
    }
    for tile in 0..layout.tile_count() {
        for &v in &victims {
            assert!(!graph.tile_portals(tile).contains(&v));
        }
    }
    assert_graph_consistent(&graph);
}

/// Cheapest connection cost from `from` to every portal slot.
fn graph_distances(g: &PortalGraph, from: PortalId) -> Vec<Option<i32>> {
    let mut dist = vec![None; g.slot_count()];
    let mut open = BinaryHeap::new();
    dist[from.0] = Some(0);
    open.push(Reverse((0, from.0)));
    while let Some(Reverse((d, i))) = open.pop() {
        if dist[i].is_some_and(|best| d > best) {
            continue;
        }
        let Some(p) = g.portal(PortalId(i)) else {
            continue;
        };
        for c in p.connections() {
            let nd = d + c.cost;
            if dist[c.target.0].is_none_or(|best| nd < best) {
                dist[c.target.0] = Some(nd);
                open.push(Reverse((nd, c.target.0)));
            }
        }
    }
    dist
}

fn route_cost(g: &PortalGraph, route: &[PortalId]) -> Option<i32> {
    if route.is_empty() {
        return None;
    }
    route
        .windows(2)
        .map(|w| g.connection_cost(w[0], w[1]))
        .sum()
}

fn random_floor_cell(grid: &TileGrid, rng: &mut StdRng) -> Point {
    loop {
        let p = Point::new(
            rng.random_range(0..grid.width()),
            rng.random_range(0..grid.height()),
        );
        if grid.is_walkable(p) {
            return p;
        }
    }
}

/// Open 24x24 map with `walls` random wall cells.
fn scattered_walls(rng: &mut StdRng, walls: usize) -> TileGrid {
    let mut grid = TileGrid::new(24, 24);
    grid.fill(grid.range(), Tile::Floor);
    for _ in 0..walls {
        let p = Point::new(rng.random_range(0..24), rng.random_range(0..24));
        grid.set(p, Tile::Wall);
    }
    grid
}

/// Connect two random floor cells and check the portal route against an
/// exhaustive search over the same graph.
fn assert_route_is_optimal(grid: &TileGrid, tile_split: i32, rng: &mut StdRng) {
    let layout = TileLayout::for_store(grid, tile_split).unwrap();
    let mut solver = TileSolver::new();
    let mut g = PortalGraph::from_store(grid, layout, &mut solver);
    let (a, b) = (random_floor_cell(grid, rng), random_floor_cell(grid, rng));
    let start = g.add_portal(Range::cell(a));
    g.connect_portal(start, grid, &mut solver);
    let end = g.add_portal(Range::cell(b));
    g.connect_portal(end, grid, &mut solver);

    let route = PortalSearch::new().astar(&g, start, end);
    let best = graph_distances(&g, start)[end.0];
    assert_eq!(route_cost(&g, &route), best, "{a} -> {b}: {route:?}");
}

#[test]
fn portal_routes_are_optimal() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..60 {
        let grid = scattered_walls(&mut rng, 120);
        assert_route_is_optimal(&grid, 6, &mut rng);
    }
    for seed in 0..20 {
        let mut dungeon = DungeonGen::new(StdRng::seed_from_u64(seed));
        let (cave, _) = dungeon.random_walk_cave(24, 24, 0.5, 40);
        assert_route_is_optimal(&cave, 6, &mut rng);
        let layout = TileLayout::new(32, 32, 8).unwrap();
        let rooms = dungeon.rooms(layout, 0.5);
        assert_route_is_optimal(&rooms, 8, &mut rng);
    }
}

#[test]
fn heuristic_never_exceeds_the_cheapest_route() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..4 {
        let grid = scattered_walls(&mut rng, 120);
        let layout = TileLayout::for_store(&grid, 6).unwrap();
        let g = PortalGraph::from_store(&grid, layout, &mut TileSolver::new());
        for (from, _) in g.iter() {
            for (to, d) in graph_distances(&g, from).into_iter().enumerate() {
                let Some(d) = d else {
                    continue;
                };
                let h = heuristic(&g, from, PortalId(to));
                assert!(h <= d, "{from} -> #{to}: heuristic {h} > cost {d}");
            }
        }
    }
}
