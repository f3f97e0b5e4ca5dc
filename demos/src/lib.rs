//! Shared code for the tilepath demos: ASCII rendering of a map with the
//! portals of the current coarse path and the fine path walked across it.

use tilepath_core::{Point, TileGrid, TileStore};
use tilepath_hpa::HierarchicalPathfinder;

pub const WIDTH: i32 = 48;
pub const HEIGHT: i32 = 24;
pub const TILE_SPLIT: i32 = 8;

/// Follow the fine guidance from `from`, re-querying in every tile, until the
/// goal is reached or no progress is possible.
///
/// Each detailed path ends on a portal cell; the walker then steps across
/// the boundary into the next tile on the coarse route before asking again.
pub fn walk(pf: &HierarchicalPathfinder, from: Point) -> Vec<Point> {
    let goal = pf.endpoints().1;
    let mut route = vec![from];
    let mut cur = from;
    let limit = pf.layout().grid_range().len().max(1);

    while Some(cur) != goal && route.len() < limit {
        let leg = pf.detailed_path(cur);
        if leg.len() > 1 {
            route.extend_from_slice(&leg[1..]);
            cur = leg[leg.len() - 1];
            continue;
        }
        // Stuck on a portal cell: step over into a neighbouring tile that
        // has guidance and was not visited yet.
        let here = pf.layout().tile_index(cur);
        let next = cur.neighbors_4().into_iter().find(|&n| {
            let tile = pf.layout().tile_index(n);
            tile.is_some()
                && tile != here
                && !pf.detailed_path(n).is_empty()
                && !route.contains(&n)
        });
        match next {
            Some(n) => {
                route.push(n);
                cur = n;
            }
            None => break,
        }
    }
    route
}

/// Draw the map: `#` wall, `.` floor, `+` coarse path portal cells, `*` the
/// walked route, `S`/`G` the endpoints.
pub fn render(grid: &TileGrid, pf: &HierarchicalPathfinder, route: &[Point]) -> String {
    let mut rows: Vec<Vec<char>> = (0..grid.height())
        .map(|y| {
            (0..grid.width())
                .map(|x| if grid.is_walkable(Point::new(x, y)) { '.' } else { '#' })
                .collect()
        })
        .collect();
    let mut put = |p: Point, ch: char| {
        if grid.range().contains(p) {
            rows[p.y as usize][p.x as usize] = ch;
        }
    };

    for id in pf.coarse_path() {
        if let Some(portal) = pf.graph().portal(*id) {
            for p in portal.bounds() {
                put(p, '+');
            }
        }
    }
    for &p in route {
        put(p, '*');
    }
    let (from, to) = pf.endpoints();
    if let Some(p) = from {
        put(p, 'S');
    }
    if let Some(p) = to {
        put(p, 'G');
    }

    let mut out = String::new();
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}
