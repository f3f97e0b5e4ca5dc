//! Dungeon generators for tilepath.
//!
//! Provides two generators, both producing a [`TileGrid`]:
//! - **Rooms**: one walled room per tile, joined by single-cell doors. The
//!   doors always include a random spanning tree, so every room is reachable.
//! - **Random Walk Cave**: a drunk walk carving floor out of solid rock.

use std::collections::HashSet;

use rand::prelude::*;
use tilepath_core::{Point, Range, Tile, TileGrid, TileLayout};

/// Dungeon generator driven by a random number generator.
pub struct DungeonGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> DungeonGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Carve one room per tile of `layout`.
    ///
    /// Each room's floor is its tile minus the last column and row, which
    /// form the wall shared with the next tiles. Neighbouring rooms are
    /// joined by a door in that wall: always along a random spanning tree,
    /// and with probability `door_chance` for every other neighbouring pair.
    /// Tiles smaller than 2×2 have no floor and get no doors.
    pub fn rooms(&mut self, layout: TileLayout, door_chance: f64) -> TileGrid {
        let size = layout.grid_range().size();
        let mut grid = TileGrid::new(size.x, size.y);
        if layout.tile_split() < 2 {
            return grid;
        }
        let tiles = layout.tiles_size();
        let tile_grid = Range::new(0, 0, tiles.x, tiles.y);

        for t in tile_grid {
            grid.fill(room_floor(layout, t), Tile::Floor);
        }

        // Randomized depth-first walk over the tiles.
        let mut doors: HashSet<(Point, Point)> = HashSet::new();
        let mut visited = vec![false; layout.tile_count()];
        let mut stack = Vec::new();
        if !tile_grid.is_empty() {
            visited[0] = true;
            stack.push(Point::ZERO);
        }
        while let Some(&cur) = stack.last() {
            let options: Vec<Point> = cur
                .neighbors_4()
                .into_iter()
                .filter(|&n| tile_grid.contains(n) && !visited[layout.index_of_tile(n)])
                .collect();
            if options.is_empty() {
                stack.pop();
                continue;
            }
            let next = options[self.rng.random_range(0..options.len())];
            self.open_door(&mut grid, layout, cur, next);
            doors.insert(door_key(cur, next));
            visited[layout.index_of_tile(next)] = true;
            stack.push(next);
        }

        let p = door_chance.clamp(0.0, 1.0);
        for t in tile_grid {
            for n in [t.shift(1, 0), t.shift(0, 1)] {
                if !tile_grid.contains(n) || doors.contains(&door_key(t, n)) {
                    continue;
                }
                if self.rng.random_bool(p) {
                    self.open_door(&mut grid, layout, t, n);
                    doors.insert(door_key(t, n));
                }
            }
        }

        log::debug!(
            "rooms dungeon {}x{}: {} rooms, {} doors",
            size.x,
            size.y,
            layout.tile_count(),
            doors.len()
        );
        grid
    }

    /// Punch a door through the wall between neighbouring tiles `a` and `b`.
    fn open_door(&mut self, grid: &mut TileGrid, layout: TileLayout, a: Point, b: Point) {
        let (a, b) = door_key(a, b);
        let floor = room_floor(layout, a);
        let door = if b.x > a.x {
            let y = self.rng.random_range(floor.min.y..floor.max.y);
            Point::new(floor.max.x, y)
        } else {
            let x = self.rng.random_range(floor.min.x..floor.max.x);
            Point::new(x, floor.max.y)
        };
        grid.set(door, Tile::Floor);
    }

    /// Carve a cave by random walks starting from the centre.
    ///
    /// Performs up to `walks` walks of bounded length, stopping as soon as
    /// the share of floor cells reaches `fill_pct` (0.0–1.0). Returns the
    /// grid and the number of cells carved.
    pub fn random_walk_cave(
        &mut self,
        width: i32,
        height: i32,
        fill_pct: f64,
        walks: usize,
    ) -> (TileGrid, usize) {
        let mut grid = TileGrid::new(width, height);
        let bounds = grid.range();
        let total = bounds.len();
        let target = (total as f64 * fill_pct.clamp(0.0, 1.0)) as usize;
        let start = Point::new(width / 2, height / 2);
        let mut carved = 0usize;

        'walks: for _ in 0..walks {
            let mut pos = start;
            for _ in 0..total * 4 {
                if carved >= target {
                    break 'walks;
                }
                if grid.at(pos) == Some(Tile::Wall) {
                    grid.set(pos, Tile::Floor);
                    carved += 1;
                }
                let next = pos.neighbors_4()[self.rng.random_range(0..4usize)];
                if bounds.contains(next) {
                    pos = next;
                }
            }
        }

        (grid, carved)
    }
}

/// Floor of the room in tile `t`: the tile without its last column and row.
fn room_floor(layout: TileLayout, t: Point) -> Range {
    let r = layout.tile_range(t);
    Range {
        min: r.min,
        max: r.max.shift(-1, -1),
    }
}

/// Unordered pair of tiles, smallest first.
fn door_key(a: Point, b: Point) -> (Point, Point) {
    if a <= b { (a, b) } else { (b, a) }
}
