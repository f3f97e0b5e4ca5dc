//! Generate a rooms dungeon, route across it and print the result.
//!
//! Run: cargo run --bin pathmap [seed]

use rand::SeedableRng;
use rand::rngs::StdRng;
use tilepath_core::{Point, TileLayout};
use tilepath_demos::{HEIGHT, TILE_SPLIT, WIDTH, render, walk};
use tilepath_gen::DungeonGen;
use tilepath_hpa::{HierarchicalPathfinder, PathState, PathfinderConfig};

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    let layout = match TileLayout::new(WIDTH, HEIGHT, TILE_SPLIT) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let grid = DungeonGen::new(StdRng::seed_from_u64(seed)).rooms(layout, 0.35);

    let config = PathfinderConfig {
        tile_split: TILE_SPLIT,
        ..PathfinderConfig::default()
    };
    let mut pf = match HierarchicalPathfinder::build(&grid, config) {
        Ok(pf) => pf,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let from = Point::new(1, 1);
    let to = Point::new(WIDTH - TILE_SPLIT + 1, HEIGHT - TILE_SPLIT + 1);
    pf.find_path(&grid, from, to);

    let route = if pf.state() == PathState::HasPath {
        walk(&pf, from)
    } else {
        Vec::new()
    };

    print!("{}", render(&grid, &pf, &route));
    println!(
        "seed {seed}: {} portals, {:?}, coarse path {} portals, route {} cells",
        pf.graph().len(),
        pf.state(),
        pf.coarse_path().len(),
        route.len()
    );
}
