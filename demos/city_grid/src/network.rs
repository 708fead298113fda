//! Synthetic grid city.
//!
//! ```text
//!   0 ─ 1 ─ 2
//!   │   │   │
//!   3 ─ 4 ─ 5
//! ```
//!
//! Intersection `(row, col)` has id `row * width + col`.  Neighbours are
//! joined by two-way roads with a random weight in `1..=max_weight`.

use anyhow::{Result, bail, ensure};

use fleet_core::{NodeId, SimRng};
use fleet_spatial::{RoadNetwork, RoadNetworkBuilder};

pub fn build_grid(width: u32, height: u32, max_weight: u32, rng: &mut SimRng) -> Result<RoadNetwork> {
    ensure!(width > 0 && height > 0, "grid must be at least 1x1, got {width}x{height}");
    ensure!(max_weight > 0, "max road weight must be positive");
    let Some(node_count) = width.checked_mul(height) else {
        bail!("a {width}x{height} grid has too many intersections");
    };

    let node = |row: u32, col: u32| NodeId(row * width + col);
    let mut b = RoadNetworkBuilder::new(node_count as usize);
    for row in 0..height {
        for col in 0..width {
            if col + 1 < width {
                b.add_road(node(row, col), node(row, col + 1), rng.gen_range(1..=max_weight));
            }
            if row + 1 < height {
                b.add_road(node(row, col), node(row + 1, col), rng.gen_range(1..=max_weight));
            }
        }
    }
    Ok(b.build()?)
}
