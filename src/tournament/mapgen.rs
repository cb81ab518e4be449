//! Deterministic map generation for tournaments.
//!
//! Boards are point-symmetric about their centre so neither seat starts with
//! a terrain advantage.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::game::{Coord, Layout, RulesConfig, Terrain};

/// Smallest board a layout fits on.
pub const MIN_BOARD_SIZE: u16 = 7;

/// Nexus positions on the reference 11x11 board, before mirroring.
const NEXUS_SEEDS: [(u16, u16); 3] = [(2, 3), (5, 2), (8, 3)];

/// Error type for map generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapGenError {
    /// The board cannot hold the objectives.
    #[error("board size {0} is below the minimum of {MIN_BOARD_SIZE}")]
    TooSmall(u16),
    /// No column leaves the spawners and hearts clear of the nexuses.
    #[error("no free column for spawners on a {0}x{0} board")]
    NoSpawnColumn(u16),
}

/// Generate a layout for a square board of `rules.board_size`.
///
/// # Errors
///
/// Returns an error if the board is too small or no spawner column is free.
pub fn generate_layout(seed: u64, rules: &RulesConfig) -> Result<Layout, MapGenError> {
    let size = rules.board_size;
    if size < MIN_BOARD_SIZE {
        return Err(MapGenError::TooSmall(size));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut layout = Layout::open(size, size).ok_or(MapGenError::TooSmall(size))?;

    let nexuses = nexus_positions(size);
    for &at in &nexuses {
        layout = layout.with_nexus(at);
    }

    let columns: Vec<u16> = (0..size)
        .filter(|&px| {
            let own = [Coord::new(px, size - 3), Coord::new(px, size - 1)];
            own.iter().all(|c| !nexuses.contains(c) && !nexuses.contains(&mirror(*c, size)))
        })
        .collect();
    if columns.is_empty() {
        return Err(MapGenError::NoSpawnColumn(size));
    }
    let px = columns[rng.random_range(0..columns.len())];
    let ax = size - 1 - px;
    layout = layout
        .with_spawner(1, Coord::new(px, size - 3))
        .with_heart(1, Coord::new(px, size - 1))
        .with_spawner(2, Coord::new(ax, 2))
        .with_heart(2, Coord::new(ax, 0));

    carve_river(&mut layout, size, &mut rng);
    scatter(&mut layout, size, &mut rng, Terrain::Forest);
    scatter(&mut layout, size, &mut rng, Terrain::Mountain);
    Ok(layout)
}

/// The tile opposite `at` through the board centre.
const fn mirror(at: Coord, size: u16) -> Coord {
    Coord::new(size - 1 - at.x, size - 1 - at.y)
}

fn scale(c: u16, size: u16) -> u16 {
    let scaled = (u32::from(c) * u32::from(size - 1) + 5) / 10;
    u16::try_from(scaled).unwrap_or(size - 1)
}

/// Seven nexuses: three seeds, their mirrors and the centre.
fn nexus_positions(size: u16) -> Vec<Coord> {
    let half = (size - 1) / 2;
    let mut positions: Vec<Coord> = NEXUS_SEEDS
        .iter()
        .map(|&(x, y)| Coord::new(scale(x, size), scale(y, size)))
        .collect();
    let mirrored: Vec<Coord> = positions.iter().map(|&c| mirror(c, size)).collect();
    positions.push(Coord::new(half, half));
    positions.extend(mirrored);
    positions.dedup();
    positions
}

/// Paint a tile and its mirror, unless either is reserved or `keep` says no.
fn paint(layout: &mut Layout, size: u16, at: Coord, terrain: Terrain, keep: &[Terrain]) {
    let twin = mirror(at, size);
    if layout.is_reserved(at) || layout.is_reserved(twin) {
        return;
    }
    for tile in [at, twin] {
        let current = layout.board.terrain(tile);
        if current.is_some_and(|t| !keep.contains(&t)) {
            layout.board.set_terrain(tile, terrain);
        }
    }
}

/// Water across the middle row, 70% per column, sometimes two rows deep.
fn carve_river(layout: &mut Layout, size: u16, rng: &mut StdRng) {
    let mid = size / 2;
    for x in 1..=(size - 1) / 2 {
        if rng.random::<f64>() >= 0.7 {
            continue;
        }
        paint(layout, size, Coord::new(x, mid), Terrain::Water, &[]);
        if rng.random::<f64>() < 0.25 && mid + 1 < size {
            paint(layout, size, Coord::new(x, mid + 1), Terrain::Water, &[]);
        }
    }
}

/// Forests avoid the first and last rows; mountains keep two rows clear of
/// each edge. Neither overwrites water, and mountains keep forests.
fn scatter(layout: &mut Layout, size: u16, rng: &mut StdRng, terrain: Terrain) {
    let (attempts, margin, keep): (u32, u16, &[Terrain]) = match terrain {
        Terrain::Mountain => (u32::from(size) * 6 / 10, 2, &[Terrain::Water, Terrain::Forest]),
        _ => (u32::from(size) * 12 / 10, 1, &[Terrain::Water]),
    };
    let span = (size / 2).saturating_sub(1).max(1);
    for _ in 0..attempts {
        let x = 1 + rng.random_range(0..span);
        let y = rng.random_range(0..size);
        if y < margin || y >= size - margin {
            continue;
        }
        paint(layout, size, Coord::new(x, y), terrain, keep);
    }
}
