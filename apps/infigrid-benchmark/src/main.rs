//! Infigrid benchmark
//!
//! Loads a row of objects far from the origin, queries and unloads them,
//! logging how long each phase takes.
//!
//! `INFIGRID_OBJECTS` sets the object count and `INFIGRID_DIGITS` the number
//! of decimal digits in the block coordinates.

use std::time::Instant;

use anyhow::{bail, Context};
use infigrid_core::{int_frac_distance, BlockAddress, GridPoint};
use infigrid_world::{GridConfig, GridObject, InfiniteGrid, ObjectId, SequentialIds};
use num_bigint::BigInt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_OBJECTS: u32 = 2_000;
const DEFAULT_DIGITS: u32 = 60;
/// Objects wider than this many blocks are refused.
const MAX_OBJECT_SPAN: u64 = 64;

fn env_or(name: &str, default: u32) -> anyhow::Result<u32> {
    std::env::var(name)
        .ok()
        .map(|value| value.parse::<u32>())
        .transpose()
        .with_context(|| format!("{name} must be a non-negative integer"))
        .map(|value| value.unwrap_or(default))
}

/// Deterministic offset in `[0, 1)` so runs are comparable.
fn offset(seed: u32) -> f64 {
    f64::from(seed.wrapping_mul(7_919) % 1_000) / 1_000.0
}

fn build_objects(origin: &BigInt, count: u32) -> anyhow::Result<Vec<GridObject<u32>>> {
    let mut ids = SequentialIds::new("bench");
    (0..count)
        .map(|i| -> anyhow::Result<GridObject<u32>> {
            let x = origin + i * 2u32;
            let width = 1 + i % 3;
            let start = GridPoint::from_parts(
                BlockAddress::new(x.clone(), origin.clone(), -origin),
                [offset(i), offset(i + 1), offset(i + 2)],
            )?;
            let end = GridPoint::from_parts(
                BlockAddress::new(x + width, origin + 1u32, -origin + 1u32),
                [offset(i + 3), offset(i + 4), offset(i + 5)],
            )?;
            Ok(GridObject::builder(start, end, i).build_with(&mut ids)?)
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let count = env_or("INFIGRID_OBJECTS", DEFAULT_OBJECTS)?;
    let digits = env_or("INFIGRID_DIGITS", DEFAULT_DIGITS)?.max(1);
    let origin = BigInt::from(10u32).pow(digits - 1) + 12_345u32;
    info!(objects = count, digits, "Infigrid benchmark");

    let started = Instant::now();
    let objects = build_objects(&origin, count)?;
    info!(
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "built objects"
    );

    let uids: Vec<ObjectId> = objects.iter().map(|o| o.uid().clone()).collect();
    let first = objects.first().map(|o| o.center_point());
    let last = objects.last().map(|o| o.center_point());

    let started = Instant::now();
    let config = GridConfig::with_max_object_span(MAX_OBJECT_SPAN);
    let mut grid = InfiniteGrid::from_objects_with(config, objects)?;
    info!(
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        objects = grid.len(),
        blocks = grid.block_count(),
        "inserted objects"
    );

    let started = Instant::now();
    let mut hits = 0usize;
    for uid in &uids {
        if let Some(home) = grid.home_block(uid) {
            hits += grid.objects_in_block(home).len();
        }
    }
    info!(
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        hits,
        "queried home blocks"
    );

    let started = Instant::now();
    let probe = GridObject::builder(
        GridPoint::from_parts(
            BlockAddress::new(origin.clone(), origin.clone(), -&origin),
            [0.0; 3],
        )?,
        GridPoint::from_parts(
            BlockAddress::new(&origin + 7u32, &origin + 1u32, -&origin + 1u32),
            [0.5; 3],
        )?,
        (),
    )
    .uid("probe")
    .build()?;
    let found = grid.intersecting(&probe)?;
    info!(
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        found = found.len(),
        "probe query"
    );

    if let (Some(first), Some(last)) = (first, last) {
        let (whole, fraction) = int_frac_distance(first.block(), last.block());
        let (exact_whole, exact_fraction) = first.distance(&last);
        debug!(%whole, fraction, %exact_whole, exact_fraction, "first to last");
    }

    let started = Instant::now();
    for uid in &uids {
        grid.remove_object(uid);
    }
    info!(
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "removed objects"
    );

    if !grid.is_empty() || grid.block_count() != 0 {
        bail!(
            "grid not empty after removal: {} objects, {} blocks",
            grid.len(),
            grid.block_count()
        );
    }
    Ok(())
}
