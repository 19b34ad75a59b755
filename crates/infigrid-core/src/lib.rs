//! Core coordinate types and exact arithmetic for the Infigrid spatial index.
//!
//! This crate provides the foundations the index is built on:
//! - Arbitrary-precision integer primitives (square root, floor division)
//! - The coordinate model (block addresses, block keys, local offsets)
//! - Geometry (distance decomposition, carry-aware midpoints)
//! - `GridPoint`, a full-precision world position

pub mod coords;
pub mod error;
pub mod geometry;
pub mod math;
pub mod point;

pub use coords::{
    address_to_index, index_to_address, Axis, BlockAddress, BlockIndex, BlockKey, LocalPoint,
    LocalValue,
};
pub use error::{Error, Result};
pub use geometry::{int_frac_distance, midpoint, midpoint_1d, point_distance};
pub use math::{div_floor, isqrt};
pub use point::GridPoint;

pub use num_bigint::BigInt;
