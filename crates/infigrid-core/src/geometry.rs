//! Distance and midpoint over unbounded coordinates.
//!
//! Everything that can grow with the coordinates stays in arbitrary-precision
//! integers. Only the final sub-unit remainder, which is bounded to `[0, 1)`,
//! is narrowed to `f64`, so precision never degrades far from the origin.
//!
//! Fractions are computed in Q53 fixed point: an integer `v` stands for
//! `v / 2^53`, the resolution of an `f64` mantissa.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::Zero;

use crate::coords::{Axis, BlockAddress, LocalPoint, LocalValue};
use crate::math::{half_floor, isqrt_unsigned};

/// Fractional bits of the fixed-point representation (IEEE-754 mantissa width).
pub const MANTISSA_BITS: u32 = 53;

/// Upper bound on Newton steps when refining a fractional distance.
///
/// The first-order seed is within `1 / (2s)` of the root and every step
/// roughly squares the relative error, so even `s = 1` settles after seven
/// steps. The cap only guards against a non-terminating loop.
pub const MAX_REFINEMENT_STEPS: usize = 16;

const SCALE: f64 = (1u64 << MANTISSA_BITS) as f64;
const FRACTION_MASK: u64 = (1u64 << MANTISSA_BITS) - 1;

/// Euclidean distance between two blocks as `(integer part, fraction)`.
///
/// The fraction lies in `[0, 1)` and is accurate to `2^-53`.
pub fn int_frac_distance(a: &BlockAddress, b: &BlockAddress) -> (BigInt, f64) {
    let squared = squared_block_distance(a, b);
    let root = isqrt_unsigned(&squared);
    let remainder = &squared - &root * &root;
    if remainder.is_zero() {
        return (BigInt::from(root), 0.0);
    }

    // A nonzero remainder means squared >= 2, so root >= 1.
    let base = &root << MANTISSA_BITS;
    let seed = (remainder << MANTISSA_BITS) / (&root << 1u32);
    let target = &squared << (2 * MANTISSA_BITS);

    let mut x = &base + seed;
    for step in 0..MAX_REFINEMENT_STEPS {
        let next = (&x + &target / &x) >> 1u32;
        // The first step lands on or above the root; afterwards the sequence
        // only decreases until it reaches floor(sqrt(target)).
        if step > 0 && next >= x {
            break;
        }
        x = next;
    }

    let fraction = fixed_to_fraction(&(x - base));
    (BigInt::from(root), fraction)
}

/// Midpoint of `(t1 + f1)` and `(t2 + f2)` on a single axis.
///
/// The integer part is reconstructed exactly; an odd tile sum contributes
/// the half unit that floor division drops.
pub fn midpoint_1d(
    t1: &BigInt,
    f1: LocalValue,
    t2: &BigInt,
    f2: LocalValue,
) -> (BigInt, LocalValue) {
    let tile_sum = t1 + t2;
    let mut tile = half_floor(&tile_sum);
    let mut offset = 0.5 * (f1.get() + f2.get());
    if tile_sum.is_odd() {
        offset += 0.5;
    }

    if offset >= 1.0 {
        offset -= 1.0;
        tile += 1u32;
    }
    if offset >= 1.0 {
        offset = 0.0;
        tile += 1u32;
    }

    (tile, LocalValue::new_unchecked(offset))
}

/// Midpoint of two world positions, applying [`midpoint_1d`] per axis.
pub fn midpoint(
    a: &BlockAddress,
    la: &LocalPoint,
    b: &BlockAddress,
    lb: &LocalPoint,
) -> (BlockAddress, LocalPoint) {
    let [(x, lx), (y, ly), (z, lz)] =
        Axis::ALL.map(|axis| midpoint_1d(a.get(axis), la.get(axis), b.get(axis), lb.get(axis)));
    (BlockAddress { x, y, z }, LocalPoint::from_values(lx, ly, lz))
}

/// Euclidean distance between two world positions, local offsets included.
///
/// Each axis delta is expressed exactly in Q53 (local values are rounded to
/// the nearest `2^-53`), so the integer square root of the summed squares is
/// `floor(distance * 2^53)` with no intermediate narrowing.
pub fn point_distance(
    a: &BlockAddress,
    la: &LocalPoint,
    b: &BlockAddress,
    lb: &LocalPoint,
) -> (BigInt, f64) {
    let squared = Axis::ALL
        .iter()
        .map(|&axis| {
            let blocks: BigInt = (b.get(axis) - a.get(axis)) << MANTISSA_BITS;
            let delta = blocks + to_fixed(lb.get(axis)) - to_fixed(la.get(axis));
            let magnitude = delta.magnitude();
            magnitude * magnitude
        })
        .fold(BigUint::zero(), |acc, sq| acc + sq);

    let root = isqrt_unsigned(&squared);
    let integer = &root >> MANTISSA_BITS;
    let fraction = fixed_to_fraction(&(&root - (&integer << MANTISSA_BITS)));
    (BigInt::from(integer), fraction)
}

fn squared_block_distance(a: &BlockAddress, b: &BlockAddress) -> BigUint {
    Axis::ALL
        .iter()
        .map(|&axis| {
            let delta = b.get(axis) - a.get(axis);
            let magnitude = delta.magnitude();
            magnitude * magnitude
        })
        .fold(BigUint::zero(), |acc, sq| acc + sq)
}

/// Nearest Q53 integer to a local value. Exact for values that are already
/// multiples of `2^-53`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_fixed(value: LocalValue) -> BigInt {
    BigInt::from((value.get() * SCALE).round() as u64)
}

/// Narrow a Q53 residual below `2^53` to an `f64` in `[0, 1)`.
#[allow(clippy::cast_precision_loss)]
fn fixed_to_fraction(fixed: &BigUint) -> f64 {
    let bits = fixed.iter_u64_digits().next().unwrap_or(0).min(FRACTION_MASK);
    bits as f64 / SCALE
}
