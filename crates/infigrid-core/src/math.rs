//! Exact integer primitives over arbitrary-precision integers.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

use crate::error::{Error, Result};

/// Integer square root, `floor(sqrt(n))`.
pub fn isqrt(n: &BigInt) -> Result<BigInt> {
    if n.is_negative() {
        return Err(Error::Domain(format!("square root of negative number {n}")));
    }
    Ok(BigInt::from(isqrt_unsigned(n.magnitude())))
}

/// Integer square root of a magnitude.
///
/// Babylonian iteration seeded with a power of two no smaller than the root,
/// so the sequence decreases monotonically until it settles on the floor.
pub fn isqrt_unsigned(n: &BigUint) -> BigUint {
    if *n < BigUint::from(2u32) {
        return n.clone();
    }

    let shift = (n.bits() + 1) >> 1;
    let mut x = BigUint::one() << shift;
    loop {
        let y = (&x + n / &x) >> 1u32;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Floor division: the largest integer `q` with `q <= n / d`.
///
/// `BigInt` division truncates toward zero, which rounds up for negative
/// quotients; this corrects that case.
pub fn div_floor(n: &BigInt, d: &BigInt) -> Result<BigInt> {
    if d.is_zero() {
        return Err(Error::Domain(format!("division of {n} by zero")));
    }
    Ok(floor_quotient(n, d))
}

/// `floor(n / 2)`.
pub(crate) fn half_floor(n: &BigInt) -> BigInt {
    floor_quotient(n, &BigInt::from(2))
}

fn floor_quotient(n: &BigInt, d: &BigInt) -> BigInt {
    let q = n / d;
    let r = n % d;
    if !r.is_zero() && n.is_negative() != d.is_negative() {
        q - 1
    } else {
        q
    }
}
